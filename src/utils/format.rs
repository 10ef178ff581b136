//! Number and text formatting used by the reports

/// Format a number with thousands separators and a fixed number of decimals.
///
/// `format_number(20640.0, 0)` gives `"20,640"`, `format_number(-1234.5, 2)` gives `"-1,234.50"`.
pub fn format_number(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*ch);
    }

    let negative = value < 0.0 && formatted.chars().any(|c| c != '0' && c != '.');
    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Format a fraction as a percentage: `0.1234` with one decimal gives `"12.3%"`.
pub fn format_percentage(fraction: f64, decimals: usize) -> String {
    format!("{:.*}%", decimals, fraction * 100.0)
}

/// Repeat `ch` `len` times, for report rules.
pub fn separator(ch: char, len: usize) -> String {
    std::iter::repeat(ch).take(len).collect()
}

/// Round depending on magnitude: integers above 1000, two decimals above 1,
/// four above 0.01, three significant digits otherwise.
pub fn smart_round(value: f64) -> f64 {
    if !value.is_finite() {
        value
    } else if value > 1000.0 {
        value.round()
    } else if value > 1.0 {
        (value * 100.0).round() / 100.0
    } else if value > 0.01 {
        (value * 10_000.0).round() / 10_000.0
    } else {
        format!("{:.2e}", value).parse().unwrap_or(value)
    }
}
