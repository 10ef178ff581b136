//! Plain-text exploratory analysis report

use crate::analysis::{correlation_matrix, describe, strong_correlations, STRONG_CORRELATION};
use crate::dataset::Dataset;
use crate::error::Result;
use crate::preprocessing::{detect_outliers, OutlierMethod};
use crate::utils::{format_number, format_percentage, separator};
use chrono::NaiveDateTime;

const WIDTH: usize = 72;

fn opt(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.4}", v),
        None => "n/a".to_string(),
    }
}

/// Dataset summary, descriptive statistics, strong correlations and outlier counts
pub fn render_analysis_report(dataset: &Dataset, target: &str, generated_at: NaiveDateTime) -> Result<String> {
    let features = dataset.feature_names(target)?;
    let info = dataset.info();
    let rule = separator('=', WIDTH);
    let thin = separator('-', WIDTH);
    let mut out = String::new();

    out.push_str(&format!("{}\n", rule));
    out.push_str("DATASET ANALYSIS REPORT\n");
    out.push_str(&format!("Generated: {}\n", generated_at.format("%Y-%m-%d %H:%M:%S")));
    out.push_str(&format!("{}\n\n", rule));

    out.push_str("DATASET SUMMARY\n");
    out.push_str(&format!("{}\n", thin));
    out.push_str(&format!("Samples: {}\n", format_number(info.n_rows as f64, 0)));
    out.push_str(&format!("Features: {}\n", features.len()));
    out.push_str(&format!("Target: {}\n", target));
    for missing in info.missing.iter().filter(|m| m.count > 0) {
        out.push_str(&format!(
            "Missing in {}: {} ({})\n",
            missing.column,
            missing.count,
            format_percentage(missing.fraction, 1)
        ));
    }

    out.push_str("\nDESCRIPTIVE STATISTICS\n");
    out.push_str(&format!("{}\n", thin));
    out.push_str(&format!(
        "{:<14} {:>12} {:>12} {:>12} {:>12} {:>12}\n",
        "Column", "Mean", "Median", "Std Dev", "Min", "Max"
    ));
    let stats = describe(dataset);
    for s in &stats {
        out.push_str(&format!(
            "{:<14} {:>12} {:>12} {:>12} {:>12} {:>12}\n",
            s.name,
            opt(s.mean),
            opt(s.median),
            opt(s.std),
            opt(s.min),
            opt(s.max)
        ));
    }
    out.push_str(&format!(
        "\n{:<14} {:>12} {:>12} {:>12} {:>12} {:>12}\n",
        "Column", "Q1", "Q3", "IQR", "Skewness", "Kurtosis"
    ));
    for s in &stats {
        out.push_str(&format!(
            "{:<14} {:>12} {:>12} {:>12} {:>12} {:>12}\n",
            s.name,
            opt(s.q1),
            opt(s.q3),
            opt(s.iqr),
            opt(s.skewness),
            opt(s.kurtosis)
        ));
    }

    out.push_str(&format!("\nSTRONG CORRELATIONS (|r| > {})\n", STRONG_CORRELATION));
    out.push_str(&format!("{}\n", thin));
    let pairs = strong_correlations(&correlation_matrix(dataset), STRONG_CORRELATION);
    if pairs.is_empty() {
        out.push_str("None\n");
    }
    for pair in &pairs {
        out.push_str(&format!("{} and {}: {:.2}\n", pair.first, pair.second, pair.coefficient));
    }

    out.push_str("\nOUTLIERS (IQR method)\n");
    out.push_str(&format!("{}\n", thin));
    for name in dataset.columns() {
        let rows = detect_outliers(dataset, name, OutlierMethod::Iqr)?;
        out.push_str(&format!(
            "{:<14} {:>8} ({})\n",
            name,
            rows.len(),
            format_percentage(rows.len() as f64 / info.n_rows as f64, 1)
        ));
    }

    Ok(out)
}
