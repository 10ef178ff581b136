//! Small descriptive-statistics kernels shared by preprocessing and analysis
//!
//! All functions ignore NaN cells.

use ndarray::ArrayView1;
use std::cmp::Ordering;

/// Non-missing values of a column, in row order
pub fn present_values(column: ArrayView1<'_, f64>) -> Vec<f64> {
    column.iter().copied().filter(|v| !v.is_nan()).collect()
}

/// Non-missing values sorted ascending
pub fn sorted_values(column: ArrayView1<'_, f64>) -> Vec<f64> {
    let mut values = present_values(column);
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    values
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample variance (ddof = 1); `None` below two values
pub fn sample_variance(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some(ss / (values.len() - 1) as f64)
}

pub fn sample_std(values: &[f64]) -> Option<f64> {
    sample_variance(values).map(f64::sqrt)
}

/// Quantile with linear interpolation between closest ranks.
///
/// `sorted` must be ascending and free of NaN.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

pub fn median(sorted: &[f64]) -> Option<f64> {
    quantile(sorted, 0.5)
}
