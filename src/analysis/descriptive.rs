//! Per-column descriptive statistics

use crate::dataset::Dataset;
use crate::utils::stats;
use ndarray::Axis;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Summary statistics of one column, computed over its non-missing cells.
///
/// Fields are `None` when the column has too few values for them to exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnStats {
    pub name: String,
    pub count: usize,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    /// Most frequent value; the smallest one on ties
    pub mode: Option<f64>,
    /// Sample standard deviation (ddof = 1)
    pub std: Option<f64>,
    pub variance: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub range: Option<f64>,
    pub q1: Option<f64>,
    pub q3: Option<f64>,
    pub iqr: Option<f64>,
    pub skewness: Option<f64>,
    /// Excess kurtosis (normal = 0)
    pub kurtosis: Option<f64>,
}

/// Biased skewness and excess kurtosis from central moments
pub fn moments(values: &[f64]) -> (Option<f64>, Option<f64>) {
    let m = match stats::mean(values) {
        Some(m) => m,
        None => return (None, None),
    };
    let n = values.len() as f64;
    let m2 = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / n;
    if m2 == 0.0 {
        return (None, None);
    }
    let m3 = values.iter().map(|v| (v - m).powi(3)).sum::<f64>() / n;
    let m4 = values.iter().map(|v| (v - m).powi(4)).sum::<f64>() / n;
    (Some(m3 / m2.powf(1.5)), Some(m4 / (m2 * m2) - 3.0))
}

fn mode(sorted: &[f64]) -> Option<f64> {
    let mut best: Option<(f64, usize)> = None;
    let mut i = 0;
    while i < sorted.len() {
        let value = sorted[i];
        let run = sorted[i..].iter().take_while(|v| **v == value).count();
        if best.map_or(true, |(_, count)| run > count) {
            best = Some((value, run));
        }
        i += run;
    }
    best.map(|(value, _)| value)
}

impl ColumnStats {
    pub fn compute(name: &str, sorted: &[f64]) -> Self {
        let q1 = stats::quantile(sorted, 0.25);
        let q3 = stats::quantile(sorted, 0.75);
        let min = sorted.first().copied();
        let max = sorted.last().copied();
        let variance = stats::sample_variance(sorted);
        let (skewness, kurtosis) = moments(sorted);

        Self {
            name: name.to_string(),
            count: sorted.len(),
            mean: stats::mean(sorted),
            median: stats::median(sorted),
            mode: mode(sorted),
            std: variance.map(f64::sqrt),
            variance,
            min,
            max,
            range: min.zip(max).map(|(lo, hi)| hi - lo),
            q1,
            q3,
            iqr: q1.zip(q3).map(|(a, b)| b - a),
            skewness,
            kurtosis,
        }
    }
}

/// Descriptive statistics for every column, in column order
pub fn describe(dataset: &Dataset) -> Vec<ColumnStats> {
    let columns: Vec<_> = dataset.values().axis_iter(Axis(1)).collect();
    columns
        .into_par_iter()
        .zip(dataset.columns().par_iter())
        .map(|(col, name)| ColumnStats::compute(name, &stats::sorted_values(col)))
        .collect()
}
