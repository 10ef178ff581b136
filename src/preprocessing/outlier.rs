//! Outlier detection on a single column

use crate::dataset::Dataset;
use crate::error::{BenchError, Result};
use crate::utils::stats;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Multiplier applied to the interquartile range
pub const IQR_FACTOR: f64 = 1.5;
/// Absolute z-score above which a value is flagged
pub const ZSCORE_THRESHOLD: f64 = 3.0;

/// Outlier detection method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutlierMethod {
    /// Tukey fences at Q1 - 1.5 IQR and Q3 + 1.5 IQR
    #[default]
    Iqr,
    /// |x - mean| / std > 3 with the sample standard deviation
    ZScore,
}

impl fmt::Display for OutlierMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutlierMethod::Iqr => f.write_str("iqr"),
            OutlierMethod::ZScore => f.write_str("zscore"),
        }
    }
}

impl FromStr for OutlierMethod {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace(['-', '_'], "").as_str() {
            "iqr" => Ok(OutlierMethod::Iqr),
            "zscore" => Ok(OutlierMethod::ZScore),
            other => Err(BenchError::ConfigError(format!(
                "unsupported outlier method '{}'",
                other
            ))),
        }
    }
}

/// Lower and upper acceptance bounds for a column
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutlierBounds {
    pub lower: f64,
    pub upper: f64,
}

impl OutlierBounds {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

/// Bounds for `column` under `method`; `None` when they cannot be computed
/// (no values, or zero spread for the z-score test)
pub fn outlier_bounds(dataset: &Dataset, column: &str, method: OutlierMethod) -> Result<Option<OutlierBounds>> {
    let values = dataset.column(column)?;

    let bounds = match method {
        OutlierMethod::Iqr => {
            let sorted = stats::sorted_values(values);
            match (stats::quantile(&sorted, 0.25), stats::quantile(&sorted, 0.75)) {
                (Some(q1), Some(q3)) => {
                    let iqr = q3 - q1;
                    Some(OutlierBounds {
                        lower: q1 - IQR_FACTOR * iqr,
                        upper: q3 + IQR_FACTOR * iqr,
                    })
                }
                _ => None,
            }
        }
        OutlierMethod::ZScore => {
            let present = stats::present_values(values);
            match (stats::mean(&present), stats::sample_std(&present)) {
                (Some(m), Some(sd)) if sd > 0.0 => Some(OutlierBounds {
                    lower: m - ZSCORE_THRESHOLD * sd,
                    upper: m + ZSCORE_THRESHOLD * sd,
                }),
                _ => None,
            }
        }
    };
    Ok(bounds)
}

/// Row indices whose value in `column` falls outside the bounds.
///
/// Missing cells are never flagged.
pub fn detect_outliers(dataset: &Dataset, column: &str, method: OutlierMethod) -> Result<Vec<usize>> {
    let bounds = match outlier_bounds(dataset, column, method)? {
        Some(b) => b,
        None => return Ok(Vec::new()),
    };

    Ok(dataset
        .column(column)?
        .iter()
        .enumerate()
        .filter(|(_, v)| !v.is_nan() && !bounds.contains(**v))
        .map(|(i, _)| i)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn with_spike() -> Dataset {
        let mut values = Array2::from_shape_fn((20, 1), |(r, _)| (r % 5) as f64);
        values[[7, 0]] = 100.0;
        Dataset::new(vec!["x".into()], values).unwrap()
    }

    #[test]
    fn test_iqr_flags_spike() {
        assert_eq!(detect_outliers(&with_spike(), "x", OutlierMethod::Iqr).unwrap(), vec![7]);
    }

    #[test]
    fn test_zscore_flags_spike() {
        assert_eq!(detect_outliers(&with_spike(), "x", OutlierMethod::ZScore).unwrap(), vec![7]);
    }

    #[test]
    fn test_constant_column_has_no_outliers() {
        let ds = Dataset::new(vec!["x".into()], Array2::from_elem((10, 1), 2.0)).unwrap();
        assert!(detect_outliers(&ds, "x", OutlierMethod::ZScore).unwrap().is_empty());
        assert!(detect_outliers(&ds, "x", OutlierMethod::Iqr).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_column_and_method() {
        assert!(matches!(
            detect_outliers(&with_spike(), "y", OutlierMethod::Iqr),
            Err(BenchError::FeatureNotFound(_))
        ));
        assert!(matches!("mad".parse::<OutlierMethod>(), Err(BenchError::ConfigError(_))));
        assert_eq!("z-score".parse::<OutlierMethod>().unwrap(), OutlierMethod::ZScore);
    }
}
