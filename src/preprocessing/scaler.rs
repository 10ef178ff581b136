//! Feature scaling implementations

use crate::dataset::Dataset;
use crate::error::{BenchError, Result};
use crate::utils::stats;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Type of scaler to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalerType {
    /// Min-Max scaling: (x - min) / (max - min)
    #[default]
    MinMax,
    /// Standard scaling (z-score normalization): (x - mean) / std, sample std
    Standard,
}

impl fmt::Display for ScalerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalerType::MinMax => f.write_str("minmax"),
            ScalerType::Standard => f.write_str("standard"),
        }
    }
}

impl FromStr for ScalerType {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace(['-', '_'], "").as_str() {
            "minmax" => Ok(ScalerType::MinMax),
            "standard" | "zscore" => Ok(ScalerType::Standard),
            other => Err(BenchError::ConfigError(format!(
                "unsupported normalization method '{}'",
                other
            ))),
        }
    }
}

/// Parameters for a fitted column
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct ScalerParams {
    center: f64, // mean or min
    scale: f64,  // std or range
}

/// Feature scaler
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scaler {
    scaler_type: ScalerType,
    params: BTreeMap<String, ScalerParams>,
    is_fitted: bool,
}

impl Scaler {
    /// Create a new scaler
    pub fn new(scaler_type: ScalerType) -> Self {
        Self {
            scaler_type,
            params: BTreeMap::new(),
            is_fitted: false,
        }
    }

    /// Fit the scaler to the named columns
    pub fn fit(&mut self, dataset: &Dataset, columns: &[&str]) -> Result<&mut Self> {
        for name in columns {
            let column = dataset.column(name)?;
            let params = self.compute_params(&stats::present_values(column));
            self.params.insert(name.to_string(), params);
        }

        self.is_fitted = true;
        Ok(self)
    }

    /// Transform the fitted columns; other columns pass through
    pub fn transform(&self, dataset: &Dataset) -> Result<Dataset> {
        self.apply(dataset, |v, p| (v - p.center) / p.scale)
    }

    /// Fit and transform in one step
    pub fn fit_transform(&mut self, dataset: &Dataset, columns: &[&str]) -> Result<Dataset> {
        self.fit(dataset, columns)?;
        self.transform(dataset)
    }

    /// Undo [`Scaler::transform`]
    pub fn inverse_transform(&self, dataset: &Dataset) -> Result<Dataset> {
        self.apply(dataset, |v, p| v * p.scale + p.center)
    }

    fn apply(&self, dataset: &Dataset, f: impl Fn(f64, &ScalerParams) -> f64) -> Result<Dataset> {
        if !self.is_fitted {
            return Err(BenchError::ModelNotFitted);
        }

        let mut result = dataset.clone();
        for (name, params) in &self.params {
            let idx = dataset.column_index(name)?;
            let scaled: Array1<f64> = dataset.values().column(idx).mapv(|v| f(v, params));
            result = result.with_column_values(idx, scaled)?;
        }
        Ok(result)
    }

    // A zero spread keeps scale at 1 so a constant column maps to 0
    fn compute_params(&self, values: &[f64]) -> ScalerParams {
        match self.scaler_type {
            ScalerType::Standard => {
                let mean = stats::mean(values).unwrap_or(0.0);
                let std = stats::sample_std(values).unwrap_or(0.0);
                ScalerParams {
                    center: mean,
                    scale: if std == 0.0 { 1.0 } else { std },
                }
            }
            ScalerType::MinMax => {
                let min = values.iter().copied().fold(f64::INFINITY, f64::min);
                let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                if values.is_empty() {
                    return ScalerParams { center: 0.0, scale: 1.0 };
                }
                let range = max - min;
                ScalerParams {
                    center: min,
                    scale: if range == 0.0 { 1.0 } else { range },
                }
            }
        }
    }
}

/// Return a copy of `dataset` with `columns` rescaled by `scaler`
pub fn normalize_columns(dataset: &Dataset, columns: &[&str], scaler: ScalerType) -> Result<Dataset> {
    Scaler::new(scaler).fit_transform(dataset, columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn sample() -> Dataset {
        let values = Array2::from_shape_fn((5, 3), |(r, c)| match c {
            0 => r as f64 + 1.0,
            1 => 7.0,
            _ => 10.0 * r as f64,
        });
        Dataset::new(vec!["a".into(), "flat".into(), "y".into()], values).unwrap()
    }

    #[test]
    fn test_standard_scaler() {
        let out = normalize_columns(&sample(), &["a"], ScalerType::Standard).unwrap();
        let col = out.column("a").unwrap();
        let mean: f64 = col.sum() / 5.0;
        assert!(mean.abs() < 1e-10);
        // sample std of 1..=5 is sqrt(2.5)
        assert!((col[4] - 2.0 / 2.5f64.sqrt()).abs() < 1e-10);
    }

    #[test]
    fn test_minmax_scaler() {
        let out = normalize_columns(&sample(), &["a"], ScalerType::MinMax).unwrap();
        let col = out.column("a").unwrap();
        assert!((col[0] - 0.0).abs() < 1e-10);
        assert!((col[4] - 1.0).abs() < 1e-10);
        // untouched column
        assert_eq!(out.column("y").unwrap()[4], 40.0);
    }

    #[test]
    fn test_constant_column_maps_to_zero() {
        for scaler in [ScalerType::MinMax, ScalerType::Standard] {
            let out = normalize_columns(&sample(), &["flat"], scaler).unwrap();
            assert!(out.column("flat").unwrap().iter().all(|v| *v == 0.0));
        }
    }

    #[test]
    fn test_inverse_transform() {
        let ds = sample();
        let mut scaler = Scaler::new(ScalerType::Standard);
        let scaled = scaler.fit_transform(&ds, &["a", "y"]).unwrap();
        let restored = scaler.inverse_transform(&scaled).unwrap();

        for (o, r) in ds.values().iter().zip(restored.values().iter()) {
            assert!((o - r).abs() < 1e-10);
        }
    }

    #[test]
    fn test_unknown_names() {
        assert!(matches!("robust".parse::<ScalerType>(), Err(BenchError::ConfigError(_))));
        assert!(matches!(
            normalize_columns(&sample(), &["missing"], ScalerType::MinMax),
            Err(BenchError::FeatureNotFound(_))
        ));
    }
}
