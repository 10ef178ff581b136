//! Missing value imputation strategies

use crate::dataset::Dataset;
use crate::error::{BenchError, Result};
use crate::utils::stats;
use ndarray::{Array1, Axis};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

/// Strategy for handling missing values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImputeStrategy {
    /// Replace with the column mean
    #[default]
    Mean,
    /// Replace with the column median
    Median,
    /// Drop rows with any missing value
    Drop,
    /// Replace with 0
    Zero,
}

impl fmt::Display for ImputeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ImputeStrategy::Mean => "mean",
            ImputeStrategy::Median => "median",
            ImputeStrategy::Drop => "drop",
            ImputeStrategy::Zero => "zero",
        };
        f.write_str(name)
    }
}

impl FromStr for ImputeStrategy {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "mean" | "media" => Ok(ImputeStrategy::Mean),
            "median" | "mediana" => Ok(ImputeStrategy::Median),
            "drop" | "elimina" => Ok(ImputeStrategy::Drop),
            "zero" => Ok(ImputeStrategy::Zero),
            other => Err(BenchError::ConfigError(format!(
                "unsupported missing-value strategy '{}'",
                other
            ))),
        }
    }
}

/// Imputer for handling missing values.
///
/// Fill values are learned per column by [`Imputer::fit`] so that the same
/// values can be applied to another table with the same columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Imputer {
    strategy: ImputeStrategy,
    /// `None` for an all-missing column under mean/median
    fill_values: Vec<Option<f64>>,
    columns: Vec<String>,
    is_fitted: bool,
}

impl Imputer {
    /// Create a new imputer with the specified strategy
    pub fn new(strategy: ImputeStrategy) -> Self {
        Self {
            strategy,
            fill_values: Vec::new(),
            columns: Vec::new(),
            is_fitted: false,
        }
    }

    pub fn strategy(&self) -> ImputeStrategy {
        self.strategy
    }

    /// Learn one fill value per column
    pub fn fit(&mut self, dataset: &Dataset) -> Result<&mut Self> {
        self.fill_values = dataset
            .values()
            .axis_iter(Axis(1))
            .map(|col| match self.strategy {
                ImputeStrategy::Mean => stats::mean(&stats::present_values(col)),
                ImputeStrategy::Median => stats::median(&stats::sorted_values(col)),
                ImputeStrategy::Zero => Some(0.0),
                ImputeStrategy::Drop => None,
            })
            .collect();
        self.columns = dataset.columns().to_vec();
        self.is_fitted = true;
        Ok(self)
    }

    /// Apply the learned fill values, or drop incomplete rows
    pub fn transform(&self, dataset: &Dataset) -> Result<Dataset> {
        if !self.is_fitted {
            return Err(BenchError::ModelNotFitted);
        }
        if dataset.columns() != self.columns.as_slice() {
            return Err(BenchError::ShapeError {
                expected: format!("columns {:?}", self.columns),
                actual: format!("columns {:?}", dataset.columns()),
            });
        }

        if self.strategy == ImputeStrategy::Drop {
            let keep: Vec<usize> = dataset
                .values()
                .axis_iter(Axis(0))
                .enumerate()
                .filter(|(_, row)| row.iter().all(|v| !v.is_nan()))
                .map(|(i, _)| i)
                .collect();
            if keep.is_empty() {
                return Err(BenchError::DataError(
                    "every row contains a missing value; nothing left after drop".to_string(),
                ));
            }
            debug!(dropped = dataset.n_rows() - keep.len(), "Dropped incomplete rows");
            return dataset.select_rows(&keep);
        }

        let mut out = dataset.clone();
        for (idx, fill) in self.fill_values.iter().enumerate() {
            let column = dataset.values().column(idx);
            if !column.iter().any(|v| v.is_nan()) {
                continue;
            }
            match fill {
                Some(value) => {
                    let filled: Array1<f64> = column.mapv(|v| if v.is_nan() { *value } else { v });
                    out = out.with_column_values(idx, filled)?;
                }
                None => warn!(column = %self.columns[idx], "Column has no values to impute from"),
            }
        }
        Ok(out)
    }

    /// Fit and transform in one step
    pub fn fit_transform(&mut self, dataset: &Dataset) -> Result<Dataset> {
        self.fit(dataset)?;
        self.transform(dataset)
    }
}

/// Return a copy of `dataset` with missing values handled by `strategy`
pub fn handle_missing(dataset: &Dataset, strategy: ImputeStrategy) -> Result<Dataset> {
    Imputer::new(strategy).fit_transform(dataset)
}
