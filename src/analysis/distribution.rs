//! Shape of a single column's distribution

use crate::analysis::descriptive::moments;
use crate::dataset::Dataset;
use crate::error::Result;
use crate::utils::stats;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Fewest non-missing values for which the normality test is reported
pub const MIN_NORMALITY_SAMPLES: usize = 8;

/// Jarque-Bera normality test result
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalityTest {
    pub statistic: f64,
    /// Asymptotic chi-squared (2 dof) p-value
    pub p_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionAnalysis {
    pub column: String,
    pub n: usize,
    pub skewness: Option<f64>,
    pub kurtosis: Option<f64>,
    /// `None` below [`MIN_NORMALITY_SAMPLES`] values or for a constant column
    pub normality: Option<NormalityTest>,
}

/// JB = n/6 (S^2 + K^2/4) with S the skewness and K the excess kurtosis
pub fn jarque_bera(n: usize, skewness: f64, kurtosis: f64) -> NormalityTest {
    let statistic = n as f64 / 6.0 * (skewness.powi(2) + kurtosis.powi(2) / 4.0);
    NormalityTest {
        statistic,
        // chi2(2) survival function
        p_value: (-statistic / 2.0).exp(),
    }
}

pub fn analyze_distribution(dataset: &Dataset, column: &str) -> Result<DistributionAnalysis> {
    let values = stats::present_values(dataset.column(column)?);
    let (skewness, kurtosis) = moments(&values);

    let normality = match (skewness, kurtosis) {
        (Some(s), Some(k)) if values.len() >= MIN_NORMALITY_SAMPLES => Some(jarque_bera(values.len(), s, k)),
        _ => {
            debug!(column, n = values.len(), "Normality test not applicable");
            None
        }
    };

    Ok(DistributionAnalysis {
        column: column.to_string(),
        n: values.len(),
        skewness,
        kurtosis,
        normality,
    })
}
