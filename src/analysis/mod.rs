//! Exploratory analysis of a loaded dataset
//!
//! - [`describe`] - per-column descriptive statistics
//! - [`correlation_matrix`] / [`strong_correlations`] - Pearson correlation
//! - [`analyze_distribution`] - skewness, kurtosis and a normality test

pub mod correlation;
pub mod descriptive;
pub mod distribution;

pub use correlation::{
    correlation_matrix, pearson, strong_correlations, CorrelatedPair, CorrelationMatrix, STRONG_CORRELATION,
};
pub use descriptive::{describe, ColumnStats};
pub use distribution::{analyze_distribution, jarque_bera, DistributionAnalysis, NormalityTest};
