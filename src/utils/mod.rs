//! Utility functions and types

pub mod data_loader;
mod format;
mod sampling;
pub mod stats;
mod timing;

pub use data_loader::{DataLoader, DataSaver};
pub use format::{format_number, format_percentage, separator, smart_round};
pub use sampling::{random_colors, random_sample};
pub use timing::{timed, timed_with_elapsed, Timer};

use crate::error::{BenchError, Result};

/// Squared Euclidean distance without a length check (hot path for KNN)
#[inline]
pub(crate) fn squared_euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(ai, bi)| {
            let d = ai - bi;
            d * d
        })
        .sum()
}

/// Euclidean distance between two points of equal dimension
pub fn euclidean_distance(a: &[f64], b: &[f64]) -> Result<f64> {
    if a.len() != b.len() {
        return Err(BenchError::ShapeError {
            expected: format!("{} coordinates", a.len()),
            actual: format!("{} coordinates", b.len()),
        });
    }
    Ok(squared_euclidean(a, b).sqrt())
}
