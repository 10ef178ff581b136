//! Point-prediction error metrics

use crate::error::{BenchError, Result};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Regression metrics for one (model, test set) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    /// Mean absolute error
    pub mae: f64,
    /// Mean squared error
    pub mse: f64,
    /// Square root of `mse`
    pub rmse: f64,
    /// Coefficient of determination, negative when worse than the mean
    pub r2: f64,
    /// Mean absolute percentage error (in percent).
    ///
    /// `None` when any true value is zero, where the ratio is undefined.
    pub mape: Option<f64>,
    pub n_samples: usize,
}

fn check_lengths(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Result<()> {
    if y_true.len() != y_pred.len() {
        return Err(BenchError::ShapeError {
            expected: format!("{} predictions", y_true.len()),
            actual: format!("{} predictions", y_pred.len()),
        });
    }
    if y_true.is_empty() {
        return Err(BenchError::InvalidInput(
            "cannot compute metrics on an empty set".to_string(),
        ));
    }
    Ok(())
}

/// Mean of squared differences
pub fn mean_squared_error(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Result<f64> {
    check_lengths(y_true, y_pred)?;
    let sse: f64 = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(t, p)| (t - p) * (t - p))
        .sum();
    Ok(sse / y_true.len() as f64)
}

/// Compute every metric for `y_pred` against `y_true`
pub fn evaluate(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Result<Metrics> {
    check_lengths(y_true, y_pred)?;

    let n = y_true.len() as f64;
    let errors: Vec<f64> = y_true.iter().zip(y_pred.iter()).map(|(t, p)| t - p).collect();

    let ss_res: f64 = errors.iter().map(|e| e * e).sum();
    let mse = ss_res / n;
    let mae = errors.iter().map(|e| e.abs()).sum::<f64>() / n;

    let y_mean = y_true.sum() / n;
    let ss_tot: f64 = y_true.iter().map(|y| (y - y_mean).powi(2)).sum();
    let r2 = if ss_tot > 0.0 {
        1.0 - ss_res / ss_tot
    } else if ss_res == 0.0 {
        1.0
    } else {
        0.0
    };

    let mape = if y_true.iter().any(|&t| t == 0.0) {
        None
    } else {
        let total: f64 = y_true
            .iter()
            .zip(errors.iter())
            .map(|(t, e)| (e / t).abs())
            .sum();
        Some(total / n * 100.0)
    };

    Ok(Metrics {
        mae,
        mse,
        rmse: mse.sqrt(),
        r2,
        mape,
        n_samples: y_true.len(),
    })
}
