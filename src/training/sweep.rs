//! Per-family hyperparameter sweep
//!
//! Every candidate of a family's grid is scored by k-fold cross-validation on
//! the training partition only. The test partition never reaches this module.

use crate::dataset::Partition;
use crate::error::{BenchError, Result};
use crate::training::cross_validation::{CVResult, CrossValidator};
use crate::training::models::{Estimator, Hyperparameter, Model, ModelFamily};
use crate::utils::timed;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Cross-validation outcome of one candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateResult {
    pub candidate: Hyperparameter,
    pub cv: CVResult,
}

/// Winner and per-candidate diagnostics of one sweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepResult {
    pub family: ModelFamily,
    pub best: Hyperparameter,
    pub best_cv: CVResult,
    /// Every candidate in grid order
    pub candidates: Vec<CandidateResult>,
}

/// Pick the candidate with the lowest mean CV error.
///
/// `evaluate` is called once per candidate in grid order. The running best
/// starts at the first candidate and is only replaced on a strictly lower
/// mean MSE, so the earliest candidate wins ties.
pub fn sweep_with<F>(family: ModelFamily, candidates: &[Hyperparameter], mut evaluate: F) -> Result<SweepResult>
where
    F: FnMut(&Hyperparameter) -> Result<CVResult>,
{
    let first = candidates.first().copied().ok_or_else(|| {
        BenchError::invalid_parameter("candidates", "[]", format!("grid for {} is empty", family))
    })?;

    let mut results = Vec::with_capacity(candidates.len());
    let mut best = first;
    let mut best_cv: Option<CVResult> = None;
    let mut best_mse = f64::INFINITY;

    for candidate in candidates {
        let cv = evaluate(candidate)?;
        debug!(
            family = %family,
            candidate = %candidate,
            mean_mse = cv.mean_mse,
            std_mse = cv.std_mse,
            "Scored candidate"
        );

        if cv.mean_mse < best_mse {
            best_mse = cv.mean_mse;
            best = *candidate;
            best_cv = Some(cv.clone());
        }
        results.push(CandidateResult {
            candidate: *candidate,
            cv,
        });
    }

    // Every score was NaN; keep the first candidate
    let best_cv = match best_cv {
        Some(cv) => cv,
        None => results[0].cv.clone(),
    };

    Ok(SweepResult {
        family,
        best,
        best_cv,
        candidates: results,
    })
}

/// Runs cross-validated sweeps with a fixed fold layout
#[derive(Debug, Clone, Default)]
pub struct Sweeper {
    validator: CrossValidator,
}

impl Sweeper {
    pub fn new(validator: CrossValidator) -> Self {
        Self { validator }
    }

    /// Score every candidate of `family` on `train` and return the winner
    pub fn sweep(&self, family: ModelFamily, train: &Partition, candidates: &[Hyperparameter]) -> Result<SweepResult> {
        for candidate in candidates {
            family.validate_candidate(candidate)?;
        }

        let result = timed(&format!("sweep {}", family), || {
            sweep_with(family, candidates, |candidate| {
                self.validator.evaluate(&train.x, &train.y, |x_fit, y_fit, x_valid| {
                    let mut estimator = Estimator::build(family, candidate)?;
                    estimator.fit(x_fit, y_fit)?;
                    estimator.predict(x_valid)
                })
            })
        })?;

        info!(
            family = %family,
            best = %result.best,
            mean_mse = result.best_cv.mean_mse,
            n_candidates = candidates.len(),
            "Sweep finished"
        );

        Ok(result)
    }
}
