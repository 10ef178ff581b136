//! Cross-family comparison and recommendation
//!
//! Two rankings are always produced. The test ranking recomputes squared
//! error between each family's held-out predictions and the true targets;
//! the CV ranking uses the mean CV error recorded by the sweep. Only the
//! configured [`RankingSignal`] drives the recommendation.

use crate::error::{BenchError, Result};
use crate::evaluation::metrics::{mean_squared_error, Metrics};
use crate::training::ModelFamily;
use crate::training::sweep::SweepResult;
use crate::training::trainer::TrainedModel;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Which error drives the user-facing recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingSignal {
    /// Squared error on the held-out test partition
    #[default]
    TestError,
    /// Mean CV error from the training-partition sweep
    CrossValidation,
}

impl fmt::Display for RankingSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RankingSignal::TestError => f.write_str("test_error"),
            RankingSignal::CrossValidation => f.write_str("cross_validation"),
        }
    }
}

impl FromStr for RankingSignal {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "test" | "test_error" | "test_mse" => Ok(RankingSignal::TestError),
            "cv" | "cross_validation" | "cv_mse" => Ok(RankingSignal::CrossValidation),
            other => Err(BenchError::ConfigError(format!(
                "unknown ranking signal '{}', expected test_error or cross_validation",
                other
            ))),
        }
    }
}

/// Everything one family produced during a run
#[derive(Debug, Clone)]
pub struct FamilyResult {
    pub model: TrainedModel,
    pub sweep: SweepResult,
    /// Predictions on the test partition, in test row order
    pub predictions: Array1<f64>,
    pub metrics: Metrics,
    /// Wall time of sweep plus refit
    pub elapsed_secs: f64,
}

impl FamilyResult {
    pub fn family(&self) -> ModelFamily {
        self.model.family
    }
}

/// One entry of a ranking, best first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedFamily {
    pub family: ModelFamily,
    pub score: f64,
}

/// Both rankings and the recommendation derived from the configured signal
#[derive(Debug, Clone)]
pub struct ComparisonResult {
    /// Family results in run order
    pub results: Vec<FamilyResult>,
    pub signal: RankingSignal,
    pub recommended: ModelFamily,
    pub test_ranking: Vec<RankedFamily>,
    pub cv_ranking: Vec<RankedFamily>,
}

impl ComparisonResult {
    pub fn get(&self, family: ModelFamily) -> Option<&FamilyResult> {
        self.results.iter().find(|r| r.family() == family)
    }

    /// Ranking for the configured signal
    pub fn ranking(&self) -> &[RankedFamily] {
        match self.signal {
            RankingSignal::TestError => &self.test_ranking,
            RankingSignal::CrossValidation => &self.cv_ranking,
        }
    }

    /// Best family under the signal that was not configured
    pub fn alternative(&self) -> Option<ModelFamily> {
        let other = match self.signal {
            RankingSignal::TestError => &self.cv_ranking,
            RankingSignal::CrossValidation => &self.test_ranking,
        };
        other.first().map(|r| r.family)
    }
}

/// Sort ascending by score; the sort is stable so equal scores keep input order.
///
/// NaN scores sort last.
pub fn rank(scores: &[(ModelFamily, f64)]) -> Vec<RankedFamily> {
    let mut ranked: Vec<RankedFamily> = scores
        .iter()
        .map(|&(family, score)| RankedFamily { family, score })
        .collect();

    ranked.sort_by(|a, b| match (a.score.is_nan(), b.score.is_nan()) {
        (false, false) => a.score.partial_cmp(&b.score).unwrap_or(Ordering::Equal),
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (true, true) => Ordering::Equal,
    });
    ranked
}

/// Aggregates family results into a recommendation
#[derive(Debug, Clone, Copy, Default)]
pub struct Comparator {
    signal: RankingSignal,
}

impl Comparator {
    pub fn new(signal: RankingSignal) -> Self {
        Self { signal }
    }

    /// Rank `results` under both signals and recommend under the configured one
    pub fn compare(&self, results: Vec<FamilyResult>, y_test: &Array1<f64>) -> Result<ComparisonResult> {
        if results.is_empty() {
            return Err(BenchError::ValidationError(
                "no family results to compare".to_string(),
            ));
        }

        let test_scores = results
            .iter()
            .map(|r| Ok((r.family(), mean_squared_error(y_test, &r.predictions)?)))
            .collect::<Result<Vec<_>>>()?;
        let cv_scores: Vec<(ModelFamily, f64)> = results
            .iter()
            .map(|r| (r.family(), r.sweep.best_cv.mean_mse))
            .collect();

        let test_ranking = rank(&test_scores);
        let cv_ranking = rank(&cv_scores);

        let recommended = match self.signal {
            RankingSignal::TestError => test_ranking[0].family,
            RankingSignal::CrossValidation => cv_ranking[0].family,
        };

        Ok(ComparisonResult {
            results,
            signal: self.signal,
            recommended,
            test_ranking,
            cv_ranking,
        })
    }
}
