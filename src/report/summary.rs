//! Machine-readable outcome summary
//!
//! Metadata only: prediction arrays and fitted parameters stay out.

use crate::evaluation::{Metrics, RankedFamily, RankingSignal};
use crate::training::{FamilyFailure, ModelFamily, SelectionOutcome, SweepResult, TrainedModelSummary};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilySummary {
    pub model: TrainedModelSummary,
    pub sweep: SweepResult,
    pub metrics: Metrics,
    pub elapsed_secs: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeSummary {
    pub target_column: String,
    pub n_train: usize,
    pub n_test: usize,
    pub signal: RankingSignal,
    pub recommended: ModelFamily,
    pub test_ranking: Vec<RankedFamily>,
    pub cv_ranking: Vec<RankedFamily>,
    pub families: Vec<FamilySummary>,
    pub failures: Vec<FamilyFailure>,
}

impl OutcomeSummary {
    pub fn from_outcome(outcome: &SelectionOutcome) -> Self {
        let comparison = &outcome.comparison;
        Self {
            target_column: outcome.target_column.clone(),
            n_train: outcome.n_train,
            n_test: outcome.n_test,
            signal: comparison.signal,
            recommended: comparison.recommended,
            test_ranking: comparison.test_ranking.clone(),
            cv_ranking: comparison.cv_ranking.clone(),
            families: comparison
                .results
                .iter()
                .map(|r| FamilySummary {
                    model: r.model.summary(),
                    sweep: r.sweep.clone(),
                    metrics: r.metrics.clone(),
                    elapsed_secs: r.elapsed_secs,
                })
                .collect(),
            failures: outcome.failures.clone(),
        }
    }
}
