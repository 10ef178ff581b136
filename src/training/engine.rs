//! Model selection engine
//!
//! Split once, then sweep and refit every configured family, predict the test
//! partition, score it, and compare. Families are independent and may run in
//! parallel; comparison waits for all of them.

use crate::dataset::{Dataset, Partition};
use crate::error::{BenchError, Result};
use crate::evaluation::{evaluate, Comparator, ComparisonResult, FamilyResult};
use crate::training::config::SelectionConfig;
use crate::training::cross_validation::CrossValidator;
use crate::training::models::ModelFamily;
use crate::training::split::split;
use crate::training::sweep::Sweeper;
use crate::training::trainer::train_final;
use crate::utils::{timed_with_elapsed, Timer};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// A family that could not be trained, with the reason
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyFailure {
    pub family: ModelFamily,
    pub error: String,
}

/// Result of a full selection run
#[derive(Debug, Clone)]
pub struct SelectionOutcome {
    pub comparison: ComparisonResult,
    /// Families that failed; the others still ran
    pub failures: Vec<FamilyFailure>,
    pub target_column: String,
    pub n_train: usize,
    pub n_test: usize,
    pub elapsed_secs: f64,
}

/// Runs the selection pipeline for one dataset
#[derive(Debug, Clone)]
pub struct SelectionEngine {
    config: SelectionConfig,
}

impl SelectionEngine {
    pub fn new(config: SelectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SelectionConfig {
        &self.config
    }

    /// Sweep, refit and score one family
    fn run_family(&self, family: ModelFamily, train: &Partition, test: &Partition) -> Result<FamilyResult> {
        let sweeper = Sweeper::new(CrossValidator::new(self.config.cv_folds));
        let grid = self.config.grid_for(family);

        let (fitted, elapsed) = timed_with_elapsed(family.as_str(), || -> Result<_> {
            let sweep = sweeper.sweep(family, train, &grid)?;
            let model = train_final(family, &sweep.best, train)?;
            Ok((sweep, model))
        });
        let (sweep, model) = fitted?;

        let predictions = model.predict(&test.x)?;
        let metrics = evaluate(&test.y, &predictions)?;

        Ok(FamilyResult {
            model,
            sweep,
            predictions,
            metrics,
            elapsed_secs: elapsed.as_secs_f64(),
        })
    }

    /// Execute the whole run.
    ///
    /// Configuration and missing-column errors abort immediately. Any other
    /// error inside a family is recorded in [`SelectionOutcome::failures`] and
    /// the remaining families continue. The run fails only when no family
    /// succeeds.
    pub fn run(&self, dataset: &Dataset) -> Result<SelectionOutcome> {
        self.config.validate()?;
        let timer = Timer::start("selection run");

        let parts = split(
            dataset,
            &self.config.target_column,
            self.config.test_fraction,
            self.config.random_state,
        )?;
        let (train, test) = (&parts.train, &parts.test);

        info!(
            target = %self.config.target_column,
            n_train = train.n_rows(),
            n_test = test.n_rows(),
            n_features = train.n_features(),
            families = self.config.families.len(),
            "Starting model selection"
        );

        let attempts: Vec<(ModelFamily, Result<FamilyResult>)> = if self.config.parallel {
            self.config
                .families
                .par_iter()
                .map(|&family| (family, self.run_family(family, train, test)))
                .collect()
        } else {
            self.config
                .families
                .iter()
                .map(|&family| (family, self.run_family(family, train, test)))
                .collect()
        };

        let mut results = Vec::with_capacity(attempts.len());
        let mut failures = Vec::new();
        for (family, attempt) in attempts {
            match attempt {
                Ok(result) => results.push(result),
                Err(e) if e.aborts_run() => return Err(e),
                Err(e) => {
                    warn!(family = %family, error = %e, "Family failed");
                    failures.push(FamilyFailure {
                        family,
                        error: e.to_string(),
                    });
                }
            }
        }

        if results.is_empty() {
            let reasons: Vec<String> = failures
                .iter()
                .map(|f| format!("{}: {}", f.family, f.error))
                .collect();
            return Err(BenchError::TrainingError(format!(
                "every model family failed ({})",
                reasons.join("; ")
            )));
        }

        let comparison = Comparator::new(self.config.ranking_signal).compare(results, &test.y)?;

        info!(
            recommended = %comparison.recommended,
            signal = %comparison.signal,
            failures = failures.len(),
            "Model selection finished"
        );

        Ok(SelectionOutcome {
            comparison,
            failures,
            target_column: self.config.target_column.clone(),
            n_train: train.n_rows(),
            n_test: test.n_rows(),
            elapsed_secs: timer.elapsed_secs(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::RankingSignal;
    use crate::training::models::Hyperparameter;
    use ndarray::Array2;

    fn linear_dataset(n: usize) -> Dataset {
        let values = Array2::from_shape_fn((n, 3), |(r, c)| {
            let a = (r % 13) as f64;
            let b = ((r * r) % 7) as f64;
            match c {
                0 => a,
                1 => b,
                _ => 1.5 * a - 2.0 * b + 4.0,
            }
        });
        Dataset::new(vec!["a".into(), "b".into(), "y".into()], values).unwrap()
    }

    #[test]
    fn test_run_all_families() {
        let config = SelectionConfig::new("y").with_grid(
            ModelFamily::DecisionTree,
            vec![Hyperparameter::MaxDepth(Some(3)), Hyperparameter::MaxDepth(None)],
        );
        let outcome = SelectionEngine::new(config).run(&linear_dataset(80)).unwrap();

        assert_eq!(outcome.n_test, 16);
        assert_eq!(outcome.n_train, 64);
        assert!(outcome.failures.is_empty());
        assert_eq!(outcome.comparison.results.len(), 4);
        // Exact linear target: OLS is perfect on the test rows
        assert_eq!(outcome.comparison.recommended, ModelFamily::LinearRegression);
        assert_eq!(outcome.comparison.test_ranking.len(), 4);
        assert_eq!(outcome.comparison.cv_ranking.len(), 4);
    }

    #[test]
    fn test_results_keep_configured_order() {
        let config = SelectionConfig::new("y")
            .with_families(vec![ModelFamily::Knn, ModelFamily::LinearRegression])
            .with_ranking_signal(RankingSignal::CrossValidation);
        let outcome = SelectionEngine::new(config).run(&linear_dataset(60)).unwrap();

        let order: Vec<ModelFamily> = outcome.comparison.results.iter().map(|r| r.family()).collect();
        assert_eq!(order, vec![ModelFamily::Knn, ModelFamily::LinearRegression]);
        assert_eq!(outcome.comparison.signal, RankingSignal::CrossValidation);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let ds = linear_dataset(60);
        let base = SelectionConfig::new("y").with_families(vec![ModelFamily::Knn, ModelFamily::DecisionTree]);
        let par = SelectionEngine::new(base.clone()).run(&ds).unwrap();
        let seq = SelectionEngine::new(base.with_parallel(false)).run(&ds).unwrap();

        for (a, b) in par.comparison.results.iter().zip(seq.comparison.results.iter()) {
            assert_eq!(a.sweep, b.sweep);
            assert_eq!(a.predictions, b.predictions);
        }
    }

    #[test]
    fn test_family_failure_is_recorded() {
        // 10 rows: 8 train, folds of 6-7 rows, so k=7 fails inside the sweep
        let config = SelectionConfig::new("y")
            .with_families(vec![ModelFamily::LinearRegression, ModelFamily::Knn])
            .with_grid(ModelFamily::Knn, vec![Hyperparameter::NNeighbors(7)]);
        let outcome = SelectionEngine::new(config).run(&linear_dataset(10)).unwrap();

        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].family, ModelFamily::Knn);
        assert_eq!(outcome.comparison.results.len(), 1);
        assert_eq!(outcome.comparison.recommended, ModelFamily::LinearRegression);
    }

    #[test]
    fn test_all_families_failing_is_an_error() {
        let config = SelectionConfig::new("y")
            .with_families(vec![ModelFamily::Knn])
            .with_grid(ModelFamily::Knn, vec![Hyperparameter::NNeighbors(50)]);
        let err = SelectionEngine::new(config).run(&linear_dataset(20)).unwrap_err();
        assert!(matches!(err, BenchError::TrainingError(_)));
    }

    #[test]
    fn test_missing_target_aborts() {
        let err = SelectionEngine::new(SelectionConfig::new("price"))
            .run(&linear_dataset(20))
            .unwrap_err();
        assert!(matches!(err, BenchError::FeatureNotFound(_)));
    }

    #[test]
    fn test_invalid_fraction_aborts() {
        let err = SelectionEngine::new(SelectionConfig::new("y").with_test_fraction(1.5))
            .run(&linear_dataset(20))
            .unwrap_err();
        assert!(matches!(err, BenchError::InvalidParameter { .. }));
    }
}
