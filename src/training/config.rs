//! Selection run configuration

use crate::error::{BenchError, Result};
use crate::evaluation::RankingSignal;
use crate::training::cross_validation::DEFAULT_FOLDS;
use crate::training::models::{Hyperparameter, ModelFamily};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

/// Configuration for one model-selection run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Target column name
    pub target_column: String,

    /// Share of rows held out for the test partition
    pub test_fraction: f64,

    /// Seed for the train/test shuffle
    pub random_state: u64,

    /// Number of cross-validation folds per candidate
    pub cv_folds: usize,

    /// Families to run, in comparison order
    pub families: Vec<ModelFamily>,

    /// Replacement grids; families not listed use their default grid
    pub grids: BTreeMap<ModelFamily, Vec<Hyperparameter>>,

    /// Signal behind the recommendation
    pub ranking_signal: RankingSignal,

    /// Run families concurrently
    pub parallel: bool,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            target_column: "target".to_string(),
            test_fraction: 0.2,
            random_state: 42,
            cv_folds: DEFAULT_FOLDS,
            families: ModelFamily::ALL.to_vec(),
            grids: BTreeMap::new(),
            ranking_signal: RankingSignal::TestError,
            parallel: true,
        }
    }
}

impl SelectionConfig {
    /// Create a new configuration
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target_column: target.into(),
            ..Default::default()
        }
    }

    /// Load from a JSON file; missing keys take their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_test_fraction(mut self, fraction: f64) -> Self {
        self.test_fraction = fraction;
        self
    }

    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = seed;
        self
    }

    pub fn with_cv(mut self, folds: usize) -> Self {
        self.cv_folds = folds;
        self
    }

    pub fn with_families(mut self, families: Vec<ModelFamily>) -> Self {
        self.families = families;
        self
    }

    /// Replace the candidate grid of one family
    pub fn with_grid(mut self, family: ModelFamily, grid: Vec<Hyperparameter>) -> Self {
        self.grids.insert(family, grid);
        self
    }

    pub fn with_ranking_signal(mut self, signal: RankingSignal) -> Self {
        self.ranking_signal = signal;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Grid to sweep for `family`, built fresh on every call
    pub fn grid_for(&self, family: ModelFamily) -> Vec<Hyperparameter> {
        match self.grids.get(&family) {
            Some(grid) => grid.clone(),
            None => family.default_grid(),
        }
    }

    /// Reject unusable settings before any computation starts
    pub fn validate(&self) -> Result<()> {
        if self.target_column.trim().is_empty() {
            return Err(BenchError::ConfigError("target column must not be empty".to_string()));
        }
        if !(self.test_fraction > 0.0 && self.test_fraction < 1.0) {
            return Err(BenchError::invalid_parameter(
                "test_fraction",
                self.test_fraction,
                "must be strictly between 0 and 1",
            ));
        }
        if self.cv_folds < 2 {
            return Err(BenchError::invalid_parameter("cv_folds", self.cv_folds, "must be at least 2"));
        }
        if self.families.is_empty() {
            return Err(BenchError::ConfigError("at least one model family is required".to_string()));
        }

        let mut seen = HashSet::new();
        for family in &self.families {
            if !seen.insert(*family) {
                return Err(BenchError::ConfigError(format!("family '{}' listed twice", family)));
            }
        }

        for (family, grid) in &self.grids {
            if grid.is_empty() {
                return Err(BenchError::invalid_parameter(
                    "grid",
                    family,
                    "candidate grid must not be empty",
                ));
            }
            for candidate in grid {
                family.validate_candidate(candidate)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::training::svm::SvrKernel;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = SelectionConfig::default();
        assert_eq!(config.test_fraction, 0.2);
        assert_eq!(config.random_state, 42);
        assert_eq!(config.cv_folds, 5);
        assert_eq!(config.families, ModelFamily::ALL.to_vec());
        assert_eq!(config.ranking_signal, RankingSignal::TestError);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = SelectionConfig::new("price")
            .with_test_fraction(0.3)
            .with_random_state(7)
            .with_grid(ModelFamily::Knn, vec![Hyperparameter::NNeighbors(3)])
            .with_ranking_signal(RankingSignal::CrossValidation)
            .with_parallel(false);

        assert_eq!(config.target_column, "price");
        assert_eq!(config.grid_for(ModelFamily::Knn), vec![Hyperparameter::NNeighbors(3)]);
        assert_eq!(config.grid_for(ModelFamily::Svr).len(), 3);
        assert!(!config.parallel);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let err = SelectionConfig::default().with_test_fraction(1.5).validate().unwrap_err();
        assert!(matches!(err, BenchError::InvalidParameter { .. }));

        assert!(SelectionConfig::default().with_cv(1).validate().is_err());
        assert!(SelectionConfig::default().with_families(vec![]).validate().is_err());
        assert!(SelectionConfig::default()
            .with_families(vec![ModelFamily::Knn, ModelFamily::Knn])
            .validate()
            .is_err());
        assert!(SelectionConfig::default()
            .with_grid(ModelFamily::Knn, vec![])
            .validate()
            .is_err());
        assert!(SelectionConfig::default()
            .with_grid(ModelFamily::Knn, vec![Hyperparameter::Kernel(SvrKernel::Rbf)])
            .validate()
            .is_err());
    }

    #[test]
    fn test_from_json_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"target_column": "MedHouseVal", "ranking_signal": "cross_validation",
                "grids": {{"knn": [{{"n_neighbors": 4}}]}}}}"#
        )
        .unwrap();

        let config = SelectionConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.target_column, "MedHouseVal");
        assert_eq!(config.ranking_signal, RankingSignal::CrossValidation);
        assert_eq!(config.grid_for(ModelFamily::Knn), vec![Hyperparameter::NNeighbors(4)]);
        assert_eq!(config.test_fraction, 0.2);
    }

    #[test]
    fn test_from_json_file_rejects_invalid() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"test_fraction": 0.0}}"#).unwrap();
        assert!(SelectionConfig::from_json_file(file.path()).is_err());
    }
}
