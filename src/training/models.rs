//! Model trait, algorithm families and hyperparameter candidates

use crate::error::{BenchError, Result};
use crate::training::decision_tree::DecisionTree;
use crate::training::knn::KNNRegressor;
use crate::training::linear_models::LinearRegression;
use crate::training::svm::{SVMRegressor, SvrKernel};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Trait for regression models
pub trait Model: Send + Sync {
    /// Fit the model to training data
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()>;

    /// Make predictions
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>>;

    /// Get feature importances (if available)
    fn feature_importances(&self) -> Option<Array1<f64>> {
        None
    }
}

/// Algorithm family compared by the selection engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelFamily {
    LinearRegression,
    Knn,
    DecisionTree,
    Svr,
}

impl ModelFamily {
    /// Every family in default run order
    pub const ALL: [ModelFamily; 4] = [
        ModelFamily::LinearRegression,
        ModelFamily::Knn,
        ModelFamily::DecisionTree,
        ModelFamily::Svr,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelFamily::LinearRegression => "linear_regression",
            ModelFamily::Knn => "knn",
            ModelFamily::DecisionTree => "decision_tree",
            ModelFamily::Svr => "svr",
        }
    }

    /// Human-readable name for reports
    pub fn display_name(&self) -> &'static str {
        match self {
            ModelFamily::LinearRegression => "Linear Regression",
            ModelFamily::Knn => "K-Nearest Neighbors",
            ModelFamily::DecisionTree => "Decision Tree",
            ModelFamily::Svr => "Support Vector Regression",
        }
    }

    /// Fresh copy of the family's ordered candidate grid
    pub fn default_grid(&self) -> Vec<Hyperparameter> {
        match self {
            ModelFamily::LinearRegression => vec![Hyperparameter::Untuned],
            ModelFamily::Knn => [3, 5, 7, 9, 11].into_iter().map(Hyperparameter::NNeighbors).collect(),
            ModelFamily::DecisionTree => [Some(3), Some(5), Some(7), Some(10), None]
                .into_iter()
                .map(Hyperparameter::MaxDepth)
                .collect(),
            ModelFamily::Svr => [SvrKernel::Linear, SvrKernel::Rbf, SvrKernel::Polynomial]
                .into_iter()
                .map(Hyperparameter::Kernel)
                .collect(),
        }
    }

    /// Check that `candidate` belongs to this family and is in range
    pub fn validate_candidate(&self, candidate: &Hyperparameter) -> Result<()> {
        match (self, candidate) {
            (ModelFamily::LinearRegression, Hyperparameter::Untuned) => Ok(()),
            (ModelFamily::Knn, Hyperparameter::NNeighbors(0)) => Err(BenchError::invalid_parameter(
                "n_neighbors",
                0,
                "must be at least 1",
            )),
            (ModelFamily::Knn, Hyperparameter::NNeighbors(_)) => Ok(()),
            (ModelFamily::DecisionTree, Hyperparameter::MaxDepth(Some(0))) => Err(
                BenchError::invalid_parameter("max_depth", 0, "must be at least 1 or unbounded"),
            ),
            (ModelFamily::DecisionTree, Hyperparameter::MaxDepth(_)) => Ok(()),
            (ModelFamily::Svr, Hyperparameter::Kernel(_)) => Ok(()),
            (family, other) => Err(BenchError::invalid_parameter(
                "candidate",
                other,
                format!("not a hyperparameter of {}", family),
            )),
        }
    }
}

impl fmt::Display for ModelFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelFamily {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "linear_regression" | "linear" | "lr" => Ok(ModelFamily::LinearRegression),
            "knn" | "k_nearest_neighbors" => Ok(ModelFamily::Knn),
            "decision_tree" | "tree" | "dt" => Ok(ModelFamily::DecisionTree),
            "svr" | "svm" => Ok(ModelFamily::Svr),
            other => Err(BenchError::ConfigError(format!("unknown model family '{}'", other))),
        }
    }
}

/// One concrete configuration drawn from a family's grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Hyperparameter {
    /// Linear regression has nothing to tune
    Untuned,
    NNeighbors(usize),
    /// `None` means unbounded depth
    MaxDepth(Option<usize>),
    Kernel(SvrKernel),
}

impl fmt::Display for Hyperparameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Hyperparameter::Untuned => f.write_str("-"),
            Hyperparameter::NNeighbors(k) => write!(f, "n_neighbors={}", k),
            Hyperparameter::MaxDepth(Some(d)) => write!(f, "max_depth={}", d),
            Hyperparameter::MaxDepth(None) => f.write_str("max_depth=None"),
            Hyperparameter::Kernel(k) => write!(f, "kernel={}", k),
        }
    }
}

/// Family-specific introspection of a fitted model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelDetails {
    Linear {
        /// Coefficient per feature name, in column order
        coefficients: Vec<(String, f64)>,
        intercept: f64,
    },
    Tree {
        /// Normalised importance per feature name
        feature_importances: BTreeMap<String, f64>,
        depth: usize,
        n_leaves: usize,
    },
    /// KNN and SVR expose nothing beyond the chosen candidate
    Opaque,
}

/// Closed set of fitted estimators, one variant per family
#[derive(Debug, Clone)]
pub enum Estimator {
    Linear(LinearRegression),
    Knn(KNNRegressor),
    Tree(DecisionTree),
    Svr(SVMRegressor),
}

impl Estimator {
    /// Build an unfitted estimator for `family` configured with `candidate`
    pub fn build(family: ModelFamily, candidate: &Hyperparameter) -> Result<Self> {
        family.validate_candidate(candidate)?;

        Ok(match *candidate {
            Hyperparameter::Untuned => Estimator::Linear(LinearRegression::new()),
            Hyperparameter::NNeighbors(k) => Estimator::Knn(KNNRegressor::new(k)),
            Hyperparameter::MaxDepth(depth) => Estimator::Tree(DecisionTree::new().with_max_depth(depth)),
            Hyperparameter::Kernel(kernel) => Estimator::Svr(SVMRegressor::new(kernel)),
        })
    }

    pub fn family(&self) -> ModelFamily {
        match self {
            Estimator::Linear(_) => ModelFamily::LinearRegression,
            Estimator::Knn(_) => ModelFamily::Knn,
            Estimator::Tree(_) => ModelFamily::DecisionTree,
            Estimator::Svr(_) => ModelFamily::Svr,
        }
    }

    fn as_model(&self) -> &dyn Model {
        match self {
            Estimator::Linear(m) => m,
            Estimator::Knn(m) => m,
            Estimator::Tree(m) => m,
            Estimator::Svr(m) => m,
        }
    }

    fn as_model_mut(&mut self) -> &mut dyn Model {
        match self {
            Estimator::Linear(m) => m,
            Estimator::Knn(m) => m,
            Estimator::Tree(m) => m,
            Estimator::Svr(m) => m,
        }
    }

    /// Family metadata keyed by `feature_names`
    pub fn describe(&self, feature_names: &[String]) -> Result<ModelDetails> {
        match self {
            Estimator::Linear(m) => {
                let coef = m.coefficients().ok_or(BenchError::ModelNotFitted)?;
                let intercept = m.intercept().ok_or(BenchError::ModelNotFitted)?;
                Ok(ModelDetails::Linear {
                    coefficients: feature_names.iter().cloned().zip(coef.iter().copied()).collect(),
                    intercept,
                })
            }
            Estimator::Tree(m) => {
                let importances = m.feature_importances().ok_or(BenchError::ModelNotFitted)?;
                Ok(ModelDetails::Tree {
                    feature_importances: feature_names
                        .iter()
                        .cloned()
                        .zip(importances.iter().copied())
                        .collect(),
                    depth: m.depth(),
                    n_leaves: m.n_leaves(),
                })
            }
            Estimator::Knn(_) | Estimator::Svr(_) => Ok(ModelDetails::Opaque),
        }
    }
}

impl Model for Estimator {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        self.as_model_mut().fit(x, y)
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        self.as_model().predict(x)
    }

    fn feature_importances(&self) -> Option<Array1<f64>> {
        self.as_model().feature_importances()
    }
}
