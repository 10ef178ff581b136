//! Model training module
//!
//! Provides the selection pipeline for four regression families:
//! - Ordinary least squares linear regression (no hyperparameters)
//! - K-nearest neighbours, tuned over the neighbour count
//! - CART decision tree, tuned over the maximum depth
//! - Support vector regression, tuned over the kernel
//!
//! Data flows through [`split`], [`Sweeper`], [`train_final`] and finally
//! the comparator in [`crate::evaluation`]. [`SelectionEngine`] wires the
//! stages together.

mod config;
pub mod cross_validation;
pub mod decision_tree;
mod engine;
pub mod knn;
pub mod linear_models;
mod models;
pub mod split;
pub mod svm;
pub mod sweep;
pub mod trainer;

pub use config::SelectionConfig;
pub use cross_validation::{CVResult, CVSplit, CrossValidator, DEFAULT_FOLDS};
pub use decision_tree::{DecisionTree, TreeNode};
pub use engine::{FamilyFailure, SelectionEngine, SelectionOutcome};
pub use knn::KNNRegressor;
pub use linear_models::LinearRegression;
pub use models::{Estimator, Hyperparameter, Model, ModelDetails, ModelFamily};
pub use split::{split, split_indices, TrainTestSplit};
pub use svm::{KernelType, SVMRegressor, SVRConfig, SvrKernel};
pub use sweep::{sweep_with, CandidateResult, SweepResult, Sweeper};
pub use trainer::{train_final, TrainedModel, TrainedModelSummary};
