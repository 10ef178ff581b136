//! Regression Bench - cross-validated selection of regression models
//!
//! Splits a numeric dataset once, tunes each algorithm family by k-fold
//! cross-validation on the training partition, refits the winners, scores
//! them on the held-out rows, and recommends one family.
//!
//! # Modules
//!
//! ## Core
//! - [`dataset`] - In-memory tables, CSV I/O, train/test partitions
//! - [`training`] - Splitter, sweeper, trainer and the four model families
//! - [`evaluation`] - Error metrics and cross-family comparison
//!
//! ## Collaborators
//! - [`preprocessing`] - Missing values, outliers, normalization
//! - [`analysis`] - Descriptive statistics, correlation, distribution shape
//! - [`report`] - Text and JSON reports
//!
//! ## Services
//! - [`cli`] - Command-line interface
//!
//! # Example
//!
//! ```no_run
//! use regression_bench::dataset::Dataset;
//! use regression_bench::training::{SelectionConfig, SelectionEngine};
//!
//! let dataset = Dataset::load_csv("data/housing.csv")?;
//! let outcome = SelectionEngine::new(SelectionConfig::new("MedHouseVal")).run(&dataset)?;
//! println!("recommended: {}", outcome.comparison.recommended);
//! # Ok::<(), regression_bench::error::BenchError>(())
//! ```

// Core error handling
pub mod error;

// Core ML modules
pub mod dataset;
pub mod evaluation;
pub mod training;

// Collaborators
pub mod analysis;
pub mod preprocessing;
pub mod report;

// Services
pub mod cli;

// Utilities
pub mod utils;

pub use error::{BenchError, Result};

/// Re-export commonly used types
pub mod prelude {
    // Error handling
    pub use crate::error::{BenchError, Result};

    // Data
    pub use crate::dataset::{Dataset, Partition};

    // Training
    pub use crate::training::{
        split, train_final, Hyperparameter, ModelFamily, SelectionConfig, SelectionEngine, SelectionOutcome, Sweeper,
    };

    // Evaluation
    pub use crate::evaluation::{evaluate, Comparator, ComparisonResult, Metrics, RankingSignal};
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
