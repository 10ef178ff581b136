//! Model evaluation: error metrics and cross-family comparison

pub mod comparison;
pub mod metrics;

pub use comparison::{rank, Comparator, ComparisonResult, FamilyResult, RankedFamily, RankingSignal};
pub use metrics::{evaluate, mean_squared_error, Metrics};
