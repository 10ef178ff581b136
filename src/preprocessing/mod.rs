//! Data preprocessing module
//!
//! Provides the cleaning steps applied when a dataset is loaded:
//! - Missing value handling (mean, median, zero fill or row drop)
//! - Outlier detection (IQR fences, z-score)
//! - Column normalization (min-max, standard)
//!
//! Every step returns a new [`Dataset`](crate::dataset::Dataset); the input is
//! never modified.

mod imputer;
pub mod outlier;
mod scaler;

pub use imputer::{handle_missing, ImputeStrategy, Imputer};
pub use outlier::{detect_outliers, outlier_bounds, OutlierBounds, OutlierMethod};
pub use scaler::{normalize_columns, Scaler, ScalerType};
