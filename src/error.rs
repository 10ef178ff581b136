//! Error types for the regression benchmark

use thiserror::Error;

/// Result type alias for benchmark operations
pub type Result<T> = std::result::Result<T, BenchError>;

/// Main error type for the crate
#[derive(Error, Debug)]
pub enum BenchError {
    #[error("Data error: {0}")]
    DataError(String),

    #[error("Training error: {0}")]
    TrainingError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Invalid shape: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },

    #[error("Feature not found: {0}")]
    FeatureNotFound(String),

    #[error("Model not fitted")]
    ModelNotFitted,

    #[error("Invalid parameter: {name} = {value}, {reason}")]
    InvalidParameter {
        name: String,
        value: String,
        reason: String,
    },

    #[error("Convergence failed after {iterations} iterations")]
    ConvergenceError { iterations: usize },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Computation error: {0}")]
    ComputationError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl BenchError {
    /// Shorthand for an out-of-range or otherwise unusable parameter value
    pub fn invalid_parameter(
        name: impl Into<String>,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        BenchError::InvalidParameter {
            name: name.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether this error must stop the whole selection run.
    ///
    /// Configuration and missing-column errors point at a caller bug and abort
    /// immediately. Anything else raised while sweeping or fitting one family
    /// is recorded against that family and the others continue.
    pub fn aborts_run(&self) -> bool {
        matches!(
            self,
            BenchError::ConfigError(_)
                | BenchError::InvalidParameter { .. }
                | BenchError::FeatureNotFound(_)
        )
    }
}

impl From<polars::error::PolarsError> for BenchError {
    fn from(err: polars::error::PolarsError) -> Self {
        BenchError::DataError(err.to_string())
    }
}

impl From<serde_json::Error> for BenchError {
    fn from(err: serde_json::Error) -> Self {
        BenchError::SerializationError(err.to_string())
    }
}

impl From<ndarray::ShapeError> for BenchError {
    fn from(err: ndarray::ShapeError) -> Self {
        BenchError::ShapeError {
            expected: "valid shape".to_string(),
            actual: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BenchError::DataError("test error".to_string());
        assert_eq!(err.to_string(), "Data error: test error");

        let err = BenchError::invalid_parameter("test_fraction", 1.5, "must be in (0, 1)");
        assert_eq!(
            err.to_string(),
            "Invalid parameter: test_fraction = 1.5, must be in (0, 1)"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: BenchError = io_err.into();
        assert!(matches!(err, BenchError::IoError(_)));
    }

    #[test]
    fn test_run_abort_classification() {
        assert!(BenchError::ConfigError("kernel".into()).aborts_run());
        assert!(BenchError::FeatureNotFound("target".into()).aborts_run());
        assert!(BenchError::invalid_parameter("k", 0, "must be positive").aborts_run());
        assert!(!BenchError::ComputationError("singular".into()).aborts_run());
        assert!(!BenchError::ConvergenceError { iterations: 10 }.aborts_run());
        assert!(!BenchError::ValidationError("too few rows".into()).aborts_run());
    }
}
