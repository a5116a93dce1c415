//! Error types for the Foreshadow framework

use thiserror::Error;

/// Result type alias for Foreshadow operations
pub type Result<T> = std::result::Result<T, ForeshadowError>;

/// Main error type for the Foreshadow framework
#[derive(Error, Debug)]
pub enum ForeshadowError {
    /// An intent definition is missing a required attribute, or collides
    /// with an existing registration
    #[error("{0}")]
    ConfigError(String),

    /// Attempt to construct an abstract intent
    #[error("{0}")]
    InstantiationError(String),

    /// A hook that concrete implementations must provide was not provided
    #[error("{0}")]
    NotImplemented(String),

    /// A wrapped component lacks an optional capability
    #[error("{component} does not support {capability}")]
    CapabilityError {
        component: String,
        capability: String,
    },

    #[error("Intent not found: {0}")]
    IntentNotFound(String),

    #[error("{0}")]
    ValidationError(String),

    #[error("Invalid shape: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },

    #[error("Model not fitted")]
    ModelNotFitted,

    #[error("Data error: {0}")]
    DataError(String),

    #[error("Computation error: {0}")]
    ComputationError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ForeshadowError {
    /// Shorthand for a capability error
    pub fn capability(component: impl Into<String>, capability: impl Into<String>) -> Self {
        ForeshadowError::CapabilityError {
            component: component.into(),
            capability: capability.into(),
        }
    }

    /// Shorthand for a row-count mismatch between features and target
    pub fn row_mismatch(expected: usize, actual: usize) -> Self {
        ForeshadowError::ShapeError {
            expected: format!("{} rows", expected),
            actual: format!("{} rows", actual),
        }
    }
}

impl From<polars::error::PolarsError> for ForeshadowError {
    fn from(err: polars::error::PolarsError) -> Self {
        ForeshadowError::DataError(err.to_string())
    }
}

impl From<serde_json::Error> for ForeshadowError {
    fn from(err: serde_json::Error) -> Self {
        ForeshadowError::SerializationError(err.to_string())
    }
}

impl From<ndarray::ShapeError> for ForeshadowError {
    fn from(err: ndarray::ShapeError) -> Self {
        ForeshadowError::ShapeError {
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
        let err = ForeshadowError::DataError("test error".to_string());
        assert_eq!(err.to_string(), "Data error: test error");

        let err = ForeshadowError::capability("LinearRegression", "predict_proba");
        assert_eq!(err.to_string(), "LinearRegression does not support predict_proba");
    }

    #[test]
    fn test_config_error_is_verbatim() {
        let err = ForeshadowError::ConfigError("Subclass must define cls.dtype attribute.".into());
        assert_eq!(err.to_string(), "Subclass must define cls.dtype attribute.");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ForeshadowError = io_err.into();
        assert!(matches!(err, ForeshadowError::IoError(_)));
    }
}
