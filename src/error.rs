//! Error types for the rule engine

use thiserror::Error;

/// Main error type for parsing and evaluating rules
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    #[error("Malformed rule: {0}")]
    MalformedRule(String),

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Type mismatch on field '{field}': expected {expected}, found {actual}")]
    TypeMismatch {
        field: String,
        expected: String,
        actual: String,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<serde_json::Error> for RuleError {
    fn from(err: serde_json::Error) -> Self {
        RuleError::InvalidInput(err.to_string())
    }
}

#[cfg(feature = "python")]
impl From<RuleError> for pyo3::PyErr {
    fn from(err: RuleError) -> pyo3::PyErr {
        use pyo3::exceptions::{PyKeyError, PyTypeError, PyValueError};

        match err {
            RuleError::MalformedRule(msg) => {
                PyValueError::new_err(format!("Malformed rule: {}", msg))
            }
            RuleError::UnknownField(field) => PyKeyError::new_err(field),
            err @ RuleError::TypeMismatch { .. } => PyTypeError::new_err(err.to_string()),
            RuleError::InvalidInput(msg) => {
                PyValueError::new_err(format!("Invalid input: {}", msg))
            }
        }
    }
}

/// Result type alias for the rule engine
pub type Result<T> = std::result::Result<T, RuleError>;
