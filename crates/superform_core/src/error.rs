//! Model error types
//!
//! Every variant is an invalid argument rejected at the `set` boundary.
//! The model is left untouched when one is returned.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    /// No field with this path exists
    UnknownField(String),
    /// Value of the wrong kind for the field
    TypeMismatch {
        path: String,
        expected: &'static str,
    },
    /// NaN or infinite numeric input
    NonFinite { path: String },
    /// Draw mode outside the enumerated topology set
    UnknownDrawMode(String),
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::UnknownField(path) => {
                write!(f, "Invalid argument: unknown field '{}'", path)
            }
            ModelError::TypeMismatch { path, expected } => {
                write!(f, "Invalid argument: field '{}' expects {}", path, expected)
            }
            ModelError::NonFinite { path } => {
                write!(f, "Invalid argument: field '{}' requires a finite value", path)
            }
            ModelError::UnknownDrawMode(mode) => {
                write!(f, "Invalid argument: unknown draw mode '{}'", mode)
            }
        }
    }
}

impl std::error::Error for ModelError {}
