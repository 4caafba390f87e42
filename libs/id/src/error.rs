//! Error types for identifier parsing.

use thiserror::Error;

/// Errors that can occur when parsing an identifier from text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdError {
    /// The input was empty (or only whitespace).
    #[error("{kind} cannot be empty")]
    Empty { kind: &'static str },

    /// The input is not an integer.
    #[error("invalid {kind}: '{actual}' is not an integer")]
    NotANumber { kind: &'static str, actual: String },

    /// The input is an integer but does not fit the identifier's range.
    #[error("{kind} out of range: {actual}")]
    OutOfRange { kind: &'static str, actual: String },
}

impl IdError {
    /// Returns true if this error indicates the input was empty.
    pub fn is_empty(&self) -> bool {
        matches!(self, IdError::Empty { .. })
    }

    /// The kind of identifier that failed to parse.
    pub fn kind(&self) -> &'static str {
        match self {
            IdError::Empty { kind }
            | IdError::NotANumber { kind, .. }
            | IdError::OutOfRange { kind, .. } => kind,
        }
    }
}
