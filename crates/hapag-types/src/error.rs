//! Error types for data parsing in hapag-types.

use thiserror::Error;

/// Errors that can occur when interpreting sensor payloads.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// A connected reading is missing one of its required fields.
    #[error("Connected reading is missing required field `{0}`")]
    MissingField(&'static str),

    /// The name does not identify a tracked parameter.
    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),
}

/// Result type alias using hapag-types' ParseError type.
pub type ParseResult<T> = std::result::Result<T, ParseError>;
