//! Error types for data parsing in skycache-types.

use thiserror::Error;

/// Errors that can occur when parsing or validating weather cache data.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// A field value failed validation.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A day string could not be parsed as `YYYY-MM-DD` or epoch seconds.
    #[error("Invalid day '{0}': expected YYYY-MM-DD or epoch seconds")]
    InvalidDay(String),

    /// Timestamp lies outside the representable calendar range.
    #[error("Timestamp {0} is outside the supported calendar range")]
    TimestampOutOfRange(i64),
}

/// Result type alias using skycache-types' ParseError type.
pub type ParseResult<T> = std::result::Result<T, ParseError>;
