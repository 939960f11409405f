//! Core error types for complist.

use thiserror::Error;

/// Core error type for complist operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Unknown category identifier.
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    /// A date bound could not be parsed.
    #[error("Invalid date '{0}': expected YYYY-MM-DD or an RFC 3339 timestamp")]
    InvalidDate(String),

    /// Start bound lies after the end bound.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// Start bound as given.
        start: String,
        /// End bound as given.
        end: String,
    },
}
