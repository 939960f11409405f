//! Export error types.

use thiserror::Error;

/// Errors that can occur while exporting. Any of them ends the run.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV encoding or decoding failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Zip assembly or reading failed.
    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A CSV file did not start with the expected header.
    #[error("Unexpected CSV header: {0}")]
    InvalidHeader(String),
}
