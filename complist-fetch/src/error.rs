//! Fetch error types.

use complist_core::Category;
use thiserror::Error;

// ============================================================================
// Main Fetch Error
// ============================================================================

/// Error type for fetch operations.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP transport failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Request timed out.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// Server answered with a non-2xx status.
    #[error("Unexpected status {status} from {url}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Requested URL.
        url: String,
    },

    /// Response body was not JSON.
    #[error("Invalid JSON from {url}: {reason}")]
    InvalidJson {
        /// Requested URL.
        url: String,
        /// Parser message.
        reason: String,
    },

    /// Base URL and endpoint did not form a valid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Token could not be used as a header value.
    #[error("Invalid header value: {0}")]
    InvalidHeader(String),

    /// JSON was valid but not shaped as expected.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// A required endpoint was not configured.
    #[error("No endpoint configured for {0}")]
    MissingEndpoint(String),

    /// The table-group lookup that precedes data-manager fetching failed.
    #[error("Table group lookup failed: {0}")]
    TableGroupLookup(#[source] Box<FetchError>),

    /// Fetching one table group's records failed.
    #[error("Fetching table group {id} failed: {source}")]
    TableGroup {
        /// Table group identifier.
        id: String,
        /// Underlying failure.
        #[source]
        source: Box<FetchError>,
    },

    /// Company id discovery found nothing usable.
    #[error("Unable to determine company id from applications response")]
    CompanyIdNotFound,
}

impl FetchError {
    /// Returns true for network-level failures (transport, timeout, status).
    pub fn is_transport(&self) -> bool {
        match self {
            Self::Http(_) | Self::Timeout(_) | Self::Status { .. } => true,
            Self::TableGroupLookup(inner) => inner.is_transport(),
            Self::TableGroup { source, .. } => source.is_transport(),
            _ => false,
        }
    }
}

// ============================================================================
// Category Fetch Error
// ============================================================================

/// A fetch failure attributed to one category.
#[derive(Debug, Error)]
#[error("Fetch failed for category {category}: {source}")]
pub struct CategoryFetchError {
    /// The category that failed.
    pub category: Category,
    /// Underlying failure.
    #[source]
    pub source: FetchError,
}

impl CategoryFetchError {
    /// Wraps a fetch error.
    pub fn new(category: Category, source: FetchError) -> Self {
        Self { category, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_transport() {
        assert!(FetchError::Timeout(30).is_transport());
        assert!(
            FetchError::Status { status: 502, url: "https://x/y".into() }.is_transport()
        );
        assert!(!FetchError::InvalidResponse("bad".into()).is_transport());
        assert!(FetchError::TableGroupLookup(Box::new(FetchError::Timeout(30))).is_transport());
    }

    #[test]
    fn test_category_error_message() {
        let err = CategoryFetchError::new(
            Category::DataManager,
            FetchError::TableGroupLookup(Box::new(FetchError::Status {
                status: 500,
                url: "https://x/tablegroups".into(),
            })),
        );
        assert_eq!(
            err.to_string(),
            "Fetch failed for category data_manager: Table group lookup failed: \
             Unexpected status 500 from https://x/tablegroups"
        );
    }
}
