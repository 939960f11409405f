//! Fetch context: the immutable configuration of one run.
//!
//! The context is built once from operator input and passed by reference to
//! every fetcher. Nothing in it changes while a run is in progress.

use std::sync::Arc;
use std::time::Duration;

use complist_core::DateRange;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::{HttpClient, HttpMethod, DEFAULT_TIMEOUT_SECS};
use crate::error::FetchError;

/// Default multi-form page size.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Default per-category record limit.
pub const DEFAULT_LIMIT: usize = 10_000;

// ============================================================================
// Endpoint & Category Spec
// ============================================================================

/// An endpoint path and the method used to call it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    /// Path relative to the base URL.
    pub path: String,
    /// HTTP method.
    #[serde(default)]
    pub method: HttpMethod,
}

impl Endpoint {
    /// Creates a `GET` endpoint.
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method: HttpMethod::Get,
        }
    }

    /// Creates a `POST` endpoint.
    pub fn post(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method: HttpMethod::Post,
        }
    }
}

/// Per-category fetch configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySpec {
    /// The record endpoint.
    pub endpoint: Endpoint,
    /// Maximum number of records to fetch (per table group for data-manager).
    pub limit: usize,
    /// Lookup endpoint that must be called first (table groups).
    pub lookup: Option<Endpoint>,
}

impl CategorySpec {
    /// Creates a spec for an endpoint with a limit.
    pub fn new(endpoint: Endpoint, limit: usize) -> Self {
        Self {
            endpoint,
            limit,
            lookup: None,
        }
    }

    /// Sets the lookup endpoint.
    #[must_use]
    pub fn with_lookup(mut self, lookup: Endpoint) -> Self {
        self.lookup = Some(lookup);
        self
    }
}

// ============================================================================
// Fetch Settings
// ============================================================================

/// Settings shared by every fetcher.
#[derive(Debug, Clone)]
pub struct FetchSettings {
    /// Company scope sent as `filter={"company_id": ...}`.
    pub company_id: Option<Value>,
    /// Page size for paginated endpoints.
    pub page_size: usize,
    /// Request timeout.
    pub timeout: Duration,
    /// Client-side `updated_at` filter.
    pub date_range: DateRange,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            company_id: None,
            page_size: DEFAULT_PAGE_SIZE,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            date_range: DateRange::unbounded(),
        }
    }
}

// ============================================================================
// Fetch Context
// ============================================================================

/// Context provided to fetchers.
#[derive(Debug, Clone)]
pub struct FetchContext {
    /// Authenticated HTTP client.
    pub http: Arc<HttpClient>,
    /// Fetch settings.
    pub settings: FetchSettings,
}

impl FetchContext {
    /// Creates a context from a client and settings.
    pub fn new(http: HttpClient, settings: FetchSettings) -> Self {
        Self {
            http: Arc::new(http),
            settings,
        }
    }

    /// Creates a builder for the context.
    pub fn builder() -> FetchContextBuilder {
        FetchContextBuilder::new()
    }

    /// Returns the effective page size (never zero).
    pub fn page_size(&self) -> usize {
        self.settings.page_size.max(1)
    }

    /// Returns a copy of this context scoped to a company.
    #[must_use]
    pub fn with_company_id(&self, company_id: Value) -> Self {
        let mut ctx = self.clone();
        ctx.settings.company_id = Some(company_id);
        ctx
    }
}

// ============================================================================
// Fetch Context Builder
// ============================================================================

/// Builder for constructing a [`FetchContext`].
#[derive(Default)]
pub struct FetchContextBuilder {
    base_url: Option<String>,
    token: Option<String>,
    settings: FetchSettings,
}

impl FetchContextBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base URL.
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the bearer token.
    #[must_use]
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Sets the company id.
    #[must_use]
    pub fn company_id(mut self, company_id: impl Into<Value>) -> Self {
        self.settings.company_id = Some(company_id.into());
        self
    }

    /// Sets the page size for paginated endpoints.
    #[must_use]
    pub fn page_size(mut self, page_size: usize) -> Self {
        self.settings.page_size = page_size;
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.settings.timeout = timeout;
        self
    }

    /// Sets the date filter.
    #[must_use]
    pub fn date_range(mut self, range: DateRange) -> Self {
        self.settings.date_range = range;
        self
    }

    /// Builds the fetch context.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidUrl`] without a base URL, or any error
    /// from [`HttpClient::with_timeout`].
    pub fn build(self) -> Result<FetchContext, FetchError> {
        let base_url = self
            .base_url
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| FetchError::InvalidUrl("no base URL configured".to_string()))?;
        let token = self.token.unwrap_or_default();
        let http = HttpClient::with_timeout(&base_url, &token, self.settings.timeout)?;
        Ok(FetchContext::new(http, self.settings))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_context_builder() {
        let ctx = FetchContext::builder()
            .base_url("https://gateway.example.com")
            .token("t")
            .company_id(42)
            .page_size(25)
            .timeout(Duration::from_secs(60))
            .build()
            .unwrap();

        assert_eq!(ctx.settings.company_id, Some(json!(42)));
        assert_eq!(ctx.page_size(), 25);
        assert_eq!(ctx.http.timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_default_settings() {
        let settings = FetchSettings::default();
        assert_eq!(settings.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(settings.timeout, Duration::from_secs(30));
        assert!(settings.date_range.is_unbounded());
        assert!(settings.company_id.is_none());
    }

    #[test]
    fn test_builder_requires_base_url() {
        let result = FetchContext::builder().token("t").build();
        assert!(matches!(result, Err(FetchError::InvalidUrl(_))));
    }

    #[test]
    fn test_zero_page_size_is_clamped() {
        let ctx = FetchContext::builder()
            .base_url("https://h")
            .page_size(0)
            .build()
            .unwrap();
        assert_eq!(ctx.page_size(), 1);
    }

    #[test]
    fn test_endpoint_method_serde() {
        let endpoint: Endpoint = serde_json::from_str(r#"{"path": "/tg", "method": "POST"}"#).unwrap();
        assert_eq!(endpoint, Endpoint::post("/tg"));
        let default: Endpoint = serde_json::from_str(r#"{"path": "/f"}"#).unwrap();
        assert_eq!(default.method, HttpMethod::Get);
    }
}
