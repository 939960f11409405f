//! Authenticated JSON client for the platform API.
//!
//! Every request goes to `base_url` joined with an endpoint path, carries the
//! bearer token, and is bounded by a fixed timeout. Failures are returned as
//! [`FetchError`]; nothing is retried.

use std::fmt;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, instrument};
use url::Url;

use crate::error::FetchError;

/// Default request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// User agent string for complist.
const USER_AGENT: &str = concat!("complist/", env!("CARGO_PKG_VERSION"));

/// Accept header sent with every request.
const ACCEPT_VALUE: &str = "application/json, text/plain, */*";

/// Request parameters: a query string for `GET`, a JSON body for `POST`.
///
/// Values must be scalars when used as a query string.
pub type Params = Map<String, Value>;

// ============================================================================
// HTTP Method
// ============================================================================

/// HTTP methods used against the platform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// Parameters go in the query string.
    #[default]
    Get,
    /// Parameters go in a JSON body.
    Post,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => f.write_str("GET"),
            Self::Post => f.write_str("POST"),
        }
    }
}

// ============================================================================
// HTTP Client
// ============================================================================

/// HTTP client bound to one base URL and bearer token.
#[derive(Clone)]
pub struct HttpClient {
    inner: Client,
    base_url: String,
    headers: HeaderMap,
    timeout: Duration,
}

impl HttpClient {
    /// Creates a client with the default timeout.
    ///
    /// # Errors
    ///
    /// Fails if the token is not a valid header value or the TLS backend
    /// cannot be initialized.
    pub fn new(base_url: &str, token: &str) -> Result<Self, FetchError> {
        Self::with_timeout(base_url, token, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a client with a custom timeout.
    ///
    /// # Errors
    ///
    /// Fails if the token is not a valid header value or the TLS backend
    /// cannot be initialized.
    pub fn with_timeout(base_url: &str, token: &str, timeout: Duration) -> Result<Self, FetchError> {
        let inner = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_VALUE));
        let mut auth = HeaderValue::from_str(&bearer(token))
            .map_err(|e| FetchError::InvalidHeader(e.to_string()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        Ok(Self {
            inner,
            base_url: base_url.trim().to_string(),
            headers,
            timeout,
        })
    }

    /// Returns the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Joins the base URL and an endpoint path with exactly one `/`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidUrl`] if the result is not a valid URL.
    pub fn url_for(&self, endpoint: &str) -> Result<String, FetchError> {
        let joined = join_url(&self.base_url, endpoint);
        Url::parse(&joined).map_err(|e| FetchError::InvalidUrl(format!("{joined}: {e}")))?;
        Ok(joined)
    }

    /// Performs a `GET` request and parses the JSON body.
    ///
    /// # Errors
    ///
    /// See [`HttpClient::request_json`].
    pub async fn get_json(&self, endpoint: &str, params: &Params) -> Result<Value, FetchError> {
        self.request_json(HttpMethod::Get, endpoint, params).await
    }

    /// Performs a `POST` request with a JSON body and parses the JSON body.
    ///
    /// # Errors
    ///
    /// See [`HttpClient::request_json`].
    pub async fn post_json(&self, endpoint: &str, params: &Params) -> Result<Value, FetchError> {
        self.request_json(HttpMethod::Post, endpoint, params).await
    }

    /// Performs a request and parses the JSON body.
    ///
    /// # Errors
    ///
    /// - [`FetchError::InvalidUrl`] if the URL cannot be built
    /// - [`FetchError::Timeout`] if the timeout elapsed
    /// - [`FetchError::Http`] for other transport failures
    /// - [`FetchError::Status`] for non-2xx responses
    /// - [`FetchError::InvalidJson`] if the body is not JSON
    #[instrument(skip(self, params), fields(method = %method))]
    pub async fn request_json(
        &self,
        method: HttpMethod,
        endpoint: &str,
        params: &Params,
    ) -> Result<Value, FetchError> {
        let url = self.url_for(endpoint)?;
        debug!(url = %url, params = params.len(), "Sending request");

        let request = match method {
            HttpMethod::Get => self.inner.get(&url).query(params),
            HttpMethod::Post => self.inner.post(&url).json(params),
        };

        let response = request
            .headers(self.headers.clone())
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        debug!(status = %status, "Response received");
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().await.map_err(|e| self.classify(e))?;
        serde_json::from_str(&body).map_err(|e| FetchError::InvalidJson {
            url,
            reason: e.to_string(),
        })
    }

    fn classify(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout(self.timeout.as_secs())
        } else {
            FetchError::Http(err)
        }
    }
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// Prefixes `Bearer ` unless the token already carries it.
fn bearer(token: &str) -> String {
    let token = token.trim();
    if token.get(..7).is_some_and(|p| p.eq_ignore_ascii_case("bearer ")) {
        token.to_string()
    } else {
        format!("Bearer {token}")
    }
}

fn join_url(base: &str, endpoint: &str) -> String {
    let base = base.trim().trim_end_matches('/');
    let endpoint = endpoint.trim().trim_start_matches('/');
    if endpoint.is_empty() {
        base.to_string()
    } else {
        format!("{base}/{endpoint}")
    }
}

// ============================================================================
// Tests
// ============================================================================
