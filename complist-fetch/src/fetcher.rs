//! The per-category fetcher trait.
//!
//! Each category knows its own endpoint shape, pagination, and raw record
//! format. The pipeline only sees this trait.

use async_trait::async_trait;
use complist_core::{Category, ComponentRecord};
use serde_json::{json, Value};

use crate::client::Params;
use crate::context::{CategorySpec, FetchContext};
use crate::error::FetchError;

/// Fetches and normalizes one category's records.
///
/// ## Implementing a Fetcher
///
/// ```ignore
/// struct AutomationsFetcher;
///
/// #[async_trait]
/// impl CategoryFetcher for AutomationsFetcher {
///     fn category(&self) -> Category {
///         Category::Automations
///     }
///
///     async fn fetch(
///         &self,
///         ctx: &FetchContext,
///         spec: &CategorySpec,
///     ) -> Result<Vec<ComponentRecord>, FetchError> {
///         let params = listing_params(ctx, spec.limit, 1);
///         let body = ctx.http.request_json(spec.endpoint.method, &spec.endpoint.path, &params).await?;
///         // Parse and normalize
///     }
/// }
/// ```
#[async_trait]
pub trait CategoryFetcher: Send + Sync {
    /// The category this fetcher produces.
    fn category(&self) -> Category;

    /// Fetches up to `spec.limit` normalized records.
    ///
    /// Records come back in upstream order. Filtering is not applied here.
    async fn fetch(
        &self,
        ctx: &FetchContext,
        spec: &CategorySpec,
    ) -> Result<Vec<ComponentRecord>, FetchError>;
}

/// Builds the listing parameters shared by the platform's list endpoints:
/// `limit`, `page`, newest-first `sort`, and the company `filter`.
pub fn listing_params(ctx: &FetchContext, limit: usize, page: usize) -> Params {
    let mut params = Params::new();
    params.insert("limit".into(), json!(limit));
    params.insert("page".into(), json!(page));
    params.insert("sort".into(), Value::String(json!({"updated_at": -1}).to_string()));
    if let Some(company_id) = &ctx.settings.company_id {
        params.insert(
            "filter".into(),
            Value::String(json!({"company_id": company_id}).to_string()),
        );
    }
    params
}
