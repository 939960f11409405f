//! Single-form fetcher.
//!
//! One request for the first page with `limit` set to the category limit.
//! The server may cap or ignore the limit, so the result is truncated again
//! on this side.

use async_trait::async_trait;
use complist_core::{Category, ComponentRecord};
use complist_fetch::{CategoryFetcher, CategorySpec, FetchContext, FetchError};
use tracing::{debug, instrument};

use crate::listing::fetch_first_page;

/// Fetches single-form components.
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleFormFetcher;

impl SingleFormFetcher {
    /// Creates a new fetcher.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CategoryFetcher for SingleFormFetcher {
    fn category(&self) -> Category {
        Category::SingleForm
    }

    #[instrument(skip(self, ctx, spec), fields(limit = spec.limit))]
    async fn fetch(
        &self,
        ctx: &FetchContext,
        spec: &CategorySpec,
    ) -> Result<Vec<ComponentRecord>, FetchError> {
        let records = fetch_first_page(ctx, &spec.endpoint, spec.limit).await?;
        debug!(count = records.len(), "Fetched single-form records");
        Ok(records)
    }
}
