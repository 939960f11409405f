//! Automations fetcher.

use async_trait::async_trait;
use complist_core::{Category, ComponentRecord};
use complist_fetch::{CategoryFetcher, CategorySpec, FetchContext, FetchError};
use tracing::{debug, instrument};

use crate::listing::fetch_first_page;

/// Fetches automation definitions. Same request shape as single-form.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutomationsFetcher;

impl AutomationsFetcher {
    /// Creates a new fetcher.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CategoryFetcher for AutomationsFetcher {
    fn category(&self) -> Category {
        Category::Automations
    }

    #[instrument(skip(self, ctx, spec), fields(limit = spec.limit))]
    async fn fetch(
        &self,
        ctx: &FetchContext,
        spec: &CategorySpec,
    ) -> Result<Vec<ComponentRecord>, FetchError> {
        let records = fetch_first_page(ctx, &spec.endpoint, spec.limit).await?;
        debug!(count = records.len(), "Fetched automations");
        Ok(records)
    }
}
