//! Multi-form fetcher.
//!
//! Multi-form setups are listed page by page. Each request asks for
//! `min(page_size, limit)` records; paging stops at the first short page or
//! once `limit` records have been collected.

use async_trait::async_trait;
use complist_core::{Category, ComponentRecord};
use complist_fetch::{listing_params, CategoryFetcher, CategorySpec, FetchContext, FetchError};
use tracing::{debug, info, instrument};

use crate::listing::request_records;

/// Fetches multi-form components.
#[derive(Debug, Clone, Copy, Default)]
pub struct MultiFormFetcher;

impl MultiFormFetcher {
    /// Creates a new fetcher.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CategoryFetcher for MultiFormFetcher {
    fn category(&self) -> Category {
        Category::MultiForm
    }

    #[instrument(skip(self, ctx, spec), fields(limit = spec.limit))]
    async fn fetch(
        &self,
        ctx: &FetchContext,
        spec: &CategorySpec,
    ) -> Result<Vec<ComponentRecord>, FetchError> {
        if spec.limit == 0 {
            return Ok(Vec::new());
        }

        let page_size = ctx.page_size().min(spec.limit);
        let mut records = Vec::new();
        let mut page = 1;

        loop {
            let params = listing_params(ctx, page_size, page);
            let batch = request_records(ctx, &spec.endpoint, &params).await?;
            let received = batch.len();
            records.extend(batch);
            debug!(page, received, total = records.len(), "Fetched multi-form page");

            if received < page_size || records.len() >= spec.limit {
                break;
            }
            page += 1;
        }

        records.truncate(spec.limit);
        info!(pages = page, count = records.len(), "Fetched multi-form records");
        Ok(records)
    }
}
