//! Data-manager fetcher.

use async_trait::async_trait;
use complist_core::{Category, ComponentRecord, RecordId};
use complist_fetch::{CategoryFetcher, CategorySpec, Endpoint, FetchContext, FetchError, Params};
use serde_json::json;
use tracing::{debug, info, instrument, warn};

use super::parser::{parse_table_groups, TableGroup};
use crate::listing::request_records;

/// Fetches data-manager records, one table group at a time.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataManagerFetcher;

impl DataManagerFetcher {
    /// Creates a new fetcher.
    pub fn new() -> Self {
        Self
    }

    /// Lists the company's table groups.
    ///
    /// # Errors
    ///
    /// Returns the request or parse error.
    #[instrument(skip(self, ctx, lookup))]
    pub async fn fetch_table_groups(
        &self,
        ctx: &FetchContext,
        lookup: &Endpoint,
        limit: usize,
    ) -> Result<Vec<TableGroup>, FetchError> {
        let mut params = Params::new();
        params.insert("limit".into(), json!(limit));
        params.insert("page".into(), json!(1));
        params.insert("sort".into(), json!(json!({"updated_at": -1}).to_string()));
        params.insert("search".into(), json!(""));

        let body = ctx
            .http
            .request_json(lookup.method, &lookup.path, &params)
            .await?;
        parse_table_groups(&body)
    }
}

#[async_trait]
impl CategoryFetcher for DataManagerFetcher {
    fn category(&self) -> Category {
        Category::DataManager
    }

    #[instrument(skip(self, ctx, spec), fields(limit = spec.limit))]
    async fn fetch(
        &self,
        ctx: &FetchContext,
        spec: &CategorySpec,
    ) -> Result<Vec<ComponentRecord>, FetchError> {
        let lookup = spec
            .lookup
            .as_ref()
            .ok_or_else(|| FetchError::MissingEndpoint("data_manager table group lookup".into()))?;

        let groups = self
            .fetch_table_groups(ctx, lookup, spec.limit)
            .await
            .map_err(|e| FetchError::TableGroupLookup(Box::new(e)))?;
        info!(count = groups.len(), "Found table groups");

        let mut records = Vec::new();
        for group in &groups {
            let Some(id) = group.id() else {
                warn!(name = %group.name(), "Skipping table group without id");
                continue;
            };

            debug!(tablegroup_id = %id, name = %group.name(), "Fetching table group");
            let mut params = Params::new();
            params.insert("tablegroup_id".into(), id.clone());
            params.insert("limit".into(), json!(spec.limit));
            params.insert("search".into(), json!(""));

            let mut batch = request_records(ctx, &spec.endpoint, &params)
                .await
                .map_err(|e| FetchError::TableGroup {
                    id: RecordId::from_json(id).to_string(),
                    source: Box::new(e),
                })?;
            batch.truncate(spec.limit);
            records.extend(batch);
        }

        info!(count = records.len(), "Fetched data-manager records");
        Ok(records)
    }
}
