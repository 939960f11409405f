//! Request helpers shared by the category fetchers.

use complist_core::ComponentRecord;
use complist_fetch::{listing_params, Endpoint, FetchContext, FetchError, Params};

use crate::parser::parse_records;

/// Calls an endpoint and parses the records it returns.
///
/// # Errors
///
/// Returns the request or parse error.
pub async fn request_records(
    ctx: &FetchContext,
    endpoint: &Endpoint,
    params: &Params,
) -> Result<Vec<ComponentRecord>, FetchError> {
    let body = ctx
        .http
        .request_json(endpoint.method, &endpoint.path, params)
        .await?;
    parse_records(&body)
}

/// Fetches the first page of a listing endpoint, truncated to `limit`.
///
/// # Errors
///
/// Returns the request or parse error.
pub async fn fetch_first_page(
    ctx: &FetchContext,
    endpoint: &Endpoint,
    limit: usize,
) -> Result<Vec<ComponentRecord>, FetchError> {
    let params = listing_params(ctx, limit, 1);
    let mut records = request_records(ctx, endpoint, &params).await?;
    records.truncate(limit);
    Ok(records)
}
