//! Company id discovery.
//!
//! When the operator does not supply a company id, it can be read off the
//! most recently updated application page, which carries the company it
//! belongs to.

use serde_json::{json, Value};
use tracing::{debug, info, instrument};

use crate::client::{HttpClient, Params};
use crate::envelope::extract_items;
use crate::error::FetchError;

/// Field names that may carry the company id, in lookup order.
const COMPANY_KEYS: &[&str] = &["company_id", "companyId", "company"];

/// Looks up the company id via the application-pages endpoint.
///
/// # Errors
///
/// Returns the request error, or [`FetchError::CompanyIdNotFound`] if the
/// response carries no company id.
#[instrument(skip(http))]
pub async fn resolve_company_id(http: &HttpClient, endpoint: &str) -> Result<Value, FetchError> {
    let mut params = Params::new();
    params.insert("page".into(), json!(1));
    params.insert("limit".into(), json!(1));
    params.insert("column".into(), json!("updated_at"));
    params.insert("sort".into(), json!("desc"));

    let body = http.get_json(endpoint, &params).await?;
    let company_id = extract_company_id(&body).ok_or(FetchError::CompanyIdNotFound)?;

    info!(company_id = %company_id, "Resolved company id");
    Ok(company_id)
}

/// Extracts a company id from an application-pages response.
///
/// Looks at the first listed entry, then at the top-level object. Empty
/// strings and `null` do not count.
pub fn extract_company_id(body: &Value) -> Option<Value> {
    let first = extract_items(body).ok().and_then(|items| items.into_iter().next());
    if let Some(found) = first.as_ref().and_then(find_company) {
        return Some(found);
    }

    debug!("No company id on first entry, checking top level");
    body.as_object().and_then(find_company)
}

fn find_company(map: &serde_json::Map<String, Value>) -> Option<Value> {
    COMPANY_KEYS
        .iter()
        .filter_map(|key| map.get(*key))
        .find(|v| match v {
            Value::String(s) => !s.is_empty(),
            Value::Number(_) => true,
            _ => false,
        })
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_extract_from_first_entry() {
        let body = json!({"data": [{"id": 1, "companyId": 77}, {"company_id": 5}]});
        assert_eq!(extract_company_id(&body), Some(json!(77)));
    }

    #[test]
    fn test_extract_from_top_level() {
        let body = json!({"data": [{"id": 1}], "company_id": "acme"});
        assert_eq!(extract_company_id(&body), Some(json!("acme")));
    }

    #[test]
    fn test_extract_ignores_empty_values() {
        let body = json!({"items": [{"company_id": "", "company": null}]});
        assert_eq!(extract_company_id(&body), None);
    }

    #[tokio::test]
    async fn test_resolve_company_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/apps/pages"))
            .and(query_param("limit", "1"))
            .and(query_param("column", "updated_at"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"data": [{"company_id": 314}]})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let http = HttpClient::new(&server.uri(), "t").unwrap();
        assert_eq!(resolve_company_id(&http, "/apps/pages").await.unwrap(), json!(314));
    }

    #[tokio::test]
    async fn test_resolve_company_id_missing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
            .mount(&server)
            .await;

        let http = HttpClient::new(&server.uri(), "t").unwrap();
        assert!(matches!(
            resolve_company_id(&http, "/apps/pages").await,
            Err(FetchError::CompanyIdNotFound)
        ));
    }
}
