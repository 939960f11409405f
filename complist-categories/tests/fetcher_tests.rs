//! Fetcher tests against a mock platform.

use complist_categories::{
    AutomationsFetcher, CategoryRegistry, DataManagerFetcher, MultiFormFetcher, SingleFormFetcher,
};
use complist_core::Category;
use complist_fetch::{CategoryFetcher, CategorySpec, Endpoint, FetchContext, FetchError};
use serde_json::{json, Value};
use wiremock::matchers::{body_json, body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Helpers
// ============================================================================

fn records(ids: std::ops::Range<i64>) -> Value {
    let data: Vec<Value> = ids
        .map(|i| {
            json!({
                "id": i,
                "name": format!("component {i}"),
                "created_at": "2024-01-01T00:00:00Z",
                "updated_at": "2024-02-01T00:00:00Z"
            })
        })
        .collect();
    json!({ "data": data })
}

fn ctx(server: &MockServer) -> FetchContext {
    FetchContext::builder()
        .base_url(server.uri())
        .token("test-token")
        .company_id(99)
        .page_size(10)
        .build()
        .unwrap()
}

async fn mount_page(server: &MockServer, endpoint: &str, page: u32, body: Value, hits: u64) {
    Mock::given(method("GET"))
        .and(path(endpoint))
        .and(query_param("page", page.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(hits)
        .mount(server)
        .await;
}

// ============================================================================
// Single-form & Automations
// ============================================================================

#[tokio::test]
async fn single_form_truncates_to_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forms/single"))
        .and(query_param("limit", "2"))
        .and(query_param("page", "1"))
        .and(query_param("sort", r#"{"updated_at":-1}"#))
        .and(query_param("filter", r#"{"company_id":99}"#))
        .respond_with(ResponseTemplate::new(200).set_body_json(records(0..5)))
        .expect(1)
        .mount(&server)
        .await;

    let spec = CategorySpec::new(Endpoint::get("/forms/single"), 2);
    let result = SingleFormFetcher::new().fetch(&ctx(&server), &spec).await.unwrap();

    assert_eq!(result.len(), 2);
    assert_eq!(result[0].name, "component 0");
    assert_eq!(result[1].name, "component 1");
}

#[tokio::test]
async fn automations_accepts_bare_array() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/automations"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{"_id": "a1", "title": "Nightly"}])),
        )
        .mount(&server)
        .await;

    let spec = CategorySpec::new(Endpoint::get("/automations"), 10);
    let result = AutomationsFetcher::new().fetch(&ctx(&server), &spec).await.unwrap();

    assert_eq!(result.len(), 1);
    assert_eq!(result[0].id.to_string(), "a1");
    assert_eq!(result[0].name, "Nightly");
}

#[tokio::test]
async fn post_endpoint_sends_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/automations/list"))
        .and(body_partial_json(json!({"limit": 3, "page": 1})))
        .respond_with(ResponseTemplate::new(200).set_body_json(records(0..3)))
        .expect(1)
        .mount(&server)
        .await;

    let spec = CategorySpec::new(Endpoint::post("/automations/list"), 3);
    let result = AutomationsFetcher::new().fetch(&ctx(&server), &spec).await.unwrap();
    assert_eq!(result.len(), 3);
}

// ============================================================================
// Multi-form Pagination
// ============================================================================

#[tokio::test]
async fn multi_form_stops_on_short_page() {
    let server = MockServer::start().await;
    mount_page(&server, "/forms/multi", 1, records(0..10), 1).await;
    mount_page(&server, "/forms/multi", 2, records(10..20), 1).await;
    mount_page(&server, "/forms/multi", 3, records(20..25), 1).await;
    mount_page(&server, "/forms/multi", 4, records(25..30), 0).await;

    let spec = CategorySpec::new(Endpoint::get("/forms/multi"), 100);
    let result = MultiFormFetcher::new().fetch(&ctx(&server), &spec).await.unwrap();

    assert_eq!(result.len(), 25);
    assert_eq!(result[24].id.to_string(), "24");
}

#[tokio::test]
async fn multi_form_stops_at_limit() {
    let server = MockServer::start().await;
    mount_page(&server, "/forms/multi", 1, records(0..10), 1).await;
    mount_page(&server, "/forms/multi", 2, records(10..20), 1).await;
    mount_page(&server, "/forms/multi", 3, records(20..30), 0).await;

    let spec = CategorySpec::new(Endpoint::get("/forms/multi"), 15);
    let result = MultiFormFetcher::new().fetch(&ctx(&server), &spec).await.unwrap();

    assert_eq!(result.len(), 15);
    assert_eq!(result.last().unwrap().id.to_string(), "14");
}

#[tokio::test]
async fn multi_form_page_size_capped_by_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forms/multi"))
        .and(query_param("limit", "4"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(records(0..4)))
        .expect(1)
        .mount(&server)
        .await;

    let spec = CategorySpec::new(Endpoint::get("/forms/multi"), 4);
    let result = MultiFormFetcher::new().fetch(&ctx(&server), &spec).await.unwrap();
    assert_eq!(result.len(), 4);
}

#[tokio::test]
async fn multi_form_zero_limit_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(records(0..10)))
        .expect(0)
        .mount(&server)
        .await;

    let spec = CategorySpec::new(Endpoint::get("/forms/multi"), 0);
    let result = MultiFormFetcher::new().fetch(&ctx(&server), &spec).await.unwrap();
    assert!(result.is_empty());
}

// ============================================================================
// Data-manager
// ============================================================================

fn data_manager_spec(limit: usize) -> CategorySpec {
    CategorySpec::new(Endpoint::post("/data-manager"), limit)
        .with_lookup(Endpoint::post("/tablegroups"))
}

#[tokio::test]
async fn data_manager_fetches_each_table_group() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tablegroups"))
        .and(body_partial_json(json!({"page": 1, "search": ""})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [
            {"id": 1, "name": "Customers"},
            {"name": "No id"},
            {"id": 2, "name": "Orders"}
        ]})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/data-manager"))
        .and(body_partial_json(json!({"tablegroup_id": 1, "search": ""})))
        .respond_with(ResponseTemplate::new(200).set_body_json(records(0..5)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/data-manager"))
        .and(body_partial_json(json!({"tablegroup_id": 2})))
        .respond_with(ResponseTemplate::new(200).set_body_json(records(100..102)))
        .expect(1)
        .mount(&server)
        .await;

    let result = DataManagerFetcher::new()
        .fetch(&ctx(&server), &data_manager_spec(3))
        .await
        .unwrap();

    let ids: Vec<String> = result.iter().map(|r| r.id.to_string()).collect();
    assert_eq!(ids, vec!["0", "1", "2", "100", "101"]);
}

#[tokio::test]
async fn data_manager_group_request_carries_only_group_params() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tablegroups"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [{"id": "tg-1"}]})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/data-manager"))
        .and(body_json(json!({"tablegroup_id": "tg-1", "limit": 4, "search": ""})))
        .respond_with(ResponseTemplate::new(200).set_body_json(records(0..2)))
        .expect(1)
        .mount(&server)
        .await;

    let result = DataManagerFetcher::new()
        .fetch(&ctx(&server), &data_manager_spec(4))
        .await
        .unwrap();
    assert_eq!(result.len(), 2);
}

#[tokio::test]
async fn data_manager_lookup_failure_is_distinct() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tablegroups"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = DataManagerFetcher::new()
        .fetch(&ctx(&server), &data_manager_spec(10))
        .await
        .unwrap_err();

    match err {
        FetchError::TableGroupLookup(source) => {
            assert!(matches!(*source, FetchError::Status { status: 500, .. }));
        }
        other => panic!("expected lookup failure, got {other:?}"),
    }
}

#[tokio::test]
async fn data_manager_table_group_failure_names_the_group() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tablegroups"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": [{"id": "tg-7"}]})),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/data-manager"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let err = DataManagerFetcher::new()
        .fetch(&ctx(&server), &data_manager_spec(10))
        .await
        .unwrap_err();

    match err {
        FetchError::TableGroup { id, source } => {
            assert_eq!(id, "tg-7");
            assert!(matches!(*source, FetchError::InvalidJson { .. }));
        }
        other => panic!("expected table group failure, got {other:?}"),
    }
}

#[tokio::test]
async fn data_manager_without_lookup_endpoint() {
    let server = MockServer::start().await;
    let spec = CategorySpec::new(Endpoint::post("/data-manager"), 10);

    let err = DataManagerFetcher::new()
        .fetch(&ctx(&server), &spec)
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::MissingEndpoint(_)));
}

// ============================================================================
// Pipeline
// ============================================================================

#[tokio::test]
async fn failing_category_leaves_others_intact() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forms/single"))
        .respond_with(ResponseTemplate::new(200).set_body_json(records(0..5)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/forms/multi"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/tablegroups"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/automations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(records(0..3)))
        .mount(&server)
        .await;

    let pipeline = CategoryRegistry::build_pipeline([
        (Category::Automations, CategorySpec::new(Endpoint::get("/automations"), 1)),
        (Category::DataManager, data_manager_spec(10)),
        (Category::MultiForm, CategorySpec::new(Endpoint::get("/forms/multi"), 10)),
        (Category::SingleForm, CategorySpec::new(Endpoint::get("/forms/single"), 2)),
    ]);

    let outcomes = pipeline.execute(&ctx(&server)).await;
    let summary: Vec<(Category, usize, bool)> = outcomes
        .iter()
        .map(|o| (o.category, o.count(), o.is_success()))
        .collect();

    assert_eq!(
        summary,
        vec![
            (Category::SingleForm, 2, true),
            (Category::MultiForm, 0, false),
            (Category::DataManager, 0, false),
            (Category::Automations, 1, true),
        ]
    );
    assert!(matches!(
        outcomes[2].error().unwrap().source,
        FetchError::TableGroupLookup(_)
    ));
}
