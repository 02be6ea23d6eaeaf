//! Tests for operation module

use super::*;
use crate::error::Error;
use crate::http::{HttpClient, HttpClientConfig};
use crate::output::{InvocationContext, Projection, Select, SelectableResponse};
use crate::pagination::{CursorRequest, CursorResponse};
use crate::types::{CursorLocation, JsonValue, Method};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// InvocationParams Tests
// ============================================================================

#[test]
fn test_params_bind_is_case_insensitive() {
    let mut params = InvocationParams::new(["Bucket", "Prefix"]);
    params.bind("bucket", "photos").unwrap();

    assert_eq!(params.get("BUCKET"), Some("photos"));
    assert!(params.is_bound("Bucket"));
    assert!(!params.is_bound("Prefix"));
}

#[test]
fn test_params_bind_unknown_name() {
    let mut params = InvocationParams::new(["Bucket"]);
    let err = params.bind("Region", "us-east-1").unwrap_err();

    assert!(err.is_argument_error());
    assert!(err.to_string().contains("Region"));
}

#[test]
fn test_params_context_view() {
    let params = InvocationParams::new(["Bucket", "Prefix"])
        .with("Bucket", "photos")
        .unwrap();

    assert_eq!(params.parameter("bucket"), Some(json!("photos")));
    assert_eq!(params.parameter("Prefix"), Some(serde_json::Value::Null));
    assert_eq!(params.parameter("Missing"), None);
    assert!(params.has_parameter("prefix"));
    assert_eq!(params.primary_parameter(), Some("Bucket"));
}

#[test]
fn test_params_without_declarations_have_no_primary() {
    let params = InvocationParams::default();
    assert_eq!(params.primary_parameter(), None);
    assert_eq!(params.to_json(), json!({}));
}

#[test]
fn test_params_to_json() {
    let params = InvocationParams::new(["Bucket", "Prefix"])
        .with("Bucket", "photos")
        .unwrap();

    assert_eq!(params.to_json(), json!({"Bucket": "photos", "Prefix": ""}));
}

// ============================================================================
// Request / Page Tests
// ============================================================================

#[test]
fn test_request_template_has_no_cursor() {
    let endpoint = ListEndpoint::new(
        "ListItems",
        "https://api.example.com/items",
        CursorSpec::query("next_token", "next_token"),
    )
    .with_query("status", "active")
    .with_page_size("limit", 50);

    let request = endpoint.request();
    assert_eq!(request.cursor(), None);

    let config = request.to_request_config();
    assert_eq!(config.query.get("status"), Some(&"active".to_string()));
    assert_eq!(config.query.get("limit"), Some(&"50".to_string()));
    assert!(!config.query.contains_key("next_token"));
    assert!(config.body.is_none());
}

#[test]
fn test_request_cursor_in_query() {
    let endpoint = ListEndpoint::new(
        "ListItems",
        "https://api.example.com/items",
        CursorSpec::query("next_token", "next_token"),
    );

    let mut request = endpoint.request();
    request.set_cursor(Some("abc"));
    assert_eq!(request.cursor(), Some("abc"));
    assert_eq!(
        request.to_request_config().query.get("next_token"),
        Some(&"abc".to_string())
    );

    request.set_cursor(None);
    assert!(!request.to_request_config().query.contains_key("next_token"));
}

#[test]
fn test_request_cursor_in_body() {
    let endpoint = ListEndpoint::new(
        "SearchItems",
        "https://api.example.com/search",
        CursorSpec::body("NextToken", "NextToken"),
    )
    .with_method(Method::POST)
    .with_body(json!({"Filter": "active"}))
    .with_page_size("MaxResults", 25);

    let mut request = endpoint.request();
    request.set_cursor(Some("t1"));

    let config = request.to_request_config();
    assert_eq!(
        config.body,
        Some(json!({"Filter": "active", "MaxResults": 25, "NextToken": "t1"}))
    );
    assert!(config.query.is_empty());
}

#[test]
fn test_request_cursor_in_body_without_template_body() {
    let endpoint = ListEndpoint::new(
        "SearchItems",
        "https://api.example.com/search",
        CursorSpec::body("NextToken", "NextToken"),
    );

    let mut request = endpoint.request();
    request.set_cursor(Some("t1"));

    assert_eq!(
        request.to_request_config().body,
        Some(json!({"NextToken": "t1"}))
    );
}

#[test]
fn test_endpoint_host() {
    let endpoint = ListEndpoint::new(
        "ListItems",
        "https://api.example.com:8443/items",
        CursorSpec::query("page", "next"),
    );
    assert_eq!(endpoint.host(), "api.example.com");

    let relative = ListEndpoint::new("ListItems", "/items", CursorSpec::query("page", "next"));
    assert_eq!(relative.host(), "/items");
}

#[test]
fn test_page_from_body() {
    let body = json!({
        "data": {"items": [{"id": 1}, {"id": 2}]},
        "meta": {"next": "c2"}
    });

    let page = ListPage::from_body(body.clone(), "meta.next", Some("data.items"));
    assert_eq!(page.items, vec![json!({"id": 1}), json!({"id": 2})]);
    assert_eq!(page.next_cursor(), Some("c2"));
    assert_eq!(page.to_json(), body);
    assert_eq!(page.select("data.items.1.id"), Some(json!(2)));
}

#[test]
fn test_page_cursor_variants() {
    let numeric = ListPage::from_body(json!({"next": 42}), "next", None);
    assert_eq!(numeric.next_cursor(), Some("42"));

    let empty = ListPage::from_body(json!({"next": ""}), "next", None);
    assert_eq!(empty.next_cursor(), None);

    let null = ListPage::from_body(json!({"next": null}), "next", None);
    assert_eq!(null.next_cursor(), None);

    let missing = ListPage::from_body(json!({}), "next", None);
    assert_eq!(missing.next_cursor(), None);
}

#[test]
fn test_page_items_fallbacks() {
    let top_level = ListPage::from_body(json!([1, 2, 3]), "next", None);
    assert_eq!(top_level.items.len(), 3);

    let single = ListPage::from_body(json!({"item": {"id": 1}}), "next", Some("item"));
    assert_eq!(single.items, vec![json!({"id": 1})]);

    let missing = ListPage::from_body(json!({}), "next", Some("items"));
    assert!(missing.items.is_empty());
}

#[test]
fn test_default_selection_emits_decoded_items() {
    let projection: Projection<ListPage, InvocationParams, JsonValue> =
        Select::Default.into_projection(Some("objects".to_string()));
    let params = InvocationParams::new(["Bucket"]);

    let missing = ListPage::from_body(json!({"count": 0}), "next", Some("objects"));
    assert_eq!(projection.apply(Some(&missing), &params), Some(json!([])));

    let single = ListPage::from_body(json!({"objects": {"id": 1}}), "next", Some("objects"));
    assert_eq!(
        projection.apply(Some(&single), &params),
        Some(json!([{"id": 1}]))
    );

    let null = ListPage::from_body(json!({"objects": null}), "next", Some("objects"));
    assert_eq!(projection.apply(Some(&null), &params), Some(json!([])));
}

// ============================================================================
// HttpListOperation Tests
// ============================================================================

fn operation_for(server: &MockServer, endpoint: ListEndpoint) -> HttpListOperation {
    let config = HttpClientConfig::builder().base_url(server.uri()).build();
    HttpListOperation::new(HttpClient::with_config(config).unwrap(), endpoint)
}

#[tokio::test]
async fn test_http_list_first_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/items"))
        .and(query_param("status", "active"))
        .and(query_param_is_missing("next_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"id": "a"}],
            "next_token": "p2"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let endpoint = ListEndpoint::new(
        "ListItems",
        format!("{}/items", mock_server.uri()),
        CursorSpec::query("next_token", "next_token"),
    )
    .with_query("status", "active")
    .with_items_path("items");

    let operation = operation_for(&mock_server, endpoint);
    assert_eq!(operation.name(), "ListItems");

    let page = operation.list(&operation.endpoint().request()).await.unwrap();
    assert_eq!(page.items, vec![json!({"id": "a"})]);
    assert_eq!(page.next_cursor(), Some("p2"));
}

#[tokio::test]
async fn test_http_list_sends_cursor_in_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .and(body_json(json!({"NextToken": "p2"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"Results": []})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let endpoint = ListEndpoint::new(
        "SearchItems",
        format!("{}/search", mock_server.uri()),
        CursorSpec::body("NextToken", "NextToken"),
    )
    .with_method(Method::POST)
    .with_items_path("Results");

    let operation = operation_for(&mock_server, endpoint);
    let mut request = operation.endpoint().request();
    request.set_cursor(Some("p2"));

    let page = operation.list(&request).await.unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.next_cursor(), None);
}

#[tokio::test]
async fn test_http_list_empty_body_is_last_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/items"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let endpoint = ListEndpoint::new(
        "ListItems",
        format!("{}/items", mock_server.uri()),
        CursorSpec::query("next_token", "next_token"),
    );

    let operation = operation_for(&mock_server, endpoint);
    let page = operation.list(&operation.endpoint().request()).await.unwrap();
    assert_eq!(page.body, serde_json::Value::Null);
    assert_eq!(page.next_cursor(), None);
}

#[tokio::test]
async fn test_http_list_service_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/items"))
        .respond_with(ResponseTemplate::new(403).set_body_string("AccessDenied"))
        .mount(&mock_server)
        .await;

    let endpoint = ListEndpoint::new(
        "ListItems",
        format!("{}/items", mock_server.uri()),
        CursorSpec::query("next_token", "next_token"),
    );

    let operation = operation_for(&mock_server, endpoint);
    let err = operation
        .list(&operation.endpoint().request())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::HttpStatus { status: 403, .. }));
    let err = operation.normalize_fault(err);
    assert!(matches!(err, Error::HttpStatus { status: 403, .. }));
}

#[tokio::test]
async fn test_http_list_invalid_json() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/items"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&mock_server)
        .await;

    let endpoint = ListEndpoint::new(
        "ListItems",
        format!("{}/items", mock_server.uri()),
        CursorSpec::query("next_token", "next_token"),
    );

    let operation = operation_for(&mock_server, endpoint);
    let err = operation
        .list(&operation.endpoint().request())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::JsonParse(_)));
}

#[test]
fn test_normalize_fault_rewrites_dns_failure() {
    let endpoint = ListEndpoint::new(
        "ListItems",
        "https://api.invalid/items",
        CursorSpec::query("next_token", "next_token"),
    );
    let operation = HttpListOperation::new(HttpClient::new().unwrap(), endpoint);

    let err = Error::Anyhow(anyhow::anyhow!("dns error: failed to lookup address information"));
    match operation.normalize_fault(err) {
        Error::NameResolution { endpoint, .. } => assert_eq!(endpoint, "api.invalid"),
        other => panic!("Expected NameResolution, got {other:?}"),
    }
}

#[test]
fn test_cursor_spec_constructors() {
    let query = CursorSpec::query("page_token", "next");
    assert_eq!(query.location, CursorLocation::Query);
    let body = CursorSpec::body("NextToken", "NextToken");
    assert_eq!(body.location, CursorLocation::Body);
    assert_eq!(body.response_path, "NextToken");
}

// ============================================================================
// S3 Tests
// ============================================================================

#[cfg(feature = "aws")]
mod s3 {
    use super::*;

    #[test]
    fn test_list_objects_context() {
        let mut params = ListObjectsParams::new("photos");
        params.max_keys = Some(100);

        assert_eq!(params.primary_parameter(), Some("Bucket"));
        assert_eq!(params.parameter("bucket"), Some(json!("photos")));
        assert_eq!(params.parameter("MaxKeys"), Some(json!(100)));
        assert_eq!(params.parameter("Prefix"), Some(serde_json::Value::Null));
        assert!(!params.has_parameter("Region"));
    }

    #[test]
    fn test_list_objects_request_cursor() {
        let mut request = ListObjectsParams::new("photos").request();
        assert_eq!(request.continuation_token(), None);
        request.set_cursor(Some("tok"));
        assert_eq!(request.continuation_token(), Some("tok"));
    }

    #[test]
    fn test_list_objects_page_json() {
        let page = ListObjectsPage {
            contents: vec![ObjectSummary {
                key: Some("a.jpg".to_string()),
                size: Some(10),
                last_modified: None,
                e_tag: Some("\"etag\"".to_string()),
                storage_class: Some("STANDARD".to_string()),
            }],
            next_continuation_token: Some("tok".to_string()),
            ..Default::default()
        };

        assert_eq!(page.next_cursor(), Some("tok"));
        assert_eq!(page.select("Contents.0.Key"), Some(json!("a.jpg")));
        assert_eq!(page.select("Contents.0.ETag"), Some(json!("\"etag\"")));
        assert_eq!(page.select("NextContinuationToken"), Some(json!("tok")));
    }
}
