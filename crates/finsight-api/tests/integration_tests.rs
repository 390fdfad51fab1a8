//! # Integration Tests for finsight-api
//!
//! Exercises the full router: greetings, item CRD round trips, the consent
//! flow against a wiremock upstream, error mapping, CORS, health probes,
//! metrics, and the OpenAPI spec.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use finsight_api::state::{AppConfig, AppState};
use finsight_setu_client::{SetuClient, SetuConfig};
use finsight_store::RecordStore;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper: build the test app with a fresh memory store and no Setu client.
fn test_app() -> axum::Router {
    finsight_api::app(AppState::new())
}

/// Helper: build the test app with a Setu client pointed at `base_url`.
fn test_app_with_setu(base_url: &str) -> axum::Router {
    let setu_config = SetuConfig {
        base_url: base_url.parse().unwrap(),
        client_id: "test-client".into(),
        client_secret: "test-secret".into(),
        product_instance_id: "test-product".into(),
        redirect_url: Some("https://app.example.com/aa/callback".into()),
        timeout_secs: 5,
    };
    let state = AppState {
        store: RecordStore::memory(),
        setu: Some(SetuClient::new(setu_config).unwrap()),
        config: AppConfig::default(),
    };
    finsight_api::app(state)
}

/// Helper: read a response body as JSON.
async fn body_json(response: axum::http::Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Helper: read a response body as a string.
async fn body_string(response: axum::http::Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

// -- Greetings ----------------------------------------------------------------

#[tokio::test]
async fn root_returns_fixed_greeting() {
    let response = test_app().oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Welcome to the Finsight backend!");
}

#[tokio::test]
async fn hello_returns_fixed_greeting() {
    let response = test_app().oneshot(get("/api/hello")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Hello from Finsight!");
}

// -- Items --------------------------------------------------------------------

#[tokio::test]
async fn created_item_appears_in_listing_with_assigned_id() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/items",
            serde_json::json!({"name": "rent", "amount": 1200}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["name"], "rent");
    let id = created["_id"].as_str().unwrap().to_string();
    assert!(!id.is_empty());

    let response = app.oneshot(get("/api/items")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let items = body_json(response).await;
    let items = items.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["_id"], id.as_str());
    assert_eq!(items[0]["amount"], 1200);
}

#[tokio::test]
async fn item_ids_are_unique_across_inserts() {
    let app = test_app();
    let mut ids = std::collections::HashSet::new();
    for i in 0..3 {
        let response = app
            .clone()
            .oneshot(post_json("/api/items", serde_json::json!({"i": i})))
            .await
            .unwrap();
        let created = body_json(response).await;
        ids.insert(created["_id"].as_str().unwrap().to_string());
    }
    assert_eq!(ids.len(), 3);
}

#[tokio::test]
async fn malformed_item_body_is_rejected() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/items")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("JSON object"));
}

#[tokio::test]
async fn non_object_item_body_is_rejected() {
    let response = test_app()
        .oneshot(post_json("/api/items", serde_json::json!([1, 2, 3])))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn delete_removes_exactly_the_named_item() {
    let app = test_app();
    for name in ["a", "b"] {
        app.clone()
            .oneshot(post_json("/api/items", serde_json::json!({"name": name})))
            .await
            .unwrap();
    }

    let request = Request::builder()
        .method("DELETE")
        .uri("/api/items/1")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Item deleted");

    let items = body_json(app.oneshot(get("/api/items")).await.unwrap()).await;
    let items = items.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["name"], "b");
}

#[tokio::test]
async fn deleting_an_unknown_item_still_succeeds() {
    let request = Request::builder()
        .method("DELETE")
        .uri("/api/items/999")
        .body(Body::empty())
        .unwrap();
    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Item deleted");
}

// -- Consent flow -------------------------------------------------------------

#[tokio::test]
async fn consent_status_for_unknown_id_returns_404() {
    let response = test_app()
        .oneshot(get("/api/consent-status/nope"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body, serde_json::json!({"error": "Consent not found"}));
}

#[tokio::test]
async fn initiate_consent_returns_503_without_setu_client() {
    let response = test_app()
        .oneshot(post_json("/api/initiate-consent", serde_json::json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn accepted_consent_is_stored_and_queryable() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/consents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "c123",
            "status": "PENDING",
            "url": "https://anumati.setu.co/c123"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = test_app_with_setu(&mock_server.uri());

    let response = app
        .clone()
        .oneshot(post_json("/api/initiate-consent", serde_json::json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["id"], "c123");

    let response = app.oneshot(get("/api/consent-status/c123")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let record = body_json(response).await;
    assert_eq!(record["consent_id"], "c123");
    assert_eq!(record["status"], "PENDING");
    assert_eq!(record["url"], "https://anumati.setu.co/c123");
    assert!(record["created_at"].is_string());
}

#[tokio::test]
async fn consent_status_defaults_to_pending_when_upstream_omits_it() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/consents"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "c77"})),
        )
        .mount(&mock_server)
        .await;

    let app = test_app_with_setu(&mock_server.uri());
    app.clone()
        .oneshot(post_json("/api/initiate-consent", serde_json::json!({})))
        .await
        .unwrap();

    let record = body_json(app.oneshot(get("/api/consent-status/c77")).await.unwrap()).await;
    assert_eq!(record["status"], "PENDING");
    assert!(record["url"].is_null());
}

#[tokio::test]
async fn upstream_rejection_passes_through_and_stores_nothing() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/consents"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "errorCode": "InvalidRequest",
            "id": "should-not-be-stored"
        })))
        .mount(&mock_server)
        .await;

    let app = test_app_with_setu(&mock_server.uri());
    let response = app
        .clone()
        .oneshot(post_json("/api/initiate-consent", serde_json::json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["errorCode"], "InvalidRequest");

    let response = app
        .oneshot(get("/api/consent-status/should-not-be-stored"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn upstream_200_without_id_stores_nothing() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/consents"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": "PENDING"})),
        )
        .mount(&mock_server)
        .await;

    let app = test_app_with_setu(&mock_server.uri());
    let response = app
        .clone()
        .oneshot(post_json("/api/initiate-consent", serde_json::json!({})))
        .await
        .unwrap();
    // The upstream reply is still relayed verbatim.
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn unreachable_upstream_returns_502_with_description() {
    // Port 9 (discard) is not listening; the connection is refused.
    let app = test_app_with_setu("http://127.0.0.1:9");
    let response = app
        .clone()
        .oneshot(post_json("/api/initiate-consent", serde_json::json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = body_json(response).await;
    assert!(!body["error"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn non_json_upstream_body_returns_502() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/consents"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&mock_server)
        .await;

    let app = test_app_with_setu(&mock_server.uri());
    let response = app
        .oneshot(post_json("/api/initiate-consent", serde_json::json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("non-JSON"));
}

// -- CORS ---------------------------------------------------------------------

#[tokio::test]
async fn responses_carry_permissive_cors_headers() {
    let request = Request::builder()
        .uri("/api/items")
        .header("origin", "http://localhost:5173")
        .body(Body::empty())
        .unwrap();
    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .unwrap(),
        "*"
    );
}

#[tokio::test]
async fn preflight_allows_the_api_verbs() {
    let request = Request::builder()
        .method("OPTIONS")
        .uri("/api/items")
        .header("origin", "http://localhost:5173")
        .header("access-control-request-method", "DELETE")
        .body(Body::empty())
        .unwrap();
    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let allowed = response
        .headers()
        .get("access-control-allow-methods")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(allowed.contains("DELETE"));
    assert!(allowed.contains("POST"));
}

// -- Ambient surfaces ---------------------------------------------------------

#[tokio::test]
async fn liveness_probe_returns_ok() {
    let response = test_app().oneshot(get("/health/liveness")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ok");
}

#[tokio::test]
async fn readiness_probe_returns_ready() {
    let response = test_app().oneshot(get("/health/readiness")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ready");
}

#[tokio::test]
async fn metrics_expose_request_counters() {
    let app = test_app();
    app.clone().oneshot(get("/api/items")).await.unwrap();

    let response = app.oneshot(get("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let text = body_string(response).await;
    assert!(text.contains("finsight_http_requests_total"));
}

#[tokio::test]
async fn openapi_spec_lists_the_api_routes() {
    let response = test_app().oneshot(get("/openapi.json")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let spec = body_json(response).await;
    assert!(spec["paths"].get("/api/items").is_some());
    assert!(spec["paths"].get("/api/consent-status/{consent_id}").is_some());
}
