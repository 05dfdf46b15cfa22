// ABOUTME: Route-level tests for the scrape API: method rejection, input validation, envelopes.
// ABOUTME: Drives the router directly with tower::ServiceExt, no sockets involved.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use joblens_core::Client;
use joblens_server::{build_router, AppState};

fn test_app() -> axum::Router {
    let client = Client::builder().build();
    build_router(AppState::new(client))
}

fn post_json(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/scrape")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn missing_url_is_bad_request() {
    let response = test_app().oneshot(post_json("{}")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["error"], "URL is required");
}

#[tokio::test]
async fn empty_url_is_bad_request() {
    let response = test_app()
        .oneshot(post_json(r#"{"url": ""}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_url_is_bad_request() {
    let response = test_app()
        .oneshot(post_json(r#"{"url": "not-a-url"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["url"], "not-a-url");
    assert!(json["error"].as_str().unwrap().contains("invalid URL"));
    assert!(json["timestamp"].as_str().is_some());
}

#[tokio::test]
async fn other_verbs_are_rejected() {
    let request = Request::builder()
        .method("GET")
        .uri("/api/scrape")
        .body(Body::empty())
        .unwrap();
    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn unsupported_site_returns_failure_envelope() {
    let response = test_app()
        .oneshot(post_json(r#"{"url": "https://random-blog.example/post/1"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["url"], "https://random-blog.example/post/1");
    assert!(json["error"].as_str().unwrap().contains("unsupported site"));
    assert!(json["timestamp"].as_str().is_some());
}

#[tokio::test]
async fn preflight_is_answered_for_cross_origin_callers() {
    let request = Request::builder()
        .method("OPTIONS")
        .uri("/api/scrape")
        .header(header::ORIGIN, "https://app.example")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();
    let response = test_app().oneshot(request).await.unwrap();
    assert!(response.status().is_success());
    assert!(response
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
}
