// ABOUTME: HTTP boundary for the joblens scraper: router, CORS, and the scrape handler.
// ABOUTME: Exposes build_router and AppState for integration testing.

//! joblens HTTP service.
//!
//! A single POST operation at `/api/scrape` accepting `{"url": "..."}` and
//! returning the scrape envelope. Cross-origin callers get a pre-flight
//! response via the CORS layer; any verb other than POST is rejected with
//! 405, and a missing, empty, or malformed URL with 400.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use joblens_core::{Client, ScrapeEnvelope};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub client: Arc<Client>,
}

impl AppState {
    pub fn new(client: Client) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/api/scrape", post(scrape))
        .layer(cors)
        .with_state(state)
}

/// Handle one scrape request.
async fn scrape(State(state): State<AppState>, Json(body): Json<Value>) -> Response {
    let Some(url) = body
        .get("url")
        .and_then(Value::as_str)
        .filter(|u| !u.is_empty())
    else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "URL is required" })),
        )
            .into_response();
    };

    info!(url, "scrape requested");
    let (status, envelope) = match state.client.scrape(url).await {
        Ok(report) => (
            StatusCode::OK,
            ScrapeEnvelope::success(&report, state.client.absence_policy()),
        ),
        Err(err) => {
            // An unparseable URL is the caller's input error, not a
            // scrape failure.
            let status = if err.is_invalid_url() {
                StatusCode::BAD_REQUEST
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            (status, ScrapeEnvelope::failure(err.to_string(), url))
        }
    };
    (status, Json(envelope)).into_response()
}
