//! Integration tests for the health surface and its place outside the
//! rate-limited API subtree.

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{Request, StatusCode},
    routing::get,
    Json, Router,
};
use courseway_api::{api_router, ApiState, RateLimitConfig};
use courseway_store::{
    InMemoryAssignmentStore, InMemoryCourseStore, InMemorySubmissionStore, InMemoryUserStore,
};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceExt;

/// The composition main.rs serves: health beside the gated API routes.
fn app(rate_limit: RateLimitConfig) -> Router {
    let state = ApiState::new(
        Arc::new(InMemoryUserStore::new()),
        Arc::new(InMemoryCourseStore::new()),
        Arc::new(InMemoryAssignmentStore::new()),
        Arc::new(InMemorySubmissionStore::new()),
        "health-test-secret",
        86_400,
        rate_limit,
    );

    Router::new()
        .route(
            "/health",
            get(|| async {
                Json(serde_json::json!({
                    "status": "healthy",
                    "version": env!("CARGO_PKG_VERSION"),
                    "timestamp": chrono::Utc::now().to_rfc3339(),
                }))
            }),
        )
        .merge(api_router(state))
}

fn get_request(uri: &str) -> Request<Body> {
    let mut request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    request
        .extensions_mut()
        .insert(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 49152))));
    request
}

#[tokio::test]
async fn health_reports_status_and_version() {
    let response = app(RateLimitConfig::default())
        .oneshot(get_request("/health"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(content_type.contains("application/json"));

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    assert!(json.get("timestamp").is_some());
}

#[tokio::test]
async fn health_stays_reachable_when_client_is_throttled() {
    let app = app(RateLimitConfig {
        capacity: 1.0,
        refill_per_ms: 0.0,
        max_clients: 10,
    });

    // Drain the client's bucket on an API route.
    let response = app.clone().oneshot(get_request("/courses")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let response = app.clone().oneshot(get_request("/courses")).await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    // Liveness is exempt: a throttled client can still be probed.
    let response = app.clone().oneshot(get_request("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
