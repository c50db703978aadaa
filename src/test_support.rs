//! In-memory application and request helpers for route tests.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use libris_kernel::{settings::Settings, Db, InitCtx};
use tower::ServiceExt;

use crate::bootstrap;

/// Status, `Location` header and body text of one response.
pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: String,
}

/// Fully migrated app over a single-connection in-memory database.
pub async fn test_app() -> (Router, Db) {
    let settings = Settings::default();
    let registry = bootstrap::registry().unwrap();
    let db = libris_db::connect("sqlite::memory:", 1).await.unwrap();
    registry.migrate(&db).await.unwrap();

    let ctx = InitCtx {
        settings: &settings,
        db: &db,
    };
    (bootstrap::app(&registry, &ctx), db)
}

async fn send(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let location = response
        .headers()
        .get(header::LOCATION)
        .map(|value| value.to_str().unwrap().to_string());
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    TestResponse {
        status,
        location,
        body: String::from_utf8(bytes.to_vec()).unwrap(),
    }
}

pub async fn get(app: &Router, uri: &str) -> TestResponse {
    send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

/// POST an already urlencoded body.
pub async fn post_form(app: &Router, uri: &str, body: &str) -> TestResponse {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}
