//! Helpers shared by the integration tests.

use std::sync::Once;

use axum::body::Body;
use axum::http::{header::CONTENT_TYPE, Request, StatusCode};
use axum::Router;
use tower::ServiceExt;
use triage_core::common::pii::{byte_offset, MaskedEntity};

static TRACING: Once = Once::new();

/// Install a test subscriber that respects RUST_LOG.
/// Run tests with: RUST_LOG=debug cargo test -- --nocapture
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Undo masking by splicing each entity back in, last applied first.
///
/// Works for any list where every entity's position refers to the text as it
/// was right before that entity was applied.
pub fn unmask(masked: &str, entities: &[MaskedEntity]) -> String {
    let mut text = masked.to_string();
    for entity in entities.iter().rev() {
        let start = byte_offset(&text, entity.position[0]).expect("position in bounds");
        let end = start + entity.classification.placeholder().len();
        assert_eq!(&text[start..end], entity.classification.placeholder());
        text.replace_range(start..end, &entity.entity);
    }
    text
}

/// Send one request through the router and return status plus body text.
pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.oneshot(request).await.expect("router is infallible");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body is readable");
    (status, String::from_utf8(bytes.to_vec()).expect("body is utf-8"))
}

pub fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("valid request")
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("valid request")
}
