//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::kernel::ServerDeps;
use crate::server::routes::{classify_handler, health_handler};

/// Build the Axum application router
///
/// `deps` is shared read-only by every request.
pub fn build_app(deps: Arc<ServerDeps>) -> Router {
    Router::new()
        .route("/classify", post(classify_handler))
        .route("/health", get(health_handler))
        .layer(Extension(deps))
        .layer(TraceLayer::new_for_http())
}
