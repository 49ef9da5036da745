use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, Json};
use serde::Serialize;

use crate::kernel::{ServerDeps, EMBEDDING_ENCODER, ENTITY_TAGGER};

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    models: Vec<ModelHealth>,
    classifier_labels: usize,
}

#[derive(Serialize)]
pub struct ModelHealth {
    model: &'static str,
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ModelHealth {
    fn from_probe(model: &'static str, probe: anyhow::Result<()>) -> Self {
        match probe {
            Ok(()) => Self {
                model,
                status: "ok".to_string(),
                error: None,
            },
            Err(e) => Self {
                model,
                status: "error".to_string(),
                error: Some(format!("{:#}", e)),
            },
        }
    }
}

/// Health check endpoint
///
/// Probes the entity tagger and the embedding encoder. The classifier head is
/// validated at startup, so it is always present once the server is up.
///
/// Returns 200 OK if both models are ready, 503 Service Unavailable otherwise.
pub async fn health_handler(
    Extension(deps): Extension<Arc<ServerDeps>>,
) -> (StatusCode, Json<HealthResponse>) {
    let (tagger, encoder) = tokio::join!(deps.entity_tagger.ready(), deps.embedding_service.ready());

    let models = vec![
        ModelHealth::from_probe(ENTITY_TAGGER, tagger),
        ModelHealth::from_probe(EMBEDDING_ENCODER, encoder),
    ];

    let is_healthy = models.iter().all(|m| m.status == "ok");

    let (status_code, overall_status) = if is_healthy {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
    };

    (
        status_code,
        Json(HealthResponse {
            status: overall_status.to_string(),
            models,
            classifier_labels: deps.classifier_head.labels().len(),
        }),
    )
}
