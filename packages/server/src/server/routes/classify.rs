//! Email classification endpoint.
//!
//! POST /classify
//!
//! Masks PII in `input_email_body`, classifies the masked text and returns the
//! original body, the masked entities, the masked body and the category.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::common::pii::MaskedEntity;
use crate::kernel::{triage_email, ServerDeps};
use crate::server::render::to_pretty_json;

#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    pub input_email_body: String,
}

#[derive(Debug, Serialize)]
pub struct ClassifyResponse<'a> {
    pub input_email_body: &'a str,
    pub list_of_masked_entities: &'a [MaskedEntity],
    pub masked_email: &'a str,
    pub category_of_the_email: &'a str,
}

/// Error body for failed requests
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub detail: String,
}

fn internal_error(detail: String) -> (StatusCode, Json<ErrorDetail>) {
    (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorDetail { detail }))
}

/// Classify handler.
///
/// Any pipeline failure becomes a 500 with `{"detail": <message>}`; no
/// partially masked text is ever returned.
pub async fn classify_handler(
    Extension(deps): Extension<Arc<ServerDeps>>,
    Json(request): Json<ClassifyRequest>,
) -> Result<Response, (StatusCode, Json<ErrorDetail>)> {
    let triage = triage_email(&request.input_email_body, &deps)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Email classification failed");
            internal_error(e.to_string())
        })?;

    let body = to_pretty_json(&ClassifyResponse {
        input_email_body: &request.input_email_body,
        list_of_masked_entities: &triage.masking.entities,
        masked_email: &triage.masking.masked_text,
        category_of_the_email: &triage.category,
    })
    .map_err(|e| internal_error(e.to_string()))?;

    Ok(([(CONTENT_TYPE, "application/json")], body).into_response())
}
