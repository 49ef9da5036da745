// Email classification
//
// Embed the masked body, then run the fitted head over the embedding.

use serde::Serialize;
use tracing::info;

use crate::common::error::PipelineResult;
use crate::kernel::inference::model_error;
use crate::kernel::pii::{mask_pii, MaskingResult};
use crate::kernel::ServerDeps;

/// Name used for the sentence encoder in errors and readiness reports.
pub const EMBEDDING_ENCODER: &str = "embedding encoder";

/// Predict the category of an already-masked email body.
pub async fn classify_email(masked_text: &str, deps: &ServerDeps) -> PipelineResult<String> {
    let embedding = deps
        .embedding_service
        .generate(masked_text)
        .await
        .map_err(|e| model_error(EMBEDDING_ENCODER, e))?;

    deps.classifier_head.predict(&embedding)
}

/// Outcome of masking and classifying one email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Triage {
    pub masking: MaskingResult,
    pub category: String,
}

/// Mask an email, then classify the masked text.
///
/// The classifier never sees the raw body.
pub async fn triage_email(body: &str, deps: &ServerDeps) -> PipelineResult<Triage> {
    let masking = mask_pii(body, deps).await?;
    let category = classify_email(&masking.masked_text, deps).await?;

    info!(category = %category, entities = masking.entities.len(), "Classified email");

    Ok(Triage { masking, category })
}
