// PII masking pipeline
//
// Entity-model pass first (full names), then the regex bank over the result.
// Nothing here logs the text or the matched values, only counts.

use serde::Serialize;
use tracing::{debug, info};

use crate::common::error::PipelineResult;
use crate::common::pii::{mask_full_names, MaskedEntity};
use crate::kernel::inference::model_error;
use crate::kernel::{BaseEntityTagger, ServerDeps};

/// Name used for the entity model in errors and readiness reports.
pub const ENTITY_TAGGER: &str = "entity tagger";

/// Masked text plus every entity that was replaced.
///
/// Entities are grouped by pass (full names, then each regex category in bank
/// order) and, inside a pass, listed in the order the edits were applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MaskingResult {
    pub masked_text: String,
    pub entities: Vec<MaskedEntity>,
}

/// Run the entity model over `text` and mask every person it finds.
pub async fn detect_full_names(
    text: &str,
    tagger: &dyn BaseEntityTagger,
) -> PipelineResult<(String, Vec<MaskedEntity>)> {
    let tagged = tagger
        .tag(text)
        .await
        .map_err(|e| model_error(ENTITY_TAGGER, e))?;

    debug!(tagged = tagged.len(), "Entity model returned spans");

    mask_full_names(text, &tagged)
}

/// Mask all PII in `text`.
///
/// Either every pass succeeds and the fully masked text is returned, or an
/// error is returned and no partial result escapes.
pub async fn mask_pii(text: &str, deps: &ServerDeps) -> PipelineResult<MaskingResult> {
    let (named, mut entities) = detect_full_names(text, deps.entity_tagger.as_ref()).await?;
    let names = entities.len();

    let (masked_text, pattern_entities) = deps.regex_bank.mask_with_regex(&named, deps.masking_mode)?;
    entities.extend(pattern_entities);

    info!(
        full_names = names,
        pattern_matches = entities.len() - names,
        mode = ?deps.masking_mode,
        "Masked email"
    );

    Ok(MaskingResult {
        masked_text,
        entities,
    })
}
