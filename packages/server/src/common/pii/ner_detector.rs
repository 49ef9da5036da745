//! Entity-model PII detection
//!
//! Turns the spans returned by a named-entity tagger into `full_name`
//! masks. Only the span reconciliation lives here; calling the model is the
//! job of a `BaseEntityTagger` implementation in the kernel.

use serde::{Deserialize, Serialize};

use super::detector::Category;
use super::redactor::{byte_offset, rewrite_spans, MaskedEntity, Span};
use crate::common::error::{PipelineError, PipelineResult};

/// Entity-group labels that denote a person. Taggers disagree on naming, so
/// all of these are treated as the same thing.
pub const PERSON_LABELS: [&str; 3] = ["PER", "Person", "full_name"];

/// Span tagged by the entity model.
///
/// `start`/`end` are character offsets into the text the model was given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggedSpan {
    pub entity_group: String,
    pub start: usize,
    pub end: usize,
    #[serde(default)]
    pub score: f32,
}

impl TaggedSpan {
    pub fn new(entity_group: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            entity_group: entity_group.into(),
            start,
            end,
            score: 1.0,
        }
    }

    pub fn is_person(&self) -> bool {
        PERSON_LABELS.contains(&self.entity_group.as_str())
    }
}

/// Convert the person spans among `tagged` into byte spans over `text`.
pub fn person_spans(text: &str, tagged: &[TaggedSpan]) -> PipelineResult<Vec<Span>> {
    tagged
        .iter()
        .filter(|t| t.is_person())
        .map(|t| {
            let start = byte_offset(text, t.start);
            let end = byte_offset(text, t.end);
            match (start, end) {
                (Some(start), Some(end)) => Ok(Span::new(start, end, Category::FullName)),
                _ => Err(PipelineError::MalformedEntitySpan {
                    start: t.start,
                    end: t.end,
                    len: text.chars().count(),
                    reason: "tagged span extends past end of text",
                }),
            }
        })
        .collect()
}

/// Replace every person span in `text` with `[full_name]`.
///
/// `tagged` must come from running the model over this exact `text`. Edits are
/// applied right to left; entities come back in that order.
pub fn mask_full_names(
    text: &str,
    tagged: &[TaggedSpan],
) -> PipelineResult<(String, Vec<MaskedEntity>)> {
    let spans = person_spans(text, tagged)?;

    let skipped = tagged.len() - spans.len();
    if skipped > 0 {
        tracing::debug!(skipped, "Ignored non-person entity spans");
    }

    rewrite_spans(text, spans)
}
