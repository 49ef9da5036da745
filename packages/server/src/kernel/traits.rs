// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Business logic (masking, classification) lives in functions that take these traits.
//
// Naming convention: Base* for trait names (e.g., BaseEntityTagger, BaseEmbeddingService)

use anyhow::Result;
use async_trait::async_trait;

use crate::common::pii::TaggedSpan;

// =============================================================================
// Entity Tagger Trait (Infrastructure - NER model)
// =============================================================================

#[async_trait]
pub trait BaseEntityTagger: Send + Sync {
    /// Tag entities in text. Spans are aggregated to whole words/phrases and
    /// carry character offsets into `text`.
    async fn tag(&self, text: &str) -> Result<Vec<TaggedSpan>>;

    /// Readiness probe
    async fn ready(&self) -> Result<()> {
        Ok(())
    }
}

// =============================================================================
// Embedding Service Trait (Infrastructure)
// =============================================================================

#[async_trait]
pub trait BaseEmbeddingService: Send + Sync {
    /// Generate a fixed-length sentence embedding for text
    async fn generate(&self, text: &str) -> Result<Vec<f32>>;

    /// Readiness probe
    async fn ready(&self) -> Result<()> {
        Ok(())
    }
}
