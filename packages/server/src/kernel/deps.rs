//! Server dependencies (using traits for testability)
//!
//! `ServerDeps` is the one context object every request handler receives. It
//! is built once at startup, never mutated afterwards, and shared behind an
//! `Arc`; all external models sit behind trait objects so tests can inject mocks.

use std::sync::Arc;

use crate::common::classify::ClassifierHead;
use crate::common::pii::{MaskingMode, RegexBank};
use crate::kernel::{BaseEmbeddingService, BaseEntityTagger};

/// Server dependencies accessible to request handlers
#[derive(Clone)]
pub struct ServerDeps {
    pub entity_tagger: Arc<dyn BaseEntityTagger>,
    pub embedding_service: Arc<dyn BaseEmbeddingService>,
    pub classifier_head: Arc<ClassifierHead>,
    pub regex_bank: Arc<RegexBank>,
    pub masking_mode: MaskingMode,
}

impl ServerDeps {
    /// Create new ServerDeps with the given dependencies
    pub fn new(
        entity_tagger: Arc<dyn BaseEntityTagger>,
        embedding_service: Arc<dyn BaseEmbeddingService>,
        classifier_head: Arc<ClassifierHead>,
        regex_bank: Arc<RegexBank>,
        masking_mode: MaskingMode,
    ) -> Self {
        Self {
            entity_tagger,
            embedding_service,
            classifier_head,
            regex_bank,
            masking_mode,
        }
    }
}
