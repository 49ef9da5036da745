//! Kernel module - server infrastructure and dependencies.

pub mod classify;
pub mod deps;
pub mod inference;
pub mod pii;
pub mod test_dependencies;
pub mod traits;

pub use classify::{classify_email, triage_email, Triage, EMBEDDING_ENCODER};
pub use deps::ServerDeps;
pub use inference::{model_error, HttpEmbeddingService, HttpEntityTagger};
pub use pii::{detect_full_names, mask_pii, MaskingResult, ENTITY_TAGGER};
pub use test_dependencies::TestDependencies;
pub use traits::*;
