// TestDependencies - mock implementations for testing
//
// Provides mock model services that can be injected into ServerDeps for tests.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use inference_client::InferenceError;
use std::sync::{Arc, Mutex};

use super::{BaseEmbeddingService, BaseEntityTagger, ServerDeps};
use crate::common::classify::ClassifierHead;
use crate::common::pii::{char_offset, MaskingMode, RegexBank, TaggedSpan};

/// Tiny classifier head over 3-dimensional embeddings.
///
/// `[2.5, 0.5, 0.0]` predicts "Change", `[0.5, 2.5, 0.0]` predicts "Incident"
/// and the zero vector predicts "Request".
pub const TEST_CLASSIFIER_HEAD: &str = r#"{
    "projection": {
        "mean": [0.5, 0.5, 0.5],
        "components": [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]
    },
    "layers": [
        {"weights": [[1.0, 0.0], [0.0, 1.0], [-1.0, -1.0]], "bias": [0.0, 0.0, 0.0]},
        {"weights": [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]], "bias": [0.0, 0.0]},
        {"weights": [[1.0, 0.0], [0.0, 1.0], [0.0, 0.0]], "bias": [0.0, 0.0, 0.1]}
    ],
    "labels": ["Change", "Incident", "Request"]
}"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Failure {
    None,
    Error,
    Unavailable,
}

fn fail(failure: Failure, model: &str) -> Result<()> {
    match failure {
        Failure::None => Ok(()),
        Failure::Error => Err(anyhow!("mock {} failure", model)),
        Failure::Unavailable => Err(InferenceError::Unavailable(format!("mock {} loading", model)).into()),
    }
}

// =============================================================================
// Mock Entity Tagger
// =============================================================================

pub struct MockEntityTagger {
    persons: Arc<Mutex<Vec<String>>>,
    spans: Arc<Mutex<Vec<TaggedSpan>>>,
    calls: Arc<Mutex<Vec<String>>>,
    failure: Failure,
}

impl MockEntityTagger {
    /// Tagger that finds nothing.
    pub fn new() -> Self {
        Self {
            persons: Arc::new(Mutex::new(Vec::new())),
            spans: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            failure: Failure::None,
        }
    }

    /// Tagger whose every call errors.
    pub fn failing() -> Self {
        Self {
            failure: Failure::Error,
            ..Self::new()
        }
    }

    /// Tagger whose endpoint reports it is not ready.
    pub fn unavailable() -> Self {
        Self {
            failure: Failure::Unavailable,
            ..Self::new()
        }
    }

    /// Tag every occurrence of `name` as a person.
    pub fn with_person(self, name: &str) -> Self {
        self.persons.lock().unwrap().push(name.to_string());
        self
    }

    /// Return these spans verbatim on every call, whatever the text.
    pub fn with_spans(self, spans: Vec<TaggedSpan>) -> Self {
        self.spans.lock().unwrap().extend(spans);
        self
    }

    /// Texts the tagger was called with
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockEntityTagger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseEntityTagger for MockEntityTagger {
    async fn tag(&self, text: &str) -> Result<Vec<TaggedSpan>> {
        self.calls.lock().unwrap().push(text.to_string());
        fail(self.failure, "entity tagger")?;

        let mut tagged = self.spans.lock().unwrap().clone();
        for name in self.persons.lock().unwrap().iter() {
            for (start, matched) in text.match_indices(name.as_str()) {
                tagged.push(TaggedSpan::new(
                    "PER",
                    char_offset(text, start),
                    char_offset(text, start + matched.len()),
                ));
            }
        }
        Ok(tagged)
    }

    async fn ready(&self) -> Result<()> {
        fail(self.failure, "entity tagger")
    }
}

// =============================================================================
// Mock Embedding Service
// =============================================================================

pub struct MockEmbeddingService {
    embedding: Vec<f32>,
    calls: Arc<Mutex<Vec<String>>>,
    failure: Failure,
}

impl MockEmbeddingService {
    /// Encoder that maps every text to the zero vector of the test head.
    pub fn new() -> Self {
        Self {
            embedding: vec![0.0; 3],
            calls: Arc::new(Mutex::new(Vec::new())),
            failure: Failure::None,
        }
    }

    pub fn failing() -> Self {
        Self {
            failure: Failure::Error,
            ..Self::new()
        }
    }

    pub fn unavailable() -> Self {
        Self {
            failure: Failure::Unavailable,
            ..Self::new()
        }
    }

    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = embedding;
        self
    }

    /// Texts the encoder was called with
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockEmbeddingService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseEmbeddingService for MockEmbeddingService {
    async fn generate(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.lock().unwrap().push(text.to_string());
        fail(self.failure, "embedding encoder")?;
        Ok(self.embedding.clone())
    }

    async fn ready(&self) -> Result<()> {
        fail(self.failure, "embedding encoder")
    }
}

// =============================================================================
// TestDependencies - Builder for test dependencies
// =============================================================================

#[derive(Clone)]
pub struct TestDependencies {
    pub entity_tagger: Arc<MockEntityTagger>,
    pub embedding_service: Arc<MockEmbeddingService>,
    pub regex_bank: Arc<RegexBank>,
    pub masking_mode: MaskingMode,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            entity_tagger: Arc::new(MockEntityTagger::new()),
            embedding_service: Arc::new(MockEmbeddingService::new()),
            regex_bank: Arc::new(RegexBank::compile().expect("default patterns compile")),
            masking_mode: MaskingMode::default(),
        }
    }

    /// Set a mock entity tagger
    pub fn mock_tagger(self, tagger: MockEntityTagger) -> Self {
        self.mock_tagger_arc(Arc::new(tagger))
    }

    /// Set a shared mock entity tagger, keeping a handle to inspect its calls
    pub fn mock_tagger_arc(mut self, tagger: Arc<MockEntityTagger>) -> Self {
        self.entity_tagger = tagger;
        self
    }

    /// Set a mock embedding service
    pub fn mock_embeddings(self, service: MockEmbeddingService) -> Self {
        self.mock_embeddings_arc(Arc::new(service))
    }

    pub fn mock_embeddings_arc(mut self, service: Arc<MockEmbeddingService>) -> Self {
        self.embedding_service = service;
        self
    }

    pub fn regex_bank(mut self, bank: RegexBank) -> Self {
        self.regex_bank = Arc::new(bank);
        self
    }

    pub fn masking_mode(mut self, mode: MaskingMode) -> Self {
        self.masking_mode = mode;
        self
    }

    /// Convert into ServerDeps for testing
    pub fn into_deps(self) -> Arc<ServerDeps> {
        let head = ClassifierHead::from_json(TEST_CLASSIFIER_HEAD).expect("test head is valid");
        Arc::new(ServerDeps::new(
            self.entity_tagger,
            self.embedding_service,
            Arc::new(head),
            self.regex_bank,
            self.masking_mode,
        ))
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
