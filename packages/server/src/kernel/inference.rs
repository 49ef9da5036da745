// HTTP-backed model adapters
//
// Wrap the inference client so the entity tagger and sentence encoder can be
// injected through the Base* traits.

use anyhow::{Context, Result};
use async_trait::async_trait;
use inference_client::{AggregationStrategy, InferenceClient, InferenceError};

use crate::common::error::PipelineError;
use crate::common::pii::TaggedSpan;
use crate::kernel::{BaseEmbeddingService, BaseEntityTagger};

// =============================================================================
// Entity Tagger (token-classification endpoint)
// =============================================================================

pub struct HttpEntityTagger {
    client: InferenceClient,
    aggregation_strategy: AggregationStrategy,
}

impl HttpEntityTagger {
    pub fn new(client: InferenceClient, aggregation_strategy: AggregationStrategy) -> Self {
        Self {
            client,
            aggregation_strategy,
        }
    }
}

#[async_trait]
impl BaseEntityTagger for HttpEntityTagger {
    async fn tag(&self, text: &str) -> Result<Vec<TaggedSpan>> {
        let spans = self
            .client
            .token_classification(text, self.aggregation_strategy)
            .await?;

        Ok(spans
            .into_iter()
            .map(|s| TaggedSpan {
                entity_group: s.entity_group,
                start: s.start,
                end: s.end,
                score: s.score,
            })
            .collect())
    }

    async fn ready(&self) -> Result<()> {
        self.client
            .health()
            .await
            .with_context(|| format!("entity tagger at {} is not ready", self.client.endpoint()))
    }
}

// =============================================================================
// Embedding Service (feature-extraction endpoint)
// =============================================================================

pub struct HttpEmbeddingService {
    client: InferenceClient,
}

impl HttpEmbeddingService {
    pub fn new(client: InferenceClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BaseEmbeddingService for HttpEmbeddingService {
    async fn generate(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.client.feature_extraction(text).await?)
    }

    async fn ready(&self) -> Result<()> {
        self.client
            .health()
            .await
            .with_context(|| format!("embedding encoder at {} is not ready", self.client.endpoint()))
    }
}

// =============================================================================
// Error mapping
// =============================================================================

/// Turn an adapter error into a pipeline error.
///
/// An endpoint that answered "not ready" anywhere in the cause chain is a
/// `ModelUnavailable`; everything else is an `InferenceFailure`.
pub fn model_error(model: &'static str, error: anyhow::Error) -> PipelineError {
    let unavailable = error.chain().any(|cause| {
        cause
            .downcast_ref::<InferenceError>()
            .map(InferenceError::is_unavailable)
            .unwrap_or(false)
    });

    if unavailable {
        PipelineError::unavailable(model, format!("{:#}", error))
    } else {
        PipelineError::inference(model, error)
    }
}
