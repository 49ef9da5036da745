//! REST client for hosted model endpoints
//!
//! A small client for inference servers that expose the common
//! `{"inputs": ..., "parameters": ...}` request shape. Two tasks are supported:
//! token classification (named-entity tagging) and feature extraction
//! (sentence embeddings). No domain logic lives here.
//!
//! # Example
//!
//! ```rust,ignore
//! use inference_client::{AggregationStrategy, InferenceClient};
//!
//! let tagger = InferenceClient::new("http://localhost:8080/ner");
//! let spans = tagger
//!     .token_classification("My name is Alice Smith", AggregationStrategy::Simple)
//!     .await?;
//!
//! let encoder = InferenceClient::new("http://localhost:8081/embed");
//! let embedding = encoder.feature_extraction("masked email body").await?;
//! ```

pub mod error;
pub mod types;

pub use error::{InferenceError, Result};
pub use types::*;

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use tracing::{debug, warn};

/// Client bound to a single inference endpoint.
#[derive(Clone)]
pub struct InferenceClient {
    http_client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl InferenceClient {
    /// Create a client for the given endpoint URL.
    pub fn new(endpoint: impl Into<String>) -> Self {
        let endpoint: String = endpoint.into();
        Self {
            http_client: Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: None,
        }
    }

    /// Send `Authorization: Bearer <key>` with every request.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Get the endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// URL probed by [`InferenceClient::health`].
    pub fn health_url(&self) -> String {
        format!("{}/health", self.endpoint)
    }

    fn check_endpoint(&self) -> Result<()> {
        if self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://") {
            Ok(())
        } else {
            Err(InferenceError::Config(format!(
                "endpoint must be an http(s) URL, got {:?}",
                self.endpoint
            )))
        }
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => builder.header("Authorization", format!("Bearer {}", key)),
            None => builder,
        }
    }

    async fn check_status(response: Response, task: &str) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        warn!(status = %status, task, "Inference endpoint error");

        if status == StatusCode::SERVICE_UNAVAILABLE {
            return Err(InferenceError::Unavailable(body));
        }
        Err(InferenceError::Api {
            status: status.as_u16(),
            body,
        })
    }

    /// Tag entities in `text`.
    ///
    /// Returned offsets are character offsets into `text`, as produced by the
    /// model server.
    pub async fn token_classification(
        &self,
        text: &str,
        aggregation_strategy: AggregationStrategy,
    ) -> Result<Vec<TokenClassification>> {
        self.check_endpoint()?;
        let start = std::time::Instant::now();

        let request = TokenClassificationRequest {
            inputs: text,
            parameters: TokenClassificationParameters {
                aggregation_strategy,
            },
        };

        let response = self
            .authorize(self.http_client.post(&self.endpoint))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Token classification request failed");
                InferenceError::Network(e.to_string())
            })?;

        let response = Self::check_status(response, "token_classification").await?;

        let spans: Vec<TokenClassification> = response
            .json()
            .await
            .map_err(|e| InferenceError::Parse(e.to_string()))?;

        debug!(
            spans = spans.len(),
            strategy = aggregation_strategy.as_str(),
            duration_ms = start.elapsed().as_millis(),
            "Token classification"
        );

        Ok(spans)
    }

    /// Embed `text` into a fixed-length vector.
    pub async fn feature_extraction(&self, text: &str) -> Result<Vec<f32>> {
        self.check_endpoint()?;
        let start = std::time::Instant::now();

        let response = self
            .authorize(self.http_client.post(&self.endpoint))
            .header("Content-Type", "application/json")
            .json(&FeatureExtractionRequest { inputs: text })
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Feature extraction request failed");
                InferenceError::Network(e.to_string())
            })?;

        let response = Self::check_status(response, "feature_extraction").await?;

        let parsed: FeatureExtractionResponse = response
            .json()
            .await
            .map_err(|e| InferenceError::Parse(e.to_string()))?;

        let embedding = parsed
            .into_first()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| InferenceError::Parse("No embedding in response".into()))?;

        debug!(
            dim = embedding.len(),
            duration_ms = start.elapsed().as_millis(),
            "Feature extraction"
        );

        Ok(embedding)
    }

    /// Readiness probe. Succeeds when the endpoint's health route answers 2xx.
    pub async fn health(&self) -> Result<()> {
        self.check_endpoint()?;
        let response = self
            .authorize(self.http_client.get(self.health_url()))
            .send()
            .await
            .map_err(|e| InferenceError::Network(e.to_string()))?;

        Self::check_status(response, "health").await.map(|_| ())
    }
}
