use anyhow::{anyhow, Context, Result};
use dotenvy::dotenv;
use inference_client::AggregationStrategy;
use std::env;
use std::path::PathBuf;

use crate::common::pii::{Category, MaskingMode};

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub ner_endpoint_url: String,
    pub embedding_endpoint_url: String,
    pub inference_api_key: Option<String>,
    pub ner_aggregation_strategy: AggregationStrategy,
    pub classifier_head_path: PathBuf,
    pub masking_mode: MaskingMode,
    /// Per-category regex overrides from `PII_PATTERN_<CATEGORY>`
    pub pattern_overrides: Vec<(Category, String)>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let pattern_overrides = Category::REGEX_PASS_ORDER
            .iter()
            .filter_map(|category| {
                lookup(&format!("PII_PATTERN_{}", category.env_suffix()))
                    .map(|pattern| (*category, pattern))
            })
            .collect();

        Ok(Self {
            port: lookup("PORT")
                .unwrap_or_else(|| "8000".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            ner_endpoint_url: lookup("NER_ENDPOINT_URL").context("NER_ENDPOINT_URL must be set")?,
            embedding_endpoint_url: lookup("EMBEDDING_ENDPOINT_URL")
                .context("EMBEDDING_ENDPOINT_URL must be set")?,
            inference_api_key: lookup("INFERENCE_API_KEY").filter(|k| !k.is_empty()),
            ner_aggregation_strategy: lookup("NER_AGGREGATION_STRATEGY")
                .unwrap_or_else(|| "simple".to_string())
                .parse()
                .map_err(|e: String| anyhow!(e))
                .context("NER_AGGREGATION_STRATEGY must be none, simple, first, average or max")?,
            classifier_head_path: lookup("CLASSIFIER_HEAD_PATH")
                .unwrap_or_else(|| "classifier_head.json".to_string())
                .into(),
            masking_mode: lookup("PII_MASKING_MODE")
                .unwrap_or_else(|| "cumulative".to_string())
                .parse()
                .map_err(|e: String| anyhow!(e))
                .context("PII_MASKING_MODE must be cumulative or original_text")?,
            pattern_overrides,
        })
    }
}
