//! Wire types for hosted inference endpoints.

use serde::{Deserialize, Serialize};

/// How sub-word tags are merged into word/phrase spans by the tagging endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationStrategy {
    None,
    #[default]
    Simple,
    First,
    Average,
    Max,
}

impl AggregationStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            AggregationStrategy::None => "none",
            AggregationStrategy::Simple => "simple",
            AggregationStrategy::First => "first",
            AggregationStrategy::Average => "average",
            AggregationStrategy::Max => "max",
        }
    }
}

impl std::str::FromStr for AggregationStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(AggregationStrategy::None),
            "simple" => Ok(AggregationStrategy::Simple),
            "first" => Ok(AggregationStrategy::First),
            "average" => Ok(AggregationStrategy::Average),
            "max" => Ok(AggregationStrategy::Max),
            other => Err(format!("unknown aggregation strategy: {}", other)),
        }
    }
}

/// Request body for a token-classification endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct TokenClassificationRequest<'a> {
    pub inputs: &'a str,
    pub parameters: TokenClassificationParameters,
}

#[derive(Debug, Clone, Serialize)]
pub struct TokenClassificationParameters {
    pub aggregation_strategy: AggregationStrategy,
}

/// One tagged span. Offsets are character offsets into the input.
///
/// Aggregated responses carry `entity_group`; raw per-token responses carry
/// `entity` instead, so both are accepted.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TokenClassification {
    #[serde(alias = "entity")]
    pub entity_group: String,
    #[serde(default)]
    pub score: f32,
    #[serde(default)]
    pub word: Option<String>,
    pub start: usize,
    pub end: usize,
}

/// Request body for a feature-extraction endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct FeatureExtractionRequest<'a> {
    pub inputs: &'a str,
}

/// Feature-extraction responses come back flat for a single input from some
/// servers and batched from others.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FeatureExtractionResponse {
    Single(Vec<f32>),
    Batch(Vec<Vec<f32>>),
}

impl FeatureExtractionResponse {
    /// The embedding for the first (only) input.
    pub fn into_first(self) -> Option<Vec<f32>> {
        match self {
            FeatureExtractionResponse::Single(v) => Some(v),
            FeatureExtractionResponse::Batch(rows) => rows.into_iter().next(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aggregated_spans() {
        let body = r#"[
            {"entity_group": "PER", "score": 0.998, "word": "Alice Smith", "start": 18, "end": 29},
            {"entity_group": "LOC", "score": 0.91, "word": "Pune", "start": 40, "end": 44}
        ]"#;

        let spans: Vec<TokenClassification> = serde_json::from_str(body).unwrap();

        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].entity_group, "PER");
        assert_eq!(spans[0].start, 18);
        assert_eq!(spans[0].end, 29);
        assert_eq!(spans[1].word.as_deref(), Some("Pune"));
    }

    #[test]
    fn test_parse_raw_entity_alias() {
        let body = r#"[{"entity": "B-PER", "score": 0.5, "start": 0, "end": 3}]"#;

        let spans: Vec<TokenClassification> = serde_json::from_str(body).unwrap();

        assert_eq!(spans[0].entity_group, "B-PER");
        assert!(spans[0].word.is_none());
    }

    #[test]
    fn test_feature_extraction_shapes() {
        let flat: FeatureExtractionResponse = serde_json::from_str("[0.1, 0.2, 0.3]").unwrap();
        assert_eq!(flat.into_first(), Some(vec![0.1, 0.2, 0.3]));

        let batched: FeatureExtractionResponse =
            serde_json::from_str("[[1.0, 2.0], [3.0, 4.0]]").unwrap();
        assert_eq!(batched.into_first(), Some(vec![1.0, 2.0]));

        let empty: FeatureExtractionResponse = serde_json::from_str("[]").unwrap();
        assert!(empty.into_first().map(|v| v.is_empty()).unwrap_or(true));
    }

    #[test]
    fn test_aggregation_strategy_parse() {
        assert_eq!(
            "Simple".parse::<AggregationStrategy>().unwrap(),
            AggregationStrategy::Simple
        );
        assert_eq!(
            "max".parse::<AggregationStrategy>().unwrap(),
            AggregationStrategy::Max
        );
        assert!("greedy".parse::<AggregationStrategy>().is_err());
    }

    #[test]
    fn test_request_serialization() {
        let request = TokenClassificationRequest {
            inputs: "hello",
            parameters: TokenClassificationParameters {
                aggregation_strategy: AggregationStrategy::Simple,
            },
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["inputs"], "hello");
        assert_eq!(json["parameters"]["aggregation_strategy"], "simple");
    }
}
