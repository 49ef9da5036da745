use std::path::Path;

use serde::Deserialize;

use crate::common::error::{PipelineError, PipelineResult};

const MODEL: &str = "classifier head";

/// Pre-fitted linear projection applied to raw sentence embeddings.
#[derive(Debug, Clone, Deserialize)]
pub struct Projection {
    /// Per-feature mean subtracted before projecting (length D)
    pub mean: Vec<f32>,
    /// Principal axes, one row per output component (K rows of length D)
    pub components: Vec<Vec<f32>>,
    /// Variance along each component, required when `whiten` is set
    #[serde(default)]
    pub explained_variance: Option<Vec<f32>>,
    #[serde(default)]
    pub whiten: bool,
}

/// Fully connected layer: `y = W·x + b`, one weight row per output unit.
#[derive(Debug, Clone, Deserialize)]
pub struct DenseLayer {
    pub weights: Vec<Vec<f32>>,
    pub bias: Vec<f32>,
}

impl DenseLayer {
    fn forward(&self, input: &[f32]) -> Vec<f32> {
        self.weights
            .iter()
            .zip(self.bias.iter())
            .map(|(row, b)| dot(row, input) + b)
            .collect()
    }

    fn input_dim(&self) -> usize {
        self.weights.first().map(|r| r.len()).unwrap_or(0)
    }

    fn output_dim(&self) -> usize {
        self.weights.len()
    }
}

/// Projection + feed-forward network + label table.
///
/// Hidden layers use ReLU; the last layer emits raw logits. Dropout has no
/// effect at inference, so the artifact carries none.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierHead {
    pub projection: Projection,
    pub layers: Vec<DenseLayer>,
    pub labels: Vec<String>,
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

fn invalid(reason: impl Into<String>) -> PipelineError {
    PipelineError::unavailable(MODEL, reason)
}

impl ClassifierHead {
    /// Load and validate a head from a JSON artifact on disk.
    pub fn load(path: impl AsRef<Path>) -> PipelineResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| invalid(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_json(&raw)
    }

    /// Parse and validate a head from JSON.
    pub fn from_json(raw: &str) -> PipelineResult<Self> {
        let head: ClassifierHead =
            serde_json::from_str(raw).map_err(|e| invalid(format!("invalid artifact: {}", e)))?;
        head.validate()?;
        Ok(head)
    }

    /// Check that every dimension lines up, from embedding to label table.
    pub fn validate(&self) -> PipelineResult<()> {
        let input_dim = self.projection.mean.len();
        if input_dim == 0 {
            return Err(invalid("projection mean is empty"));
        }

        let components = self.projection.components.len();
        if components == 0 {
            return Err(invalid("projection has no components"));
        }
        if let Some(i) = self
            .projection
            .components
            .iter()
            .position(|row| row.len() != input_dim)
        {
            return Err(invalid(format!(
                "component {} has length {}, expected {}",
                i,
                self.projection.components[i].len(),
                input_dim
            )));
        }

        if self.projection.whiten {
            match &self.projection.explained_variance {
                Some(v) if v.len() == components && v.iter().all(|x| *x > 0.0) => {}
                _ => {
                    return Err(invalid(
                        "whitening needs one positive explained variance per component",
                    ))
                }
            }
        }

        if self.layers.is_empty() {
            return Err(invalid("network has no layers"));
        }

        let mut width = components;
        for (i, layer) in self.layers.iter().enumerate() {
            if layer.output_dim() == 0 || layer.bias.len() != layer.output_dim() {
                return Err(invalid(format!("layer {} bias does not match its weights", i)));
            }
            if layer.weights.iter().any(|row| row.len() != width) {
                return Err(invalid(format!(
                    "layer {} expects input width {}, previous width is {}",
                    i,
                    layer.input_dim(),
                    width
                )));
            }
            width = layer.output_dim();
        }

        if self.labels.is_empty() {
            return Err(invalid("label table is empty"));
        }
        if width != self.labels.len() {
            return Err(invalid(format!(
                "network emits {} logits for {} labels",
                width,
                self.labels.len()
            )));
        }

        Ok(())
    }

    /// Length of the embeddings this head accepts.
    pub fn input_dim(&self) -> usize {
        self.projection.mean.len()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Reduce an embedding to the projection's component space.
    pub fn project(&self, embedding: &[f32]) -> Vec<f32> {
        let centered: Vec<f32> = embedding
            .iter()
            .zip(self.projection.mean.iter())
            .map(|(x, m)| x - m)
            .collect();

        let mut reduced: Vec<f32> = self
            .projection
            .components
            .iter()
            .map(|axis| dot(axis, &centered))
            .collect();

        if self.projection.whiten {
            if let Some(variance) = &self.projection.explained_variance {
                for (value, var) in reduced.iter_mut().zip(variance.iter()) {
                    *value /= var.sqrt();
                }
            }
        }

        reduced
    }

    /// Raw network outputs for an embedding.
    pub fn logits(&self, embedding: &[f32]) -> PipelineResult<Vec<f32>> {
        if embedding.len() != self.input_dim() {
            return Err(PipelineError::inference(
                MODEL,
                format!(
                    "embedding has {} dimensions, head expects {}",
                    embedding.len(),
                    self.input_dim()
                ),
            ));
        }

        let mut activations = self.project(embedding);
        let last = self.layers.len() - 1;

        for (i, layer) in self.layers.iter().enumerate() {
            activations = layer.forward(&activations);
            if i < last {
                // NaN passes through unchanged, as in torch
                for value in activations.iter_mut() {
                    if *value < 0.0 {
                        *value = 0.0;
                    }
                }
            }
        }

        Ok(activations)
    }

    /// Label of the highest logit. Ties go to the lowest index.
    pub fn predict(&self, embedding: &[f32]) -> PipelineResult<String> {
        let logits = self.logits(embedding)?;

        if logits.iter().any(|x| !x.is_finite()) {
            return Err(PipelineError::inference(MODEL, "network produced non-finite logits"));
        }

        let mut best = 0;
        for (i, value) in logits.iter().enumerate().skip(1) {
            if *value > logits[best] {
                best = i;
            }
        }

        self.labels
            .get(best)
            .cloned()
            .ok_or_else(|| PipelineError::inference(MODEL, "predicted index has no label"))
    }
}
