//! Linear scoring-model artifact (JSON).
//!
//! The artifact carries its own input schema alongside the coefficients, so
//! the aligner can conform extracted features to whatever column set and
//! order the model was trained on.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::ScoringModel;
use crate::{Error, Result};

/// On-disk artifact layout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModelArtifact {
    /// Artifact format version
    pub version: u32,
    /// Input columns, in training order
    pub features: Vec<String>,
    /// One weight per input column
    pub weights: Vec<f64>,
    /// Bias term
    pub intercept: f64,
}

/// Linear model: raw score = intercept + weights · vector
pub struct LinearModel {
    schema: Vec<String>,
    weights: Vec<f64>,
    intercept: f64,
}

impl LinearModel {
    /// Build a model from an in-memory artifact, validating shape
    pub fn from_artifact(artifact: LinearModelArtifact) -> Result<Self> {
        if artifact.weights.len() != artifact.features.len() {
            return Err(Error::SchemaMismatch(format!(
                "model artifact declares {} features but {} weights",
                artifact.features.len(),
                artifact.weights.len()
            )));
        }
        Ok(Self {
            schema: artifact.features,
            weights: artifact.weights,
            intercept: artifact.intercept,
        })
    }

    /// Load the model artifact from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::Config(format!("model artifact not found: {}", path.display())));
        }

        let content = fs::read_to_string(path)?;
        let artifact: LinearModelArtifact = serde_json::from_str(&content)?;
        log::info!(
            "loaded scoring model v{} from {} ({} features)",
            artifact.version,
            path.display(),
            artifact.features.len()
        );
        Self::from_artifact(artifact)
    }
}

impl ScoringModel for LinearModel {
    fn schema(&self) -> &[String] {
        &self.schema
    }

    fn predict(&self, vector: &[f64]) -> Result<f64> {
        if vector.len() != self.weights.len() {
            return Err(Error::Scoring(format!(
                "input vector has {} columns, model expects {}",
                vector.len(),
                self.weights.len()
            )));
        }

        let raw = self.intercept
            + self
                .weights
                .iter()
                .zip(vector.iter())
                .map(|(w, x)| w * x)
                .sum::<f64>();
        Ok(raw)
    }
}
