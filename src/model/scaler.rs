//! Standard-scaler artifact (JSON).
//!
//! Scaling is applied in place to a fixed, named subset of the aligned
//! vector's columns before prediction; every other column passes through
//! untouched. The column subset is part of the artifact, not of the code.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::{Error, Result};

/// On-disk artifact layout: per-column mean and standard deviation from
/// training, exactly as the model was fitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalerArtifact {
    /// Columns to scale (by model-schema name)
    pub columns: Vec<String>,
    /// Per-column training mean
    pub means: Vec<f64>,
    /// Per-column training standard deviation
    pub stds: Vec<f64>,
}

/// Standard scaler: x -> (x - mean) / std, per declared column
pub struct StandardScaler {
    columns: Vec<String>,
    means: Vec<f64>,
    stds: Vec<f64>,
}

impl StandardScaler {
    /// Build a scaler from an in-memory artifact, validating shape
    pub fn from_artifact(artifact: ScalerArtifact) -> Result<Self> {
        if artifact.means.len() != artifact.columns.len()
            || artifact.stds.len() != artifact.columns.len()
        {
            return Err(Error::SchemaMismatch(format!(
                "scaler artifact declares {} columns but {} means / {} stds",
                artifact.columns.len(),
                artifact.means.len(),
                artifact.stds.len()
            )));
        }
        Ok(Self { columns: artifact.columns, means: artifact.means, stds: artifact.stds })
    }

    /// Load the scaler artifact from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::Config(format!("scaler artifact not found: {}", path.display())));
        }

        let content = fs::read_to_string(path)?;
        let artifact: ScalerArtifact = serde_json::from_str(&content)?;
        log::info!(
            "loaded feature scaler from {} ({} columns)",
            path.display(),
            artifact.columns.len()
        );
        Self::from_artifact(artifact)
    }

    /// Columns this scaler transforms
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Scale the declared columns of `vector` in place.
    ///
    /// `schema` is the model's column order for `vector`. A scaler column
    /// that is not in the schema means the artifacts drifted apart and is
    /// reported as a schema mismatch rather than skipped.
    pub fn transform(&self, schema: &[String], vector: &mut [f64]) -> Result<()> {
        if schema.len() != vector.len() {
            return Err(Error::SchemaMismatch(format!(
                "vector has {} columns but schema declares {}",
                vector.len(),
                schema.len()
            )));
        }

        for (i, column) in self.columns.iter().enumerate() {
            let index = schema
                .iter()
                .position(|c| c == column)
                .ok_or_else(|| {
                    Error::SchemaMismatch(format!(
                        "scaler column {:?} is not in the model schema",
                        column
                    ))
                })?;

            let std = self.stds[i].abs().max(1e-8);
            vector[index] = (vector[index] - self.means[i]) / std;
        }
        Ok(())
    }
}
