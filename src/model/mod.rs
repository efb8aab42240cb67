//! Scoring model and scaler capabilities.
//!
//! The pipeline only ever talks to the `ScoringModel` trait, so the concrete
//! artifact representation can be swapped without touching the pipeline.
//! Artifacts are loaded once at process start and are immutable afterwards;
//! sharing them across requests via `Arc` is safe.

pub mod linear;
pub mod scaler;

pub use linear::LinearModel;
pub use scaler::StandardScaler;

use crate::Result;

/// A previously-trained scoring capability.
pub trait ScoringModel: Send + Sync {
    /// The input columns the model expects, in order. Semantically
    /// significant: prediction is order-sensitive.
    fn schema(&self) -> &[String];

    /// Predict a raw, unbounded score for an aligned input vector
    fn predict(&self, vector: &[f64]) -> Result<f64>;
}
