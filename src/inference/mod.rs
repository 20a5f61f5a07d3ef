//! Inference: raw upload → projected, validated, scaled, classified and severity-annotated rows.

mod context;
mod pipeline;

pub use context::InferenceContext;
pub use pipeline::run_inference;

use crate::risk::Severity;
use serde::{Deserialize, Serialize};

/// Per-row outcome, in input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Zero-based index of the source row
    pub row: usize,
    /// Class index as produced by the model
    pub encoded: i64,
    /// Decoded class name
    pub class: String,
    /// Fraction in [0, 1]: attack probability (binary) or top-class probability (multi-class)
    pub confidence: f64,
    pub severity: Severity,
}

impl PredictionResult {
    pub fn confidence_pct(&self) -> f64 {
        self.confidence * 100.0
    }
}
