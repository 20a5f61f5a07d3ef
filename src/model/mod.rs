//! Capability traits for fitted artifacts, plus the concrete artifacts loaded from disk.
//!
//! Anything implementing [`Classifier`], [`Scaler`] or [`LabelDecoder`] can be plugged
//! into an [`InferenceContext`](crate::inference::InferenceContext). All three are
//! `Send + Sync`, so one loaded context can serve concurrent inference calls.

mod encoder;
mod onnx;
mod scaler;

pub use encoder::{BinaryLabels, LabelEncoder};
pub use onnx::OnnxClassifier;
pub use scaler::StandardScaler;

use crate::error::{IdsError, Result};
use ndarray::{Array2, ArrayView2};
use sha2::{Digest, Sha256};
use std::path::Path;

pub trait Classifier: Send + Sync {
    /// One encoded class per row
    fn predict(&self, x: ArrayView2<'_, f64>) -> Result<Vec<i64>>;

    /// Rows × classes probability matrix
    fn predict_proba(&self, x: ArrayView2<'_, f64>) -> Result<Array2<f64>>;

    /// Both outputs at once. Override when the backend produces them in a single pass.
    fn predict_with_proba(&self, x: ArrayView2<'_, f64>) -> Result<(Vec<i64>, Array2<f64>)> {
        Ok((self.predict(x)?, self.predict_proba(x)?))
    }
}

pub trait Scaler: Send + Sync {
    /// Feature names seen at fit time, in order; empty when the scaler was fitted on bare arrays
    fn feature_names(&self) -> &[String];

    fn n_features(&self) -> usize;

    /// Same shape in, same shape out
    fn transform(&self, x: ArrayView2<'_, f64>) -> Result<Array2<f64>>;
}

pub trait LabelDecoder: Send + Sync {
    fn inverse_transform(&self, encoded: &[i64]) -> Result<Vec<String>>;
}

/// Read an artifact file, logging its SHA-256 for audit.
pub(crate) fn read_artifact(path: &Path) -> Result<Vec<u8>> {
    let bytes = std::fs::read(path).map_err(|e| IdsError::artifact(path, e))?;
    let digest = Sha256::digest(&bytes);
    tracing::info!(
        path = %path.display(),
        bytes = bytes.len(),
        sha256 = %format!("{:x}", digest),
        "artifact loaded"
    );
    Ok(bytes)
}
