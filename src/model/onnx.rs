//! ONNX Runtime classifier. Input: [N, n_features] f32. Outputs: label i64 [N] and
//! probabilities f32 [N, C] (a classifier exported without the zipmap post-processor).
//! Outputs are located by name (`label`, `probabilities`) or else by position.

use super::{read_artifact, Classifier};
use crate::error::{IdsError, Result};
use ndarray::{Array2, ArrayView2, CowArray, Ix2};
use ort::{Environment, GraphOptimizationLevel, Session, SessionBuilder, Value};
use std::path::Path;
use std::sync::Arc;

pub struct OnnxClassifier {
    // The session borrows the runtime environment; keep it alive alongside.
    _env: Arc<Environment>,
    session: Session,
    label_output: usize,
    proba_output: usize,
}

fn inference_err(e: impl std::fmt::Display) -> IdsError {
    IdsError::ModelInference(e.to_string())
}

impl OnnxClassifier {
    /// Load model from path. Missing or unreadable model is fatal.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = read_artifact(path)?;
        let env = Environment::builder()
            .with_name("flow-ids")
            .build()
            .map_err(|e| IdsError::artifact(path, e))?
            .into_arc();

        let session = SessionBuilder::new(&env)
            .and_then(|b| b.with_optimization_level(GraphOptimizationLevel::Level3))
            .and_then(|b| b.with_model_from_memory(&bytes))
            .map_err(|e| IdsError::artifact(path, e))?;

        if session.outputs.len() < 2 {
            return Err(IdsError::artifact(
                path,
                format!(
                    "classifier must expose label and probability outputs, found {}",
                    session.outputs.len()
                ),
            ));
        }
        let position = |name: &str| session.outputs.iter().position(|o| o.name == name);
        let label_output = position("label").unwrap_or(0);
        let proba_output = position("probabilities").unwrap_or(1);

        tracing::debug!(
            inputs = session.inputs.len(),
            label_output,
            proba_output,
            "onnx session ready"
        );

        Ok(Self {
            _env: env,
            session,
            label_output,
            proba_output,
        })
    }

    fn run(&self, x: ArrayView2<'_, f64>) -> Result<(Vec<i64>, Array2<f64>)> {
        let n_rows = x.nrows();
        let input = CowArray::from(x.mapv(|v| v as f32).into_dyn());
        let tensor = Value::from_array(self.session.allocator(), &input).map_err(inference_err)?;
        let outputs: Vec<Value> = self.session.run(vec![tensor]).map_err(inference_err)?;

        let labels: Vec<i64> = {
            let t = outputs[self.label_output]
                .try_extract::<i64>()
                .map_err(inference_err)?;
            let view = t.view();
            view.iter().copied().collect()
        };
        let proba: Array2<f64> = {
            let t = outputs[self.proba_output]
                .try_extract::<f32>()
                .map_err(inference_err)?;
            let view = t.view();
            view.mapv(f64::from)
                .into_dimensionality::<Ix2>()
                .map_err(inference_err)?
        };

        if labels.len() != n_rows {
            return Err(IdsError::ModelInference(format!(
                "model returned {} labels for {} rows",
                labels.len(),
                n_rows
            )));
        }
        Ok((labels, proba))
    }
}

impl Classifier for OnnxClassifier {
    fn predict(&self, x: ArrayView2<'_, f64>) -> Result<Vec<i64>> {
        self.run(x).map(|(labels, _)| labels)
    }

    fn predict_proba(&self, x: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        self.run(x).map(|(_, proba)| proba)
    }

    fn predict_with_proba(&self, x: ArrayView2<'_, f64>) -> Result<(Vec<i64>, Array2<f64>)> {
        self.run(x)
    }
}
