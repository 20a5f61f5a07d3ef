//! Standard scaler persisted as JSON: `{"feature_names": [...], "mean": [...], "scale": [...]}`.
//! `feature_names` may be omitted for scalers fitted on bare arrays.

use super::{read_artifact, Scaler};
use crate::error::{IdsError, Result};
use ndarray::{Array1, Array2, ArrayView2, Axis};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    #[serde(default)]
    feature_names: Vec<String>,
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl StandardScaler {
    pub fn new(feature_names: Vec<String>, mean: Vec<f64>, scale: Vec<f64>) -> std::result::Result<Self, String> {
        let s = Self {
            feature_names,
            mean,
            scale,
        };
        s.check()?;
        Ok(s)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let bytes = read_artifact(path)?;
        let scaler: StandardScaler =
            serde_json::from_slice(&bytes).map_err(|e| IdsError::artifact(path, e))?;
        scaler.check().map_err(|e| IdsError::artifact(path, e))?;
        Ok(scaler)
    }

    fn check(&self) -> std::result::Result<(), String> {
        if self.mean.len() != self.scale.len() {
            return Err(format!(
                "mean has {} entries but scale has {}",
                self.mean.len(),
                self.scale.len()
            ));
        }
        if !self.feature_names.is_empty() && self.feature_names.len() != self.mean.len() {
            return Err(format!(
                "{} feature names for {} fitted features",
                self.feature_names.len(),
                self.mean.len()
            ));
        }
        if self.mean.iter().chain(&self.scale).any(|v| !v.is_finite()) {
            return Err("non-finite mean or scale".to_string());
        }
        Ok(())
    }
}

impl Scaler for StandardScaler {
    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn n_features(&self) -> usize {
        self.mean.len()
    }

    fn transform(&self, x: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        if x.ncols() != self.mean.len() {
            return Err(IdsError::ModelInference(format!(
                "scaler expects {} features, got {}",
                self.mean.len(),
                x.ncols()
            )));
        }
        let mean = Array1::from(self.mean.clone());
        // Constant features were fitted with zero variance; leave them unscaled.
        let scale = Array1::from_iter(self.scale.iter().map(|&s| if s == 0.0 { 1.0 } else { s }));
        Ok((&x - &mean.insert_axis(Axis(0))) / &scale.insert_axis(Axis(0)))
    }
}
