//! Encoded class index → class name.

use super::{read_artifact, LabelDecoder};
use crate::error::{IdsError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Label encoder persisted as JSON: `{"classes": ["BENIGN", "DoS", ...]}`; index i decodes to `classes[i]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    pub fn new(classes: Vec<String>) -> Self {
        Self { classes }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let bytes = read_artifact(path)?;
        let enc: LabelEncoder =
            serde_json::from_slice(&bytes).map_err(|e| IdsError::artifact(path, e))?;
        if enc.classes.is_empty() {
            return Err(IdsError::artifact(path, "encoder has no classes"));
        }
        Ok(enc)
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }
}

impl LabelDecoder for LabelEncoder {
    fn inverse_transform(&self, encoded: &[i64]) -> Result<Vec<String>> {
        encoded
            .iter()
            .map(|&code| {
                usize::try_from(code)
                    .ok()
                    .and_then(|i| self.classes.get(i))
                    .cloned()
                    .ok_or_else(|| {
                        IdsError::ModelInference(format!(
                            "class index {} outside encoder range 0..{}",
                            code,
                            self.classes.len()
                        ))
                    })
            })
            .collect()
    }
}

/// Decoder for 0/1 models: 0 is benign, 1 is attack.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryLabels {
    pub benign: String,
    pub attack: String,
}

impl LabelDecoder for BinaryLabels {
    fn inverse_transform(&self, encoded: &[i64]) -> Result<Vec<String>> {
        encoded
            .iter()
            .map(|&code| match code {
                0 => Ok(self.benign.clone()),
                1 => Ok(self.attack.clone()),
                other => Err(IdsError::ModelInference(format!(
                    "binary model produced class {}",
                    other
                ))),
            })
            .collect()
    }
}
