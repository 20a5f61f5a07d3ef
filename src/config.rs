//! Pipeline configuration. Loaded once from JSON; CLI flags override individual fields.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IdsConfig {
    /// Persisted model, scaler and encoder
    pub artifacts: ArtifactsConfig,
    /// Projection and label decoding
    pub inference: InferenceConfig,
    /// Post-processing of predictions
    pub report: ReportConfig,
    /// Offline dataset merge
    pub consolidation: ConsolidationConfig,
    /// Logging
    pub log: LogConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationMode {
    /// Model outputs 0 (benign) / 1 (attack)
    Binary,
    /// Model outputs encoded class indices; an encoder maps them back to names
    MultiClass,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactsConfig {
    /// ONNX classifier exported with separate label and probability outputs
    pub model_path: PathBuf,
    /// Fitted standard scaler (JSON)
    pub scaler_path: PathBuf,
    /// Label encoder (JSON); required in multi-class mode
    pub encoder_path: Option<PathBuf>,
    pub mode: ClassificationMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Ground-truth column dropped from uploads before projection
    pub label_column: String,
    /// Name of the no-attack class
    pub benign_label: String,
    /// Further class names counted as normal traffic in summaries, matched ignoring case
    pub baseline_classes: Vec<String>,
    /// Name given to class 1 in binary mode
    pub attack_label: String,
    /// Upper bound on schema columns absent from an upload (zero-filled); None = no bound
    pub max_missing_features: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Rows below this confidence (percent, 0–100) are dropped before summarizing
    pub min_confidence: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsolidationConfig {
    pub label_column: String,
    /// Raw label value of benign traffic
    pub benign_token: String,
    /// Map labels to 0/1 instead of keeping the class name
    pub binary: bool,
    /// Keep only numeric feature columns plus the label
    pub numeric_only: bool,
    /// Clean input files on a rayon pool
    pub parallel: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub json: bool,
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("models/final_rf_model.onnx"),
            scaler_path: PathBuf::from("models/standard_scaler.json"),
            encoder_path: None,
            mode: ClassificationMode::Binary,
        }
    }
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            label_column: "Label".to_string(),
            benign_label: "Normal".to_string(),
            baseline_classes: vec!["Normal".to_string(), "BENIGN".to_string()],
            attack_label: "Attack".to_string(),
            max_missing_features: None,
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self { min_confidence: 0.0 }
    }
}

impl Default for ConsolidationConfig {
    fn default() -> Self {
        Self {
            label_column: "Label".to_string(),
            benign_token: "BENIGN".to_string(),
            binary: true,
            numeric_only: true,
            parallel: true,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl IdsConfig {
    /// Load from JSON file if present; otherwise return default
    pub fn load(path: &std::path::Path) -> Self {
        if path.exists() {
            if let Ok(data) = std::fs::read_to_string(path) {
                if let Ok(c) = serde_json::from_str::<IdsConfig>(&data) {
                    return c;
                }
            }
        }
        Self::default()
    }
}
