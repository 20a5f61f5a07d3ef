use crate::config::{ClassificationMode, IdsConfig, InferenceConfig};
use crate::error::{IdsError, Result};
use crate::features::{FeaturePipeline, FeatureSchema, SchemaSource};
use crate::model::{BinaryLabels, Classifier, LabelDecoder, LabelEncoder, OnnxClassifier, Scaler, StandardScaler};
use crate::risk::SeverityMap;
use tracing::info;

/// Everything an inference call reads. Built once at startup and passed by reference;
/// nothing in it is mutated afterwards.
pub struct InferenceContext {
    pub(crate) classifier: Box<dyn Classifier>,
    pub(crate) scaler: Box<dyn Scaler>,
    pub(crate) decoder: Box<dyn LabelDecoder>,
    pub(crate) severity: SeverityMap,
    pub(crate) pipeline: FeaturePipeline,
    pub(crate) schema: Option<FeatureSchema>,
    pub(crate) mode: ClassificationMode,
    pub(crate) baseline: Vec<String>,
}

impl InferenceContext {
    pub fn new(
        classifier: Box<dyn Classifier>,
        scaler: Box<dyn Scaler>,
        decoder: Box<dyn LabelDecoder>,
        mode: ClassificationMode,
        config: &IdsConfig,
    ) -> Self {
        let names = scaler.feature_names();
        let schema = if names.is_empty() {
            None
        } else {
            Some(FeatureSchema::new(names.to_vec()))
        };
        Self {
            classifier,
            scaler,
            decoder,
            severity: SeverityMap::default(),
            pipeline: FeaturePipeline::new(&config.inference),
            schema,
            mode,
            baseline: baseline_classes(&config.inference),
        }
    }

    /// Load model, scaler and (multi-class) encoder from the configured paths.
    pub fn load(config: &IdsConfig) -> Result<Self> {
        let artifacts = &config.artifacts;
        let scaler = StandardScaler::load(&artifacts.scaler_path)?;
        let decoder: Box<dyn LabelDecoder> = match artifacts.mode {
            ClassificationMode::Binary => Box::new(BinaryLabels {
                benign: config.inference.benign_label.clone(),
                attack: config.inference.attack_label.clone(),
            }),
            ClassificationMode::MultiClass => {
                let path = artifacts.encoder_path.as_ref().ok_or_else(|| {
                    IdsError::artifact(
                        &artifacts.model_path,
                        "multi-class mode requires a label encoder",
                    )
                })?;
                Box::new(LabelEncoder::load(path)?)
            }
        };
        let classifier = OnnxClassifier::load(&artifacts.model_path)?;

        info!(
            mode = ?artifacts.mode,
            features = scaler.n_features(),
            named = !scaler.feature_names().is_empty(),
            "inference context ready"
        );
        Ok(Self::new(
            Box::new(classifier),
            Box::new(scaler),
            decoder,
            artifacts.mode,
            config,
        ))
    }

    /// Replace the default severity table.
    pub fn with_severity_map(mut self, severity: SeverityMap) -> Self {
        self.severity = severity;
        self
    }

    pub fn mode(&self) -> ClassificationMode {
        self.mode
    }

    /// Class names a summary counts as normal traffic; the binary benign name comes first.
    pub fn baseline_classes(&self) -> &[String] {
        &self.baseline
    }

    pub fn severity_map(&self) -> &SeverityMap {
        &self.severity
    }

    pub(crate) fn schema_source(&self) -> SchemaSource<'_> {
        match &self.schema {
            Some(s) => SchemaSource::Named(s),
            None => SchemaSource::Positional(self.scaler.n_features()),
        }
    }
}

fn baseline_classes(config: &InferenceConfig) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for name in std::iter::once(&config.benign_label).chain(&config.baseline_classes) {
        let name = name.trim();
        if !name.is_empty() && !out.iter().any(|b| b.eq_ignore_ascii_case(name)) {
            out.push(name.to_string());
        }
    }
    out
}
