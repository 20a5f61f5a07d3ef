//! flow-ids — batch intrusion detection over network-flow feature tables.
//!
//! Modular structure:
//! - [`table`] — Lenient CSV reading and cell classification
//! - [`features`] — Projection onto the fitted schema and fail-fast validation
//! - [`model`] — Classifier / scaler / label-decoder traits and on-disk artifacts
//! - [`inference`] — Injected inference context and the per-batch pipeline
//! - [`risk`] — Severity tiers, confidence filtering, batch summary
//! - [`consolidate`] — Offline merge of raw capture CSVs into a training set
//! - [`report`] — Annotated CSV and JSON summary outputs
//! - [`logging`] — Structured logging setup

pub mod config;
pub mod error;
pub mod table;
pub mod features;
pub mod model;
pub mod inference;
pub mod risk;
pub mod consolidate;
pub mod report;
pub mod logging;

pub use config::IdsConfig;
pub use error::{IdsError, Result};
pub use table::RawTable;
pub use features::{FeatureSchema, FeatureTable, FeaturePipeline};
pub use model::{Classifier, Scaler, LabelDecoder, OnnxClassifier, StandardScaler, LabelEncoder};
pub use inference::{run_inference, InferenceContext, PredictionResult};
pub use risk::{Severity, SeverityMap, Summary, SystemStatus};
pub use consolidate::{Consolidator, StreamingConsolidator};
pub use logging::StructuredLogger;
