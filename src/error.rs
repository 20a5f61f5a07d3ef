//! Error kinds for loading artifacts, validating tables and running inference.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Why a single cell failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// Empty, NaN or infinite value
    Missing,
    /// Value could not be read as a number
    NonNumeric,
}

/// One offending cell found by a validation pass. Rows are zero-based data rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    pub row: usize,
    pub column: String,
    pub value: String,
    pub kind: ViolationKind,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ViolationKind::Missing => write!(f, "row {} column '{}': missing value", self.row, self.column),
            ViolationKind::NonNumeric => write!(
                f,
                "row {} column '{}': non-numeric value '{}'",
                self.row, self.column, self.value
            ),
        }
    }
}

#[derive(Debug, Error)]
pub enum IdsError {
    #[error("Schema mismatch: {reason} (expected {expected} features, found {found}, missing {missing})")]
    SchemaMismatch {
        expected: usize,
        found: usize,
        missing: usize,
        reason: String,
    },

    #[error("Required column '{column}' not found in {}", .path.display())]
    MissingColumn { path: PathBuf, column: String },

    #[error("Data validation failed: {}", summarize(.violations))]
    DataValidation { violations: Vec<Violation> },

    #[error("Failed to load artifact {}: {reason}", .path.display())]
    ArtifactLoad { path: PathBuf, reason: String },

    #[error("Model inference failed: {0}")]
    ModelInference(String),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl IdsError {
    pub fn artifact(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        IdsError::ArtifactLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        IdsError::Io {
            path: path.into(),
            source,
        }
    }

    /// Short machine-readable name, used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            IdsError::SchemaMismatch { .. } => "schema_mismatch",
            IdsError::MissingColumn { .. } => "missing_column",
            IdsError::DataValidation { .. } => "data_validation",
            IdsError::ArtifactLoad { .. } => "artifact_load",
            IdsError::ModelInference(_) => "model_inference",
            IdsError::Io { .. } => "io",
            IdsError::Csv(_) => "csv",
        }
    }
}

const SHOWN_VIOLATIONS: usize = 5;

fn summarize(violations: &[Violation]) -> String {
    let mut out = format!("{} invalid value(s)", violations.len());
    for v in violations.iter().take(SHOWN_VIOLATIONS) {
        out.push_str("; ");
        out.push_str(&v.to_string());
    }
    if violations.len() > SHOWN_VIOLATIONS {
        out.push_str(&format!("; and {} more", violations.len() - SHOWN_VIOLATIONS));
    }
    out
}

pub type Result<T> = std::result::Result<T, IdsError>;
