//! Report outputs: the annotated CSV download and the JSON summary document.

use crate::config::ClassificationMode;
use crate::error::{IdsError, Result};
use crate::inference::PredictionResult;
use crate::risk::{Summary, HIGH_THREAT_FROM, MODERATE_RISK_FROM};
use crate::table::RawTable;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

pub const BINARY_COLUMNS: [&str; 3] = ["Prediction", "Attack_Probability", "Severity"];
pub const MULTI_CLASS_COLUMNS: [&str; 3] = ["Predicted_Attack", "Confidence (%)", "Severity"];

/// Writes the uploaded rows (label column excluded) with prediction columns appended.
/// Only rows present in `results` are written, in the order given.
pub struct AnnotatedReport<'a> {
    pub table: &'a RawTable,
    pub mode: ClassificationMode,
    pub label_column: &'a str,
}

impl<'a> AnnotatedReport<'a> {
    pub fn write_path(&self, path: &Path, results: &[&PredictionResult]) -> Result<usize> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|e| IdsError::io(dir, e))?;
        }
        let file = std::fs::File::create(path).map_err(|e| IdsError::io(path, e))?;
        self.write(file, results)
    }

    pub fn write<W: Write>(&self, out: W, results: &[&PredictionResult]) -> Result<usize> {
        let keep: Vec<usize> = (0..self.table.columns().len())
            .filter(|&i| self.table.columns()[i] != self.label_column)
            .collect();
        let extra = match self.mode {
            ClassificationMode::Binary => BINARY_COLUMNS,
            ClassificationMode::MultiClass => MULTI_CLASS_COLUMNS,
        };

        let mut w = csv::Writer::from_writer(out);
        let header: Vec<&str> = keep
            .iter()
            .map(|&i| self.table.columns()[i].as_str())
            .chain(extra)
            .collect();
        w.write_record(&header)?;

        for r in results {
            let source = self.table.rows().get(r.row).ok_or_else(|| {
                IdsError::ModelInference(format!("prediction refers to missing row {}", r.row))
            })?;
            let mut record: Vec<String> = keep.iter().map(|&i| source[i].clone()).collect();
            match self.mode {
                ClassificationMode::Binary => {
                    record.push(r.encoded.to_string());
                    record.push(r.confidence.to_string());
                }
                ClassificationMode::MultiClass => {
                    record.push(r.class.clone());
                    record.push(format!("{:.2}", r.confidence_pct()));
                }
            }
            record.push(r.severity.to_string());
            w.write_record(&record)?;
        }
        w.flush().map_err(|e| IdsError::io("<report>", e))?;
        Ok(results.len())
    }
}

/// Summary of one scored batch, serialized as a single JSON object
#[derive(Debug, Clone, Serialize)]
pub struct SummaryDocument {
    pub generated_at: DateTime<Utc>,
    pub rows_scored: usize,
    pub min_confidence: f64,
    pub moderate_risk_from: f64,
    pub high_threat_from: f64,
    pub status_label: &'static str,
    #[serde(flatten)]
    pub summary: Summary,
}

impl SummaryDocument {
    pub fn new(summary: Summary, rows_scored: usize, min_confidence: f64) -> Self {
        Self {
            generated_at: Utc::now(),
            rows_scored,
            min_confidence,
            moderate_risk_from: MODERATE_RISK_FROM,
            high_threat_from: HIGH_THREAT_FROM,
            status_label: summary.status.label(),
            summary,
        }
    }

    pub fn write_path(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| IdsError::io(path, std::io::Error::new(std::io::ErrorKind::InvalidData, e)))?;
        std::fs::write(path, json).map_err(|e| IdsError::io(path, e))
    }
}
