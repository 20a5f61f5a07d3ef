use super::{clean_file, FileStats};
use crate::config::ConsolidationConfig;
use crate::error::{IdsError, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreamReport {
    pub files: Vec<FileStats>,
    pub rows_written: usize,
    /// Column header of the output (taken from the first file)
    pub header: Vec<String>,
}

/// Append-only consolidation for inputs too large to merge in memory.
pub struct StreamingConsolidator {
    config: ConsolidationConfig,
}

impl StreamingConsolidator {
    pub fn new(config: ConsolidationConfig) -> Self {
        Self { config }
    }

    /// Output is truncated once, then every file is appended in order. Only the first file
    /// contributes a header row.
    pub fn run(&self, paths: &[PathBuf], output: &Path) -> Result<StreamReport> {
        if let Some(dir) = output.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|e| IdsError::io(dir, e))?;
        }
        let mut w = csv::WriterBuilder::new().flexible(true).from_path(output)?;

        let mut report = StreamReport {
            files: Vec::with_capacity(paths.len()),
            rows_written: 0,
            header: Vec::new(),
        };
        for (i, path) in paths.iter().enumerate() {
            let (table, stats) = clean_file(path, &self.config)?;
            if i == 0 {
                w.write_record(&table.columns)?;
                report.header = table.columns.clone();
            } else if table.columns != report.header {
                warn!(
                    file = %path.display(),
                    "columns differ from the header written by the first file; appending as-is"
                );
            }
            for row in &table.rows {
                w.write_record(row)?;
            }
            w.flush().map_err(|e| IdsError::io(output, e))?;
            report.rows_written += table.rows.len();
            info!(file = %path.display(), rows = table.rows.len(), "file appended");
            report.files.push(stats);
        }
        info!(output = %output.display(), rows = report.rows_written, "streaming consolidation complete");
        Ok(report)
    }
}
