//! Dataset consolidation: many raw capture CSVs → one clean, labeled training table.
//!
//! Two mutually exclusive strategies:
//! - [`Consolidator`] holds everything in memory, aligns all files to the sorted union of
//!   their columns (absent columns become `0`) and removes duplicate rows across files.
//! - [`StreamingConsolidator`] appends each cleaned file to the output as it goes. It writes
//!   the header once, from the first file, and does no alignment or deduplication.

mod align;
mod clean;
mod stream;

pub use align::{align, merge, union_columns, FILL_VALUE};
pub use clean::{clean_file, clean_table, encode_label};
pub use stream::{StreamReport, StreamingConsolidator};

use crate::config::ConsolidationConfig;
use crate::error::{IdsError, Result};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::info;
use walkdir::WalkDir;

/// One file after cleaning, before alignment
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleanTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FileStats {
    pub path: PathBuf,
    pub rows_read: usize,
    /// Malformed lines skipped by the reader
    pub skipped_lines: usize,
    pub missing_label: usize,
    pub missing_values: usize,
    pub rows_kept: usize,
    /// Columns removed because they were not numeric
    pub dropped_columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConsolidatedTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    label_column: String,
}

impl ConsolidatedTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows per distinct label value
    pub fn label_distribution(&self) -> BTreeMap<String, usize> {
        let mut dist = BTreeMap::new();
        if let Some(idx) = self.columns.iter().position(|c| *c == self.label_column) {
            for row in &self.rows {
                *dist.entry(row[idx].clone()).or_insert(0) += 1;
            }
        }
        dist
    }

    pub fn write_csv(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|e| IdsError::io(dir, e))?;
        }
        let mut w = csv::Writer::from_path(path)?;
        w.write_record(&self.columns)?;
        for row in &self.rows {
            w.write_record(row)?;
        }
        w.flush().map_err(|e| IdsError::io(path, e))?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsolidationReport {
    pub files: Vec<FileStats>,
    pub columns: usize,
    pub rows: usize,
    pub duplicates_removed: usize,
    pub label_distribution: BTreeMap<String, usize>,
}

pub struct Consolidator {
    config: ConsolidationConfig,
}

impl Consolidator {
    pub fn new(config: ConsolidationConfig) -> Self {
        Self { config }
    }

    /// Clean every file, align to the column union, merge in the given order and deduplicate.
    pub fn consolidate(&self, paths: &[PathBuf]) -> Result<(ConsolidatedTable, ConsolidationReport)> {
        let cleaned: Vec<(CleanTable, FileStats)> = if self.config.parallel {
            paths
                .par_iter()
                .map(|p| clean_file(p, &self.config))
                .collect::<Result<Vec<_>>>()?
        } else {
            paths
                .iter()
                .map(|p| clean_file(p, &self.config))
                .collect::<Result<Vec<_>>>()?
        };
        let (tables, files): (Vec<CleanTable>, Vec<FileStats>) = cleaned.into_iter().unzip();
        for f in &files {
            info!(
                file = %f.path.display(),
                rows_read = f.rows_read,
                skipped = f.skipped_lines,
                missing_label = f.missing_label,
                missing_values = f.missing_values,
                rows_kept = f.rows_kept,
                "file processed"
            );
        }

        let columns = union_columns(&tables);
        let (rows, duplicates_removed) = merge(&tables, &columns);
        let table = ConsolidatedTable {
            columns,
            rows,
            label_column: self.config.label_column.clone(),
        };
        let report = ConsolidationReport {
            files,
            columns: table.columns.len(),
            rows: table.len(),
            duplicates_removed,
            label_distribution: table.label_distribution(),
        };
        info!(
            rows = report.rows,
            columns = report.columns,
            duplicates = duplicates_removed,
            labels = ?report.label_distribution,
            "dataset consolidated"
        );
        Ok((table, report))
    }
}

/// Expand directories to the `*.csv` files directly inside them, sorted by name.
/// Plain file arguments keep their position.
pub fn discover_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    for input in inputs {
        if !input.is_dir() {
            out.push(input.clone());
            continue;
        }
        let mut found = Vec::new();
        for entry in WalkDir::new(input).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(input.as_path()).to_path_buf();
                IdsError::io(path, e.into())
            })?;
            let is_csv = entry
                .path()
                .extension()
                .map(|ext| ext.eq_ignore_ascii_case("csv"))
                .unwrap_or(false);
            if entry.file_type().is_file() && is_csv {
                found.push(entry.into_path());
            }
        }
        found.sort();
        out.extend(found);
    }
    Ok(out)
}
