//! Per-file cleaning. Each file is independent, so this step may run in parallel.

use super::{CleanTable, FileStats};
use crate::config::ConsolidationConfig;
use crate::error::{IdsError, Result};
use crate::table::{Cell, RawTable};
use std::path::Path;
use tracing::debug;

pub fn clean_file(path: &Path, config: &ConsolidationConfig) -> Result<(CleanTable, FileStats)> {
    let raw = RawTable::from_path(path)?;
    let (table, mut stats) = clean_table(&raw, config).map_err(|column| IdsError::MissingColumn {
        path: path.to_path_buf(),
        column,
    })?;
    stats.path = path.to_path_buf();
    debug!(
        file = %path.display(),
        rows_read = stats.rows_read,
        rows_kept = stats.rows_kept,
        columns = table.columns.len(),
        "file cleaned"
    );
    Ok((table, stats))
}

/// Clean an already-read table. Fails only when the label column is absent, returning its name.
pub fn clean_table(
    raw: &RawTable,
    config: &ConsolidationConfig,
) -> std::result::Result<(CleanTable, FileStats), String> {
    let label_idx = raw
        .column_index(&config.label_column)
        .ok_or_else(|| config.label_column.clone())?;

    let mut stats = FileStats {
        rows_read: raw.len(),
        skipped_lines: raw.skipped_lines(),
        ..FileStats::default()
    };

    let mut kept: Vec<(Vec<Cell>, &Vec<String>, String)> = Vec::with_capacity(raw.len());
    for row in raw.rows() {
        let cells: Vec<Cell> = row.iter().map(|v| Cell::parse(v)).collect();
        if cells[label_idx].is_missing() {
            stats.missing_label += 1;
            continue;
        }
        if cells
            .iter()
            .enumerate()
            .any(|(i, c)| i != label_idx && c.is_missing())
        {
            stats.missing_values += 1;
            continue;
        }
        let label = encode_label(&row[label_idx], config);
        kept.push((cells, row, label));
    }

    let keep_cols: Vec<usize> = (0..raw.columns().len())
        .filter(|&i| i == label_idx || !config.numeric_only || numeric_evidence(raw, i))
        .collect();
    stats.dropped_columns = raw
        .columns()
        .iter()
        .enumerate()
        .filter(|(i, _)| !keep_cols.contains(i))
        .map(|(_, c)| c.clone())
        .collect();

    let columns = keep_cols.iter().map(|&i| raw.columns()[i].clone()).collect();
    let rows: Vec<Vec<String>> = kept
        .iter()
        .map(|(cells, raw_row, label)| {
            keep_cols
                .iter()
                .map(|&i| {
                    if i == label_idx {
                        label.clone()
                    } else {
                        render(cells[i], &raw_row[i])
                    }
                })
                .collect()
        })
        .collect();
    stats.rows_kept = rows.len();

    Ok((CleanTable { columns, rows }, stats))
}

/// Benign token → "0", anything else → "1" in binary mode; otherwise the trimmed class name.
pub fn encode_label(raw: &str, config: &ConsolidationConfig) -> String {
    let label = raw.trim();
    if !config.binary {
        return label.to_string();
    }
    if label == config.benign_token.trim() {
        "0".to_string()
    } else {
        "1".to_string()
    }
}

/// Typed over every row read, including rows dropped later: no text values and at least
/// one number. Missing cells say nothing either way.
fn numeric_evidence(raw: &RawTable, idx: usize) -> bool {
    let mut seen_number = false;
    for row in raw.rows() {
        match Cell::parse(&row[idx]) {
            Cell::Text => return false,
            Cell::Number(_) => seen_number = true,
            Cell::Missing => {}
        }
    }
    seen_number
}

// Numbers are rendered canonically so "1.0" and "1" compare equal during deduplication.
fn render(cell: Cell, raw: &str) -> String {
    match cell {
        Cell::Number(v) => v.to_string(),
        _ => raw.to_string(),
    }
}
