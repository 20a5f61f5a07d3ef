//! Raw tabular input: CSV with a header row, read leniently.
//!
//! Header names are trimmed and only the first of several same-named columns is kept.
//! Rows with more fields than the header are skipped and counted; short rows are padded
//! with empty (missing) cells.

mod cell;

pub use cell::Cell;

use crate::error::{IdsError, Result};
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
    skipped_lines: usize,
}

impl RawTable {
    /// Build from in-memory header and rows, applying the same normalization as CSV reads.
    pub fn new(header: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let (columns, keep) = normalize_header(header.iter().map(String::as_str));
        let width = header.len();
        let mut table = RawTable {
            columns,
            rows: Vec::with_capacity(rows.len()),
            skipped_lines: 0,
        };
        for row in rows {
            match project_row(row.iter().map(String::as_str), row.len(), width, &keep) {
                Some(r) => table.rows.push(r),
                None => table.skipped_lines += 1,
            }
        }
        table
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path).map_err(|e| IdsError::io(path, e))?;
        let table = Self::from_reader(std::io::BufReader::new(file))?;
        if table.skipped_lines > 0 {
            tracing::warn!(
                file = %path.display(),
                skipped = table.skipped_lines,
                "skipped malformed lines"
            );
        }
        Ok(table)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let header = rdr.headers()?.clone();
        let width = header.len();
        let (columns, keep) = normalize_header(header.iter());

        let mut rows = Vec::new();
        let mut skipped_lines = 0;
        for record in rdr.records() {
            let record = match record {
                Ok(r) => r,
                Err(e) if matches!(e.kind(), csv::ErrorKind::Io(_)) => return Err(e.into()),
                Err(_) => {
                    skipped_lines += 1;
                    continue;
                }
            };
            match project_row(record.iter(), record.len(), width, &keep) {
                Some(r) => rows.push(r),
                None => skipped_lines += 1,
            }
        }

        Ok(RawTable {
            columns,
            rows,
            skipped_lines,
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Lines dropped while reading because they had too many fields or could not be decoded
    pub fn skipped_lines(&self) -> usize {
        self.skipped_lines
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// A column is numeric when every present value parses as a number.
    pub fn is_numeric_column(&self, idx: usize) -> bool {
        self.rows
            .iter()
            .all(|r| !matches!(Cell::parse(&r[idx]), Cell::Text))
    }
}

fn normalize_header<'a>(names: impl Iterator<Item = &'a str>) -> (Vec<String>, Vec<usize>) {
    let mut seen = HashSet::new();
    let mut columns = Vec::new();
    let mut keep = Vec::new();
    for (i, name) in names.enumerate() {
        let name = name.trim().to_string();
        if seen.insert(name.clone()) {
            columns.push(name);
            keep.push(i);
        }
    }
    (columns, keep)
}

fn project_row<'a>(
    fields: impl Iterator<Item = &'a str>,
    len: usize,
    width: usize,
    keep: &[usize],
) -> Option<Vec<String>> {
    if len > width {
        return None;
    }
    let mut all: Vec<&str> = fields.collect();
    all.resize(width, "");
    Some(keep.iter().map(|&i| all[i].to_string()).collect())
}
