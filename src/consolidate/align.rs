//! Union alignment and merge: the barrier after all per-file tables exist.

use super::CleanTable;
use std::collections::{BTreeSet, HashMap, HashSet};

/// Value written into columns a file does not have
pub const FILL_VALUE: &str = "0";

/// Sorted union of every table's columns.
pub fn union_columns(tables: &[CleanTable]) -> Vec<String> {
    tables
        .iter()
        .flat_map(|t| t.columns.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Reindex `table` to `columns`, filling absent ones with [`FILL_VALUE`].
pub fn align(table: &CleanTable, columns: &[String]) -> Vec<Vec<String>> {
    let index: HashMap<&str, usize> = table
        .columns
        .iter()
        .enumerate()
        .map(|(i, c)| (c.as_str(), i))
        .collect();
    let sources: Vec<Option<usize>> = columns.iter().map(|c| index.get(c.as_str()).copied()).collect();
    table
        .rows
        .iter()
        .map(|row| {
            sources
                .iter()
                .map(|s| match s {
                    Some(i) => row[*i].clone(),
                    None => FILL_VALUE.to_string(),
                })
                .collect()
        })
        .collect()
}

/// Concatenate in the given order and drop exact duplicate rows, keeping the first.
/// Returns the merged rows and the number of duplicates removed.
pub fn merge(tables: &[CleanTable], columns: &[String]) -> (Vec<Vec<String>>, usize) {
    let mut seen: HashSet<Vec<String>> = HashSet::new();
    let mut rows = Vec::new();
    let mut duplicates = 0;
    for table in tables {
        for row in align(table, columns) {
            if seen.contains(&row) {
                duplicates += 1;
            } else {
                seen.insert(row.clone());
                rows.push(row);
            }
        }
    }
    (rows, duplicates)
}
