//! Projection: uploaded columns → fitted feature order.
//! Extra columns are dropped, absent ones zero-filled. Without named features the
//! numeric columns are taken positionally.

use super::{validate, FeatureSchema, FeatureTable};
use crate::config::InferenceConfig;
use crate::error::{IdsError, Result};
use crate::table::RawTable;
use tracing::{debug, warn};

/// What the fitted scaler knows about its input
#[derive(Debug, Clone, Copy)]
pub enum SchemaSource<'a> {
    Named(&'a FeatureSchema),
    /// Only the feature count is known
    Positional(usize),
}

/// Column plan for one table: output feature name and the raw column feeding it (None = zero fill).
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub columns: Vec<String>,
    pub sources: Vec<Option<usize>>,
    pub dropped: Vec<String>,
    pub missing: Vec<String>,
}

pub struct FeaturePipeline {
    label_column: String,
    max_missing_features: Option<usize>,
}

impl FeaturePipeline {
    pub fn new(config: &InferenceConfig) -> Self {
        Self {
            label_column: config.label_column.clone(),
            max_missing_features: config.max_missing_features,
        }
    }

    /// Project and validate in one pass; the result is ready for the scaler.
    pub fn prepare(&self, table: &RawTable, source: SchemaSource<'_>) -> Result<FeatureTable> {
        let projection = self.project(table, source)?;
        validate(table, &projection)
    }

    pub fn project(&self, table: &RawTable, source: SchemaSource<'_>) -> Result<Projection> {
        match source {
            SchemaSource::Named(schema) => self.reindex(table, schema),
            SchemaSource::Positional(n) => self.numeric_columns(table, n),
        }
    }

    fn reindex(&self, table: &RawTable, schema: &FeatureSchema) -> Result<Projection> {
        let sources: Vec<Option<usize>> = schema
            .names()
            .iter()
            .map(|name| table.column_index(name))
            .collect();
        let missing: Vec<String> = schema
            .names()
            .iter()
            .zip(&sources)
            .filter(|(_, s)| s.is_none())
            .map(|(n, _)| n.clone())
            .collect();
        let dropped: Vec<String> = table
            .columns()
            .iter()
            .filter(|c| !schema.names().contains(*c))
            .cloned()
            .collect();
        let found = schema.len() - missing.len();

        if found == 0 && !schema.is_empty() {
            return Err(IdsError::SchemaMismatch {
                expected: schema.len(),
                found,
                missing: missing.len(),
                reason: "no uploaded column matches the fitted feature set".to_string(),
            });
        }
        if let Some(limit) = self.max_missing_features {
            if missing.len() > limit {
                return Err(IdsError::SchemaMismatch {
                    expected: schema.len(),
                    found,
                    missing: missing.len(),
                    reason: format!("more than {} fitted features absent from upload", limit),
                });
            }
        }
        if !missing.is_empty() {
            warn!(count = missing.len(), columns = ?missing, "fitted features absent; filling with zero");
        }
        if !dropped.is_empty() {
            debug!(columns = ?dropped, "dropping columns outside the fitted feature set");
        }

        Ok(Projection {
            columns: schema.names().to_vec(),
            sources,
            dropped,
            missing,
        })
    }

    fn numeric_columns(&self, table: &RawTable, expected: usize) -> Result<Projection> {
        let mut columns = Vec::new();
        let mut sources = Vec::new();
        let mut dropped = Vec::new();
        for (idx, name) in table.columns().iter().enumerate() {
            if *name != self.label_column && table.is_numeric_column(idx) {
                columns.push(name.clone());
                sources.push(Some(idx));
            } else {
                dropped.push(name.clone());
            }
        }
        if columns.len() != expected {
            return Err(IdsError::SchemaMismatch {
                expected,
                found: columns.len(),
                missing: expected.saturating_sub(columns.len()),
                reason: "numeric column count differs from fitted feature count".to_string(),
            });
        }
        if !dropped.is_empty() {
            debug!(columns = ?dropped, "dropping label and non-numeric columns");
        }
        Ok(Projection {
            columns,
            sources,
            dropped,
            missing: Vec::new(),
        })
    }
}
