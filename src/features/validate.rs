use super::{FeatureTable, Projection};
use crate::error::{IdsError, Result, Violation, ViolationKind};
use crate::table::{Cell, RawTable};
use ndarray::Array2;

/// Coerce projected cells to f64. Every offending cell is collected before failing,
/// so one error reports the whole batch.
pub fn validate(table: &RawTable, projection: &Projection) -> Result<FeatureTable> {
    let n_rows = table.len();
    let n_cols = projection.columns.len();
    let mut values = Array2::<f64>::zeros((n_rows, n_cols));
    let mut violations = Vec::new();

    for (r, row) in table.rows().iter().enumerate() {
        for (c, source) in projection.sources.iter().enumerate() {
            let Some(idx) = *source else { continue };
            let raw = &row[idx];
            let kind = match Cell::parse(raw) {
                Cell::Number(v) => {
                    values[[r, c]] = v;
                    continue;
                }
                Cell::Missing => ViolationKind::Missing,
                Cell::Text => ViolationKind::NonNumeric,
            };
            violations.push(Violation {
                row: r,
                column: projection.columns[c].clone(),
                value: raw.clone(),
                kind,
            });
        }
    }

    if !violations.is_empty() {
        return Err(IdsError::DataValidation { violations });
    }
    Ok(FeatureTable::from_parts(projection.columns.clone(), values))
}
