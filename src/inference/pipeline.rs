use super::{InferenceContext, PredictionResult};
use crate::config::ClassificationMode;
use crate::error::{IdsError, Result};
use crate::table::RawTable;
use ndarray::ArrayView1;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Classify every row of `table`. All-or-nothing: any failure yields no results.
///
/// Validation (projection, missing and non-numeric cells) completes before the scaler or
/// model is touched.
pub fn run_inference(ctx: &InferenceContext, table: &RawTable) -> Result<Vec<PredictionResult>> {
    let batch_id = Uuid::new_v4();
    let result = infer(ctx, table, &batch_id);
    match &result {
        Ok(rows) => info!(%batch_id, rows = rows.len(), "inference complete"),
        Err(e) => warn!(%batch_id, kind = e.kind(), error = %e, "inference rejected"),
    }
    result
}

fn infer(ctx: &InferenceContext, table: &RawTable, batch_id: &Uuid) -> Result<Vec<PredictionResult>> {
    // Column types cannot be inferred from a header alone.
    if table.is_empty() {
        debug!(%batch_id, columns = table.columns().len(), "empty table");
        return Ok(Vec::new());
    }

    let features = ctx.pipeline.prepare(table, ctx.schema_source())?;
    let n_rows = features.n_rows();
    debug!(%batch_id, rows = n_rows, features = features.n_features(), "features validated");

    let scaled = ctx.scaler.transform(features.view())?;
    if scaled.dim() != (n_rows, features.n_features()) {
        return Err(IdsError::ModelInference(format!(
            "scaler changed shape from {:?} to {:?}",
            (n_rows, features.n_features()),
            scaled.dim()
        )));
    }

    let (labels, proba) = ctx.classifier.predict_with_proba(scaled.view())?;
    if labels.len() != n_rows {
        return Err(IdsError::ModelInference(format!(
            "model returned {} labels for {} rows",
            labels.len(),
            n_rows
        )));
    }
    if proba.nrows() != n_rows || proba.ncols() < 2 {
        return Err(IdsError::ModelInference(format!(
            "probability matrix has shape {:?} for {} rows",
            proba.dim(),
            n_rows
        )));
    }

    let names = ctx.decoder.inverse_transform(&labels)?;

    let mut results = Vec::with_capacity(n_rows);
    for (row, ((encoded, class), probs)) in labels
        .into_iter()
        .zip(names)
        .zip(proba.rows())
        .enumerate()
    {
        let confidence = confidence(ctx.mode, probs).ok_or_else(|| {
            IdsError::ModelInference(format!("row {} has no valid probability", row))
        })?;
        let severity = ctx.severity.lookup(&class);
        results.push(PredictionResult {
            row,
            encoded,
            class,
            confidence,
            severity,
        });
    }
    Ok(results)
}

/// Binary: probability of class 1. Multi-class: the largest class probability.
fn confidence(mode: ClassificationMode, probs: ArrayView1<'_, f64>) -> Option<f64> {
    let p = match mode {
        ClassificationMode::Binary => probs.get(1).copied()?,
        ClassificationMode::MultiClass => probs
            .iter()
            .copied()
            .filter(|v| !v.is_nan())
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))))?,
    };
    if p.is_nan() {
        return None;
    }
    Some(p.clamp(0.0, 1.0))
}
