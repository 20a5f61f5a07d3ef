//! Stub artifacts shared by integration tests.
#![allow(dead_code)]

use flow_ids::config::{ClassificationMode, IdsConfig};
use flow_ids::model::{BinaryLabels, Classifier, LabelEncoder, StandardScaler};
use flow_ids::{IdsError, InferenceContext, RawTable, Result};
use ndarray::{Array2, ArrayView2};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub fn table(header: &[&str], rows: &[&[&str]]) -> RawTable {
    RawTable::new(
        header.iter().map(|s| s.to_string()).collect(),
        rows.iter()
            .map(|r| r.iter().map(|s| s.to_string()).collect())
            .collect(),
    )
}

/// Class 1 when the first scaled feature is positive.
pub struct SignClassifier {
    calls: AtomicUsize,
}

impl SignClassifier {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Classifier for SignClassifier {
    fn predict(&self, x: ArrayView2<'_, f64>) -> Result<Vec<i64>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(x.rows().into_iter().map(|r| i64::from(r[0] > 0.0)).collect())
    }

    fn predict_proba(&self, x: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        let mut p = Array2::zeros((x.nrows(), 2));
        for (i, r) in x.rows().into_iter().enumerate() {
            let attack = if r[0] > 0.0 { 0.9 } else { 0.2 };
            p[[i, 0]] = 1.0 - attack;
            p[[i, 1]] = attack;
        }
        Ok(p)
    }
}

/// Returns canned outputs and remembers the (scaled) input it was given.
pub struct CannedClassifier {
    pub labels: Vec<i64>,
    pub proba: Array2<f64>,
    seen: Mutex<Option<Array2<f64>>>,
}

impl CannedClassifier {
    pub fn new(labels: Vec<i64>, proba: Array2<f64>) -> Self {
        Self {
            labels,
            proba,
            seen: Mutex::new(None),
        }
    }

    /// Last input passed to `predict`
    pub fn seen(&self) -> Option<Array2<f64>> {
        self.seen.lock().unwrap().clone()
    }
}

impl Classifier for CannedClassifier {
    fn predict(&self, x: ArrayView2<'_, f64>) -> Result<Vec<i64>> {
        *self.seen.lock().unwrap() = Some(x.to_owned());
        Ok(self.labels.clone())
    }

    fn predict_proba(&self, _x: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        Ok(self.proba.clone())
    }
}

pub struct FailingClassifier;

impl Classifier for FailingClassifier {
    fn predict(&self, _x: ArrayView2<'_, f64>) -> Result<Vec<i64>> {
        Err(IdsError::ModelInference("backend exploded".to_string()))
    }

    fn predict_proba(&self, _x: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        Err(IdsError::ModelInference("backend exploded".to_string()))
    }
}

pub fn identity_scaler(names: &[&str]) -> StandardScaler {
    StandardScaler::new(
        names.iter().map(|s| s.to_string()).collect(),
        vec![0.0; names.len()],
        vec![1.0; names.len()],
    )
    .unwrap()
}

pub fn binary_context(classifier: Box<dyn Classifier>, scaler: StandardScaler) -> InferenceContext {
    let config = IdsConfig::default();
    InferenceContext::new(
        classifier,
        Box::new(scaler),
        Box::new(BinaryLabels {
            benign: "Normal".to_string(),
            attack: "Attack".to_string(),
        }),
        ClassificationMode::Binary,
        &config,
    )
}

pub fn multi_class_context(
    classifier: Box<dyn Classifier>,
    scaler: StandardScaler,
    classes: &[&str],
) -> InferenceContext {
    let mut config = IdsConfig::default();
    config.artifacts.mode = ClassificationMode::MultiClass;
    InferenceContext::new(
        classifier,
        Box::new(scaler),
        Box::new(LabelEncoder::new(classes.iter().map(|s| s.to_string()).collect())),
        ClassificationMode::MultiClass,
        &config,
    )
}
