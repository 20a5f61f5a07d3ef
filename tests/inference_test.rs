//! Inference pipeline: projection, validation, scaling, prediction, decoding, severity.

mod common;

use common::*;
use flow_ids::error::ViolationKind;
use flow_ids::model::{Scaler, StandardScaler};
use flow_ids::{run_inference, Classifier, IdsError, Severity};
use ndarray::array;

#[test]
fn one_result_per_row_in_input_order() {
    let ctx = binary_context(Box::new(SignClassifier::new()), identity_scaler(&["a", "b"]));
    let t = table(
        &["a", "b"],
        &[&["1", "0"], &["-1", "0"], &["3", "2"], &["-0.5", "9"]],
    );
    let out = run_inference(&ctx, &t).unwrap();
    assert_eq!(out.len(), 4);
    let rows: Vec<usize> = out.iter().map(|r| r.row).collect();
    assert_eq!(rows, vec![0, 1, 2, 3]);
    let classes: Vec<&str> = out.iter().map(|r| r.class.as_str()).collect();
    assert_eq!(classes, vec!["Attack", "Normal", "Attack", "Normal"]);
}

#[test]
fn binary_confidence_is_attack_probability() {
    let ctx = binary_context(Box::new(SignClassifier::new()), identity_scaler(&["a"]));
    let t = table(&["a"], &[&["1"], &["-1"]]);
    let out = run_inference(&ctx, &t).unwrap();
    assert!((out[0].confidence - 0.9).abs() < 1e-12);
    // benign row still reports P(attack), not the winning class probability
    assert!((out[1].confidence - 0.2).abs() < 1e-12);
    assert_eq!(out[0].encoded, 1);
    assert_eq!(out[0].severity, Severity::High);
    assert_eq!(out[1].severity, Severity::Low);
}

#[test]
fn scaled_dos_example() {
    let scaler = StandardScaler::new(
        vec!["duration".into(), "protocol".into(), "bytes".into()],
        vec![0.3, 6.0, 1000.0],
        vec![0.1, 1.0, 500.0],
    )
    .unwrap();
    let classifier = CannedClassifier::new(vec![1], array![[0.13, 0.87]]);
    let ctx = multi_class_context(Box::new(classifier), scaler, &["Normal", "DoS"]);
    let t = table(&["duration", "protocol", "bytes"], &[&["0.5", "6", "1500"]]);

    let out = run_inference(&ctx, &t).unwrap();
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].class, "DoS");
    assert!((out[0].confidence_pct() - 87.0).abs() < 1e-9);
    assert_eq!(out[0].severity, Severity::High);
}

#[test]
fn scaler_transform_matches_fitted_parameters() {
    let scaler = StandardScaler::new(
        vec!["duration".into(), "protocol".into(), "bytes".into()],
        vec![0.3, 6.0, 1000.0],
        vec![0.1, 1.0, 500.0],
    )
    .unwrap();
    let scaled = scaler.transform(array![[0.5, 6.0, 1500.0]].view()).unwrap();
    let expected = [2.0, 0.0, 1.0];
    for (got, want) in scaled.iter().zip(expected) {
        assert!((got - want).abs() < 1e-9, "{} != {}", got, want);
    }
}

#[test]
fn zero_scale_leaves_feature_centered_only() {
    let scaler = StandardScaler::new(vec![], vec![5.0], vec![0.0]).unwrap();
    let scaled = scaler.transform(array![[7.0]].view()).unwrap();
    assert_eq!(scaled[[0, 0]], 2.0);
}

#[test]
fn multi_class_confidence_is_max_probability() {
    let classifier = CannedClassifier::new(
        vec![2, 0],
        array![[0.1, 0.2, 0.7], [0.6, 0.3, 0.1]],
    );
    let ctx = multi_class_context(
        Box::new(classifier),
        identity_scaler(&["x"]),
        &["BENIGN", "PortScan", "DDoS"],
    );
    let t = table(&["x"], &[&["1"], &["2"]]);
    let out = run_inference(&ctx, &t).unwrap();
    assert_eq!(out[0].class, "DDoS");
    assert!((out[0].confidence - 0.7).abs() < 1e-12);
    assert_eq!(out[0].severity, Severity::Critical);
    assert_eq!(out[1].class, "BENIGN");
    assert!((out[1].confidence - 0.6).abs() < 1e-12);
    for r in &out {
        assert!((0.0..=1.0).contains(&r.confidence));
    }
}

#[test]
fn unmapped_class_gets_unknown_severity() {
    let classifier = CannedClassifier::new(vec![1], array![[0.4, 0.6]]);
    let ctx = multi_class_context(
        Box::new(classifier),
        identity_scaler(&["x"]),
        &["Normal", "SQL Injection Variant 7"],
    );
    let out = run_inference(&ctx, &table(&["x"], &[&["1"]])).unwrap();
    assert_eq!(out[0].severity, Severity::Unknown);
}

#[test]
fn extra_columns_dropped_and_columns_reordered() {
    let classifier = CannedClassifier::new(vec![0], array![[0.9, 0.1]]);
    let ctx = binary_context(Box::new(classifier), identity_scaler(&["a", "b"]));
    let t = table(
        &["Timestamp", "b", "Flow ID", "a", "Label"],
        &[&["2018-02-16 10:00:00", "20", "x-y-z", "10", "BENIGN"]],
    );
    let out = run_inference(&ctx, &t).unwrap();
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].class, "Normal");
}

#[test]
fn reindex_fills_absent_features_with_zero() {
    let classifier = CannedClassifier::new(vec![0], array![[0.9, 0.1]]);
    let seen = std::sync::Arc::new(classifier);
    struct Shared(std::sync::Arc<CannedClassifier>);
    impl Classifier for Shared {
        fn predict(&self, x: ndarray::ArrayView2<'_, f64>) -> flow_ids::Result<Vec<i64>> {
            self.0.predict(x)
        }
        fn predict_proba(&self, x: ndarray::ArrayView2<'_, f64>) -> flow_ids::Result<ndarray::Array2<f64>> {
            self.0.predict_proba(x)
        }
    }
    let ctx = binary_context(Box::new(Shared(seen.clone())), identity_scaler(&["a", "b", "c"]));
    let t = table(&["c", "a"], &[&["3", "1"]]);
    run_inference(&ctx, &t).unwrap();
    let input = seen.seen().unwrap();
    assert_eq!(input, array![[1.0, 0.0, 3.0]]);
}

#[test]
fn no_overlap_is_schema_mismatch() {
    let ctx = binary_context(Box::new(SignClassifier::new()), identity_scaler(&["a", "b"]));
    let t = table(&["x", "y"], &[&["1", "2"]]);
    let err = run_inference(&ctx, &t).unwrap_err();
    assert!(matches!(err, IdsError::SchemaMismatch { expected: 2, found: 0, .. }));
}

#[test]
fn missing_feature_cap_is_enforced() {
    let mut config = flow_ids::IdsConfig::default();
    config.inference.max_missing_features = Some(0);
    let ctx = flow_ids::InferenceContext::new(
        Box::new(SignClassifier::new()),
        Box::new(identity_scaler(&["a", "b"])),
        Box::new(flow_ids::model::BinaryLabels {
            benign: "Normal".into(),
            attack: "Attack".into(),
        }),
        flow_ids::config::ClassificationMode::Binary,
        &config,
    );
    let err = run_inference(&ctx, &table(&["a"], &[&["1"]])).unwrap_err();
    assert!(matches!(err, IdsError::SchemaMismatch { missing: 1, .. }));
}

#[test]
fn validation_collects_every_violation_before_model_runs() {
    let classifier = std::sync::Arc::new(SignClassifier::new());
    struct Counting(std::sync::Arc<SignClassifier>);
    impl Classifier for Counting {
        fn predict(&self, x: ndarray::ArrayView2<'_, f64>) -> flow_ids::Result<Vec<i64>> {
            self.0.predict(x)
        }
        fn predict_proba(&self, x: ndarray::ArrayView2<'_, f64>) -> flow_ids::Result<ndarray::Array2<f64>> {
            self.0.predict_proba(x)
        }
    }
    let ctx = binary_context(Box::new(Counting(classifier.clone())), identity_scaler(&["a", "b"]));
    let t = table(
        &["a", "b"],
        &[&["1", ""], &["inf", "2"], &["abc", "NaN"], &["4", "5"]],
    );
    let err = run_inference(&ctx, &t).unwrap_err();
    let violations = match err {
        IdsError::DataValidation { violations } => violations,
        other => panic!("expected validation error, got {:?}", other),
    };
    assert_eq!(violations.len(), 4);
    assert_eq!(violations[0].row, 0);
    assert_eq!(violations[0].column, "b");
    assert_eq!(violations[0].kind, ViolationKind::Missing);
    assert_eq!(violations[1].kind, ViolationKind::Missing);
    assert_eq!(violations[2].kind, ViolationKind::NonNumeric);
    assert_eq!(violations[2].value, "abc");
    assert_eq!(classifier.calls(), 0);
}

#[test]
fn model_failure_surfaces_as_inference_error() {
    let ctx = binary_context(Box::new(FailingClassifier), identity_scaler(&["a"]));
    let err = run_inference(&ctx, &table(&["a"], &[&["1"]])).unwrap_err();
    assert!(matches!(err, IdsError::ModelInference(_)));
    assert_eq!(err.kind(), "model_inference");
}

#[test]
fn malformed_probability_matrix_rejected() {
    let classifier = CannedClassifier::new(vec![0, 1], array![[0.5, 0.5]]);
    let ctx = binary_context(Box::new(classifier), identity_scaler(&["a"]));
    let err = run_inference(&ctx, &table(&["a"], &[&["1"], &["2"]])).unwrap_err();
    assert!(matches!(err, IdsError::ModelInference(_)));
}

#[test]
fn encoder_out_of_range_is_inference_error() {
    let classifier = CannedClassifier::new(vec![5], array![[0.5, 0.5]]);
    let ctx = multi_class_context(Box::new(classifier), identity_scaler(&["a"]), &["Normal", "DoS"]);
    let err = run_inference(&ctx, &table(&["a"], &[&["1"]])).unwrap_err();
    assert!(matches!(err, IdsError::ModelInference(_)));
}

#[test]
fn empty_table_yields_no_results() {
    let ctx = binary_context(Box::new(FailingClassifier), identity_scaler(&["a"]));
    let out = run_inference(&ctx, &table(&["a"], &[])).unwrap();
    assert!(out.is_empty());
}

#[test]
fn header_only_upload_with_text_column_yields_no_results() {
    let scaler = StandardScaler::new(vec![], vec![0.0, 0.0], vec![1.0, 1.0]).unwrap();
    let ctx = binary_context(Box::new(FailingClassifier), scaler);
    let t = table(&["Timestamp", "a", "b", "Label"], &[]);
    let out = run_inference(&ctx, &t).unwrap();
    assert!(out.is_empty());
}

#[test]
fn unnamed_scaler_uses_numeric_columns_positionally() {
    let scaler = StandardScaler::new(vec![], vec![0.0, 0.0], vec![1.0, 1.0]).unwrap();
    let ctx = binary_context(Box::new(SignClassifier::new()), scaler);
    let t = table(
        &["Timestamp", "a", "b", "Label"],
        &[&["02/03/2018 08:47:38", "1", "2", "0"]],
    );
    let out = run_inference(&ctx, &t).unwrap();
    assert_eq!(out[0].class, "Attack");

    let wrong = table(&["a", "b", "c"], &[&["1", "2", "3"]]);
    let err = run_inference(&ctx, &wrong).unwrap_err();
    assert!(matches!(err, IdsError::SchemaMismatch { expected: 2, found: 3, .. }));
}

#[test]
fn repeated_calls_are_deterministic() {
    let ctx = binary_context(Box::new(SignClassifier::new()), identity_scaler(&["a"]));
    let t = table(&["a"], &[&["1"], &["-2"]]);
    let first = run_inference(&ctx, &t).unwrap();
    let second = run_inference(&ctx, &t).unwrap();
    assert_eq!(first, second);
}

#[test]
fn one_context_serves_concurrent_batches() {
    fn assert_shareable<T: Send + Sync>(_: &T) {}
    let ctx = binary_context(Box::new(SignClassifier::new()), identity_scaler(&["a"]));
    assert_shareable(&ctx);

    let t = table(&["a"], &[&["1"], &["-1"], &["2"]]);
    let expected = run_inference(&ctx, &t).unwrap();
    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(|| run_inference(&ctx, &t).unwrap()))
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), expected);
        }
    });
}
