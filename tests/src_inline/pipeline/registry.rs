use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use super::*;
use crate::input::FeatureRecord;
use crate::model::error::{LoadError, PredictionError};

static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn make_temp_dir() -> PathBuf {
    let mut dir = std::env::temp_dir();
    let id = DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    dir.push(format!("perfscore_registry_test_{}_{}", std::process::id(), id));
    fs::create_dir_all(&dir).unwrap();
    dir
}

const ARTIFACT: &str = r#"{
    "format_version": 1,
    "name": "employee_performance_model",
    "version": "1",
    "schema": {
        "name": "employee_performance",
        "version": "1",
        "features": [
            {"name": "EmpJobSatisfaction", "type": "integer", "min": 1, "max": 4}
        ]
    },
    "estimator": {"family": "linear", "intercept": 2.0, "coefficients": [0.5]}
}"#;

fn write_artifact(dir: &std::path::Path) -> PathBuf {
    let path = dir.join("employee_performance_model.json");
    fs::write(&path, ARTIFACT).unwrap();
    path
}

fn registry() -> Arc<ModelRegistry> {
    Arc::new(ModelRegistry::new(Duration::from_secs(10)))
}

#[test]
fn test_load_is_memoized() {
    let dir = make_temp_dir();
    let path = write_artifact(&dir);
    let registry = registry();

    let first = registry.load(&path).unwrap();
    // a second load must not go back to disk
    fs::remove_file(&path).unwrap();
    let second = registry.load(&path).unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(registry.artifact_reads(), 1);
}

#[test]
fn test_missing_artifact_is_load_error() {
    let dir = make_temp_dir();
    let path = dir.join("employee_performance_model.json");
    let registry = registry();

    let err = registry.load(&path).unwrap_err();
    assert_eq!(err, LoadError::Missing { path: path.clone() });
}

#[test]
fn test_failed_load_is_terminal() {
    let dir = make_temp_dir();
    let path = dir.join("employee_performance_model.json");
    let registry = registry();
    let handle = registry.handle(&path);
    let record = FeatureRecord::new().with("EmpJobSatisfaction", 3);

    let err = handle.predict(&record).unwrap_err();
    assert!(matches!(
        err,
        PredictionError::ModelUnavailable(LoadError::Missing { .. })
    ));

    // the artifact showing up later does not revive the handle
    write_artifact(&dir);
    let err = handle.predict(&record).unwrap_err();
    assert!(matches!(err, PredictionError::ModelUnavailable(_)));
    assert_eq!(registry.artifact_reads(), 1);
}

#[test]
fn test_handle_predicts_and_validates() {
    let dir = make_temp_dir();
    let path = write_artifact(&dir);
    let handle = registry().handle(&path);

    let ok = FeatureRecord::new().with("EmpJobSatisfaction", 3);
    assert_eq!(handle.predict(&ok).unwrap().value(), 3.5);

    let bad = FeatureRecord::new().with("EmpJobSatisfactionTypo", 3);
    match handle.predict(&bad).unwrap_err() {
        PredictionError::Schema(err) => {
            assert_eq!(err.missing, vec!["EmpJobSatisfaction".to_string()]);
            assert_eq!(err.unexpected, vec!["EmpJobSatisfactionTypo".to_string()]);
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_racing_first_loads_read_once() {
    let dir = make_temp_dir();
    let path = write_artifact(&dir);
    let registry = registry();
    let barrier = Arc::new(Barrier::new(8));

    let workers: Vec<_> = (0..8)
        .map(|_| {
            let registry = Arc::clone(&registry);
            let barrier = Arc::clone(&barrier);
            let path = path.clone();
            thread::spawn(move || {
                barrier.wait();
                registry.load(&path).unwrap()
            })
        })
        .collect();
    let models: Vec<_> = workers.into_iter().map(|w| w.join().unwrap()).collect();

    assert_eq!(registry.artifact_reads(), 1);
    for m in &models[1..] {
        assert!(Arc::ptr_eq(&models[0], m));
    }
}

#[test]
fn test_load_with_timeout_passes_through_errors() {
    let dir = make_temp_dir();
    let path = dir.join("absent.json");
    let err = load_with_timeout(&path, Duration::from_secs(5)).unwrap_err();
    assert!(matches!(err, LoadError::Missing { .. }));

    let path = write_artifact(&dir);
    let model = load_with_timeout(&path, Duration::from_secs(5)).unwrap();
    assert_eq!(model.name, "employee_performance_model");
}

#[test]
fn test_load_with_zero_timeout_times_out() {
    let dir = make_temp_dir();
    let path = write_artifact(&dir);
    match load_with_timeout(&path, Duration::ZERO) {
        Err(LoadError::Timeout { after, .. }) => assert_eq!(after, Duration::ZERO),
        // the loader thread may win the race on a fast machine
        Ok(model) => assert_eq!(model.schema.len(), 1),
        Err(other) => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_global_registry_is_shared() {
    let a = ModelRegistry::global();
    let b = ModelRegistry::global();
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(a.load_timeout(), DEFAULT_LOAD_TIMEOUT);
}
