//! Contract Test: Alert Throttling
//!
//! Constraints verified:
//! - Repeated runs classify identically, but only the first one alerts
//! - The cooldown is measured from the last successful dispatch
//! - A failed dispatch does not arm the gate
//! - A corrupt state file fails open
//!
//! If this test fails, alert storms or silent suppression are possible.

mod common;

use common::*;
use dnswatch_core::state::{FileAlertStore, MemoryAlertStore};
use dnswatch_core::traits::AlertStore;
use dnswatch_core::{AlertOutcome, MonitorEngine};
use std::sync::Arc;
use tempfile::tempdir;

fn mismatching_resolver() -> Arc<TableResolver> {
    Arc::new(
        TableResolver::new()
            .with("a.example", [1, 2, 3, 4])
            .with("b.example", [9, 9, 9, 9]),
    )
}

#[tokio::test]
async fn second_immediate_run_is_suppressed() {
    let notifier = RecordingNotifier::new();
    let store = MemoryAlertStore::new();

    let engine = MonitorEngine::new(
        Box::new(FixedIpSource::ok("1.2.3.4")),
        mismatching_resolver(),
        Arc::new(store.clone()),
        Box::new(RecordingNotifier::sharing_counters_with(&notifier)),
        minimal_config(&["a.example", "b.example"]),
    )
    .expect("engine construction succeeds");

    let first = engine.run_once_at(T0).await.unwrap();
    let second = engine.run_once_at(T0 + 1.0).await.unwrap();

    assert_eq!(first.checks, second.checks, "classification is stable");
    assert_eq!(first.anomalies, second.anomalies);

    assert_eq!(first.alert, AlertOutcome::Sent);
    assert_eq!(second.alert, AlertOutcome::Suppressed);
    assert_eq!(notifier.attempt_count(), 1);

    // Suppressed run does not move the timestamp
    assert_eq!(store.load_last_sent().await.unwrap(), Some(T0));
}

#[tokio::test]
async fn alert_resumes_once_cooldown_elapsed() {
    let notifier = RecordingNotifier::new();
    let store = MemoryAlertStore::new();

    let engine = MonitorEngine::new(
        Box::new(FixedIpSource::ok("1.2.3.4")),
        mismatching_resolver(),
        Arc::new(store.clone()),
        Box::new(RecordingNotifier::sharing_counters_with(&notifier)),
        minimal_config(&["a.example", "b.example"]),
    )
    .expect("engine construction succeeds");

    assert_eq!(engine.run_once_at(T0).await.unwrap().alert, AlertOutcome::Sent);
    assert_eq!(
        engine.run_once_at(T0 + 8999.0).await.unwrap().alert,
        AlertOutcome::Suppressed
    );
    assert_eq!(
        engine.run_once_at(T0 + 9000.0).await.unwrap().alert,
        AlertOutcome::Sent
    );

    assert_eq!(notifier.sent().len(), 2);
    assert_eq!(store.load_last_sent().await.unwrap(), Some(T0 + 9000.0));
}

#[tokio::test]
async fn failed_dispatch_leaves_gate_open() {
    let notifier = RecordingNotifier::failing();
    let store = MemoryAlertStore::new();

    let engine = MonitorEngine::new(
        Box::new(FixedIpSource::ok("1.2.3.4")),
        mismatching_resolver(),
        Arc::new(store.clone()),
        Box::new(RecordingNotifier::sharing_counters_with(&notifier)),
        minimal_config(&["b.example"]),
    )
    .expect("engine construction succeeds");

    let report = engine.run_once_at(T0).await.expect("run still completes");
    assert!(matches!(report.alert, AlertOutcome::Failed(_)));
    assert_eq!(store.load_last_sent().await.unwrap(), None);

    // Next run tries again
    engine.run_once_at(T0 + 1.0).await.unwrap();
    assert_eq!(notifier.attempt_count(), 2);
}

#[tokio::test]
async fn corrupt_state_file_fails_open() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("last_mail_time.txt");
    tokio::fs::write(&path, "garbage").await.unwrap();

    let notifier = RecordingNotifier::new();
    let engine = MonitorEngine::new(
        Box::new(FixedIpSource::ok("1.2.3.4")),
        mismatching_resolver(),
        Arc::new(FileAlertStore::new(&path)),
        Box::new(RecordingNotifier::sharing_counters_with(&notifier)),
        minimal_config(&["b.example"]),
    )
    .expect("engine construction succeeds");

    let report = engine.run_once_at(T0).await.unwrap();
    assert_eq!(report.alert, AlertOutcome::Sent);
    assert_eq!(notifier.sent().len(), 1);

    // Dispatch repaired the file
    let reloaded = FileAlertStore::new(&path).load_last_sent().await.unwrap();
    assert_eq!(reloaded, Some(T0));
}

#[tokio::test]
async fn file_state_survives_between_engines() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("last_mail_time.txt");
    let notifier = RecordingNotifier::new();

    // Two separate "invocations" sharing only the state file
    for offset in [0.0, 60.0] {
        let engine = MonitorEngine::new(
            Box::new(FixedIpSource::ok("1.2.3.4")),
            mismatching_resolver(),
            Arc::new(FileAlertStore::new(&path)),
            Box::new(RecordingNotifier::sharing_counters_with(&notifier)),
            minimal_config(&["b.example"]),
        )
        .expect("engine construction succeeds");

        engine.run_once_at(T0 + offset).await.unwrap();
    }

    assert_eq!(notifier.attempt_count(), 1);
}
