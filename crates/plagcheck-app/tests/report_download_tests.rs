//! Integration tests for CSV report downloads.

mod common;

use plagcheck_app::{ClientError, DetectionClient};
use plagcheck_core::DetectionConfig;
use plagcheck_ui::{DetectionPhase, DownloadPhase};

use common::{FakeBackend, Scripted};

#[tokio::test]
async fn report_download_tests_without_result_is_noop() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut client = DetectionClient::new(FakeBackend::healthy(), DetectionConfig::default(), dir.path());

    let saved = client.download_report().await.expect("no-op succeeds");
    assert_eq!(saved, None);
    assert_eq!(client.backend().report_calls(), 0);
    assert_eq!(client.state().download_phase(), DownloadPhase::Idle);
}

#[tokio::test]
async fn report_download_tests_saves_under_task_filename() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut client = DetectionClient::new(FakeBackend::healthy(), DetectionConfig::default(), dir.path());
    client.load_result("task-thesis").await;

    let saved = client
        .download_report()
        .await
        .expect("download should succeed")
        .expect("report path");
    assert_eq!(saved, dir.path().join("laporan_plagiarisme_task-thesis.csv"));
    let body = std::fs::read_to_string(&saved).expect("report readable");
    assert!(body.starts_with("segment_id,similarity_score"));
    assert_eq!(client.state().download_phase(), DownloadPhase::Saved);
    assert_eq!(client.state().saved_report(), Some(saved.as_path()));
}

#[tokio::test]
async fn report_download_tests_failure_keeps_result() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut backend = FakeBackend::healthy();
    backend.report = Scripted::Status(404, Some("Report not found".to_string()));
    let mut client = DetectionClient::new(backend, DetectionConfig::default(), dir.path());
    client.load_result("task-thesis").await;

    let error = client.download_report().await.expect_err("download fails");
    assert!(matches!(error, ClientError::Download(_)));
    assert_eq!(
        client.state().download_error(),
        Some("failed to download report: HTTP 404: Report not found")
    );
    assert_eq!(client.state().download_phase(), DownloadPhase::Failed);
    assert_eq!(client.state().detection_phase(), DetectionPhase::Completed);
    assert!(client.result().is_some());
    assert!(client.state().detection_error().is_none());
}
