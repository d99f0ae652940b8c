//! End-to-end tests: HTTP backend plus client against a mock service.

mod common;

use httpmock::prelude::*;
use plagcheck_app::{ClientSettings, DetectionClient, render_result};
use plagcheck_core::DetectionConfig;
use plagcheck_transport::HttpBackend;
use plagcheck_ui::DetectionPhase;

fn client_for(server: &MockServer, report_dir: &std::path::Path) -> DetectionClient<HttpBackend> {
    let base_url = server.base_url();
    let settings = ClientSettings::from_lookup(Some(&base_url), |_| None).expect("mock url");
    let backend = HttpBackend::new(settings.api_base, settings.timeouts).expect("backend");
    DetectionClient::new(backend, DetectionConfig::default(), report_dir)
}

#[tokio::test]
async fn http_end_to_end_tests_detect_then_download() {
    let server = MockServer::start_async().await;
    let result = serde_json::to_value(common::thesis_result()).expect("serialize fixture");
    let detect = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/detect")
                .body_contains("name=\"threshold\"\r\n\r\n0.75");
            then.status(200).json_body(result);
        })
        .await;
    let download = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/download/task-thesis");
            then.status(200)
                .header("content-type", "text/csv")
                .body("segment_id,similarity_score\n1,0.42\n");
        })
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let path = common::write_pdf(dir.path(), "thesis.pdf", 512);
    let mut client = client_for(&server, dir.path());
    client.select_path(&path).await.expect("pdf should be accepted");

    assert_eq!(
        client.run_detection().await.expect("file is selected"),
        DetectionPhase::Completed
    );
    let rendered = render_result(client.result().expect("result"), 0.75);
    assert!(rendered.contains("Total segments: 10"));
    assert!(rendered.contains("Plagiarism: 30%"));

    let saved = client
        .download_report()
        .await
        .expect("download should succeed")
        .expect("report path");
    detect.assert_async().await;
    download.assert_async().await;
    assert!(saved.ends_with("laporan_plagiarisme_task-thesis.csv"));
}

#[tokio::test]
async fn http_end_to_end_tests_validation_detail_list_is_joined() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/detect");
            then.status(422).json_body(serde_json::json!({
                "detail": [
                    {"loc": ["body", "threshold"], "msg": "value is not a valid float"},
                    {"loc": ["body", "file"], "msg": "field required"}
                ]
            }));
        })
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let path = common::write_pdf(dir.path(), "thesis.pdf", 32);
    let mut client = client_for(&server, dir.path());
    client.select_path(&path).await.expect("pdf should be accepted");

    assert_eq!(
        client.run_detection().await.expect("file is selected"),
        DetectionPhase::Failed
    );
    assert_eq!(
        client.state().detection_error(),
        Some("value is not a valid float; field required")
    );
}

#[tokio::test]
async fn http_end_to_end_tests_unreachable_service_reports_no_response() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = common::write_pdf(dir.path(), "thesis.pdf", 32);
    let settings =
        ClientSettings::from_lookup(Some("http://127.0.0.1:1"), |_| None).expect("valid url");
    let backend = HttpBackend::new(settings.api_base, settings.timeouts).expect("backend");
    let mut client = DetectionClient::new(backend, DetectionConfig::default(), dir.path());
    client.select_path(&path).await.expect("pdf should be accepted");

    assert_eq!(
        client.run_detection().await.expect("file is selected"),
        DetectionPhase::Failed
    );
    assert_eq!(
        client.state().detection_error(),
        Some("network error or timeout: the detection service did not respond")
    );
}
