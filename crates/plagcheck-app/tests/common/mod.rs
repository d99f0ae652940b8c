//! Shared fixtures for app integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use plagcheck_contract::{
    DetectionResult, HealthStatus, SegmentResult, TaskDeletion, TaskList,
};
use plagcheck_core::{DetectionRequest, TextDetectionRequest};
use plagcheck_transport::{BackendError, DetectionBackend};

/// Canned outcome for one fake operation.
#[derive(Debug, Clone)]
pub enum Scripted<T> {
    /// Successful response.
    Ok(T),
    /// Non-success status with optional detail.
    Status(u16, Option<String>),
    /// No response within the bounded wait.
    Timeout,
    /// Responds after a delay.
    Delayed(Duration, T),
}

impl<T: Clone> Scripted<T> {
    async fn play(&self) -> Result<T, BackendError> {
        match self {
            Scripted::Ok(value) => Ok(value.clone()),
            Scripted::Status(status, detail) => Err(BackendError::Server {
                status: *status,
                detail: detail.clone(),
            }),
            Scripted::Timeout => Err(BackendError::Timeout),
            Scripted::Delayed(delay, value) => {
                tokio::time::sleep(*delay).await;
                Ok(value.clone())
            }
        }
    }
}

/// Call counters per operation.
#[derive(Debug, Default)]
pub struct Calls {
    pub detect: AtomicUsize,
    pub text: AtomicUsize,
    pub health: AtomicUsize,
    pub report: AtomicUsize,
    pub result: AtomicUsize,
    pub tasks: AtomicUsize,
    pub delete: AtomicUsize,
}

fn count(counter: &AtomicUsize) {
    counter.fetch_add(1, Ordering::SeqCst);
}

/// Scripted in-memory backend.
pub struct FakeBackend {
    pub detection: Scripted<DetectionResult>,
    pub health: Scripted<HealthStatus>,
    pub report: Scripted<Vec<u8>>,
    pub calls: Calls,
}

impl FakeBackend {
    pub fn healthy() -> Self {
        Self {
            detection: Scripted::Ok(thesis_result()),
            health: Scripted::Ok(health_status()),
            report: Scripted::Ok(b"segment_id,similarity_score\n1,0.42\n".to_vec()),
            calls: Calls::default(),
        }
    }

    pub fn detect_calls(&self) -> usize {
        self.calls.detect.load(Ordering::SeqCst)
    }

    pub fn report_calls(&self) -> usize {
        self.calls.report.load(Ordering::SeqCst)
    }

    pub fn health_calls(&self) -> usize {
        self.calls.health.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DetectionBackend for FakeBackend {
    async fn submit_detection(
        &self,
        _request: &DetectionRequest,
    ) -> Result<DetectionResult, BackendError> {
        count(&self.calls.detect);
        self.detection.play().await
    }

    async fn submit_text(
        &self,
        _request: &TextDetectionRequest,
    ) -> Result<DetectionResult, BackendError> {
        count(&self.calls.text);
        self.detection.play().await
    }

    async fn fetch_health(&self) -> Result<HealthStatus, BackendError> {
        count(&self.calls.health);
        self.health.play().await
    }

    async fn fetch_report(&self, _task_id: &str) -> Result<Vec<u8>, BackendError> {
        count(&self.calls.report);
        self.report.play().await
    }

    async fn fetch_result(&self, _task_id: &str) -> Result<DetectionResult, BackendError> {
        count(&self.calls.result);
        self.detection.play().await
    }

    async fn list_tasks(&self) -> Result<TaskList, BackendError> {
        count(&self.calls.tasks);
        Ok(TaskList {
            total_tasks: 0,
            tasks: Vec::new(),
        })
    }

    async fn delete_task(&self, task_id: &str) -> Result<TaskDeletion, BackendError> {
        count(&self.calls.delete);
        Ok(TaskDeletion {
            message: "Task deleted successfully".to_string(),
            task_id: task_id.to_string(),
        })
    }
}

/// Ten-segment result: 3 plagiarized, 7 original, 30%.
pub fn thesis_result() -> DetectionResult {
    let scores = [0.42, 0.91, 0.33, 0.80, 0.88, 0.12, 0.74, 0.51, 0.97, 0.60];
    DetectionResult {
        task_id: "task-thesis".to_string(),
        filename: Some("thesis.pdf".to_string()),
        status: Some("completed".to_string()),
        total_segments: 10,
        plagiarized_segments: 3,
        original_segments: 7,
        plagiarism_percentage: 30.0,
        processing_time: 12.4,
        avg_similarity: 0.628,
        threshold_used: Some(0.75),
        timestamp: None,
        details: scores
            .iter()
            .enumerate()
            .map(|(index, score)| {
                let id = index as u64 + 1;
                SegmentResult {
                    segment_id: id,
                    segment_text: format!("segment text {id}"),
                    similarity_score: *score,
                    label: if matches!(id, 2 | 5 | 9) {
                        "PLAGIARIZED".to_string()
                    } else {
                        "Original".to_string()
                    },
                    word_count: Some(40),
                    best_match: None,
                    source_url: None,
                    source_title: None,
                    source_domain: None,
                }
            })
            .collect(),
    }
}

pub fn health_status() -> HealthStatus {
    serde_json::from_str(
        r#"{"status":"healthy","services":{"api":"running","sbert_model":"loaded","google_cse":"available"}}"#,
    )
    .expect("health fixture should parse")
}

/// Writes a small PDF-looking file (magic bytes only).
pub fn write_pdf(dir: &Path, name: &str, body_len: usize) -> PathBuf {
    let mut bytes = b"%PDF-1.7\n".to_vec();
    bytes.resize(bytes.len() + body_len, b' ');
    let path = dir.join(name);
    std::fs::write(&path, bytes).expect("pdf fixture should be writable");
    path
}
