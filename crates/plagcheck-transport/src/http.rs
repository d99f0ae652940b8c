//! reqwest-backed [`DetectionBackend`].

use std::time::Duration;

use async_trait::async_trait;
use plagcheck_contract::{
    DetectionResult, HealthStatus, TaskDeletion, TaskList, extract_error_detail,
    parse_detection_result, parse_health_status, parse_task_deletion, parse_task_list,
};
use plagcheck_core::{DetectionRequest, PDF_MIME, TextDetectionRequest};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use tracing::debug;

use crate::{ApiBase, BackendError, DetectionBackend};

/// Bounded waits per operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackendTimeouts {
    /// Document and text detection.
    pub detection: Duration,
    /// Health probe.
    pub health: Duration,
    /// CSV report download.
    pub report: Duration,
    /// Task lookup, listing and deletion.
    pub tasks: Duration,
}

impl Default for BackendTimeouts {
    fn default() -> Self {
        Self {
            detection: Duration::from_secs(300),
            health: Duration::from_secs(10),
            report: Duration::from_secs(60),
            tasks: Duration::from_secs(30),
        }
    }
}

/// HTTP implementation of the detection service contract.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base: ApiBase,
    timeouts: BackendTimeouts,
}

impl HttpBackend {
    /// Builds a backend for `base`.
    ///
    /// # Errors
    /// Returns [`BackendError::Request`] when the HTTP client cannot be
    /// initialized.
    pub fn new(base: ApiBase, timeouts: BackendTimeouts) -> Result<Self, BackendError> {
        let client = Client::builder()
            .user_agent(concat!("plagcheck/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|error| BackendError::Request(error.to_string()))?;
        Ok(Self {
            client,
            base,
            timeouts,
        })
    }

    /// Base URL this backend talks to.
    pub fn base(&self) -> &ApiBase {
        &self.base
    }

    /// Sends one request and returns the success body.
    async fn execute(
        &self,
        operation: &'static str,
        builder: RequestBuilder,
        timeout: Duration,
    ) -> Result<Vec<u8>, BackendError> {
        let response = builder
            .timeout(timeout)
            .send()
            .await
            .map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        debug!(
            stage = "transport",
            action = operation,
            status = status.as_u16(),
            body_bytes = body.len(),
            "response received"
        );

        if !status.is_success() {
            return Err(BackendError::Server {
                status: status.as_u16(),
                detail: extract_error_detail(&body),
            });
        }

        Ok(body.to_vec())
    }
}

#[async_trait]
impl DetectionBackend for HttpBackend {
    async fn submit_detection(
        &self,
        request: &DetectionRequest,
    ) -> Result<DetectionResult, BackendError> {
        let file_part = Part::bytes(request.file.bytes().to_vec())
            .file_name(request.file.name().to_string())
            .mime_str(PDF_MIME)
            .map_err(|error| BackendError::Request(error.to_string()))?;
        let form = request
            .form_fields()
            .into_iter()
            .fold(Form::new().part("file", file_part), |form, (name, value)| {
                form.text(name, value)
            });

        let url = self.base.endpoint(&["api", "detect"]);
        let body = self
            .execute(
                "submit_detection",
                self.client.post(url).multipart(form),
                self.timeouts.detection,
            )
            .await?;
        Ok(parse_detection_result(&body)?)
    }

    async fn submit_text(
        &self,
        request: &TextDetectionRequest,
    ) -> Result<DetectionResult, BackendError> {
        let url = self.base.endpoint(&["api", "detect-text"]);
        let body = self
            .execute(
                "submit_text",
                self.client.post(url).form(&request.form_fields()),
                self.timeouts.detection,
            )
            .await?;
        Ok(parse_detection_result(&body)?)
    }

    async fn fetch_health(&self) -> Result<HealthStatus, BackendError> {
        let url = self.base.endpoint(&["health"]);
        let body = self
            .execute("fetch_health", self.client.get(url), self.timeouts.health)
            .await?;
        Ok(parse_health_status(&body)?)
    }

    async fn fetch_report(&self, task_id: &str) -> Result<Vec<u8>, BackendError> {
        let url = self.base.endpoint(&["api", "download", task_id]);
        self.execute("fetch_report", self.client.get(url), self.timeouts.report)
            .await
    }

    async fn fetch_result(&self, task_id: &str) -> Result<DetectionResult, BackendError> {
        let url = self.base.endpoint(&["api", "result", task_id]);
        let body = self
            .execute("fetch_result", self.client.get(url), self.timeouts.tasks)
            .await?;
        Ok(parse_detection_result(&body)?)
    }

    async fn list_tasks(&self) -> Result<TaskList, BackendError> {
        let url = self.base.endpoint(&["api", "tasks"]);
        let body = self
            .execute("list_tasks", self.client.get(url), self.timeouts.tasks)
            .await?;
        Ok(parse_task_list(&body)?)
    }

    async fn delete_task(&self, task_id: &str) -> Result<TaskDeletion, BackendError> {
        let url = self.base.endpoint(&["api", "task", task_id]);
        let body = self
            .execute("delete_task", self.client.delete(url), self.timeouts.tasks)
            .await?;
        Ok(parse_task_deletion(&body)?)
    }
}

fn map_transport_error(error: reqwest::Error) -> BackendError {
    if error.is_timeout() {
        BackendError::Timeout
    } else if error.is_builder() {
        BackendError::Request(error.to_string())
    } else {
        BackendError::Network(error.to_string())
    }
}
