//! Detection client: drives state transitions around backend calls.

use std::path::{Path, PathBuf};

use plagcheck_contract::{DetectionResult, HealthStatus, TaskDeletion, TaskList};
use plagcheck_core::{DetectionConfig, FileCandidate, report_filename, validate_candidate};
use plagcheck_transport::{BackendError, DetectionBackend};
use plagcheck_ui::{
    ChartSeries, ClientState, DetectionPhase, HealthPhase, RunTicket, derive_chart_series,
};
use tracing::{debug, info, warn};

use crate::ClientError;

const UNKNOWN_MIME: &str = "application/octet-stream";

/// Builds a candidate from file metadata and magic bytes. The file body is
/// not read.
///
/// # Errors
/// Returns [`ClientError::ReadFile`] when the path cannot be inspected.
pub fn candidate_from_path(path: &Path) -> Result<FileCandidate, ClientError> {
    let read_error = |source| ClientError::ReadFile {
        path: path.to_path_buf(),
        source,
    };

    let metadata = std::fs::metadata(path).map_err(read_error)?;
    let mime = infer::get_from_path(path)
        .map_err(read_error)?
        .map_or(UNKNOWN_MIME, |kind| kind.mime_type());
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    Ok(FileCandidate::new(name, mime, metadata.len()))
}

/// Owns the backend and the client state.
pub struct DetectionClient<B> {
    backend: B,
    state: ClientState,
    report_dir: PathBuf,
}

impl<B: DetectionBackend> DetectionClient<B> {
    /// Creates an idle client.
    pub fn new(backend: B, config: DetectionConfig, report_dir: impl Into<PathBuf>) -> Self {
        Self {
            backend,
            state: ClientState::new(config),
            report_dir: report_dir.into(),
        }
    }

    /// Current state.
    pub fn state(&self) -> &ClientState {
        &self.state
    }

    /// Mutable state, for configuration changes and dismissals.
    pub fn state_mut(&mut self) -> &mut ClientState {
        &mut self.state
    }

    /// Backend in use.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Validates and selects a document on disk.
    ///
    /// Type and size are checked before the body is read, so oversized files
    /// are never loaded.
    ///
    /// # Errors
    /// Returns [`ClientError::Core`] for a rejected document (the previous
    /// selection is kept) and [`ClientError::ReadFile`] for I/O failures.
    pub async fn select_path(&mut self, path: &Path) -> Result<(), ClientError> {
        let candidate = candidate_from_path(path)?;
        if let Err(error) = validate_candidate(&candidate) {
            warn!(
                stage = "selection",
                action = "rejected",
                mime = %candidate.mime,
                size_bytes = candidate.size,
                "document rejected"
            );
            self.state.reject_file(&error);
            return Err(error.into());
        }

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| ClientError::ReadFile {
                path: path.to_path_buf(),
                source,
            })?;
        let size = candidate.size;
        self.state.select_candidate(candidate, bytes)?;
        info!(
            stage = "selection",
            action = "accepted",
            size_bytes = size,
            "document selected"
        );
        Ok(())
    }

    /// Uploads the selected document and stores the outcome.
    ///
    /// # Errors
    /// Returns [`ClientError::Core`] with `NoFileSelected` before any network
    /// call. Backend failures are reported as [`DetectionPhase::Failed`].
    pub async fn run_detection(&mut self) -> Result<DetectionPhase, ClientError> {
        let (ticket, request) = self.state.begin_detection()?;
        info!(
            stage = "detection",
            action = "submit",
            size_bytes = request.file.size(),
            threshold = request.config.threshold(),
            "submitting document"
        );
        let outcome = self.backend.submit_detection(&request).await;
        Ok(self.apply_detection(ticket, outcome))
    }

    /// Runs detection and a health probe concurrently. Each outcome lands in
    /// its own slot.
    ///
    /// # Errors
    /// Returns [`ClientError::Core`] with `NoFileSelected` before any network
    /// call.
    pub async fn run_detection_with_health_check(
        &mut self,
    ) -> Result<(DetectionPhase, HealthPhase), ClientError> {
        let (ticket, request) = self.state.begin_detection()?;
        self.state.begin_health_check();
        info!(
            stage = "detection",
            action = "submit",
            size_bytes = request.file.size(),
            "submitting document with health probe"
        );

        let (detection, health) = tokio::join!(
            self.backend.submit_detection(&request),
            self.backend.fetch_health()
        );

        let health_phase = self.apply_health(health);
        let detection_phase = self.apply_detection(ticket, detection);
        Ok((detection_phase, health_phase))
    }

    /// Submits raw text for detection.
    ///
    /// # Errors
    /// Returns [`ClientError::Core`] with `TextTooShort` before any network
    /// call.
    pub async fn run_text_detection(
        &mut self,
        text: impl Into<String>,
    ) -> Result<DetectionPhase, ClientError> {
        let (ticket, request) = self.state.begin_text_detection(text)?;
        info!(
            stage = "detection",
            action = "submit_text",
            chars = request.char_count(),
            "submitting text"
        );
        let outcome = self.backend.submit_text(&request).await;
        Ok(self.apply_detection(ticket, outcome))
    }

    /// Loads a stored result into the detection slot.
    pub async fn load_result(&mut self, task_id: &str) -> DetectionPhase {
        let ticket = self.state.begin_result_lookup();
        info!(
            stage = "detection",
            action = "load_result",
            task_id,
            "loading stored result"
        );
        let outcome = self.backend.fetch_result(task_id).await;
        self.apply_detection(ticket, outcome)
    }

    /// Probes service health.
    pub async fn run_health_check(&mut self) -> HealthPhase {
        self.state.begin_health_check();
        let outcome = self.backend.fetch_health().await;
        self.apply_health(outcome)
    }

    /// Downloads the CSV report for the displayed result into the report
    /// directory. Returns `Ok(None)` without a network call when there is no
    /// completed result.
    ///
    /// # Errors
    /// Returns [`ClientError::Download`] when fetching or saving fails; the
    /// displayed result is kept.
    pub async fn download_report(&mut self) -> Result<Option<PathBuf>, ClientError> {
        let Some(task_id) = self.state.begin_download() else {
            debug!(stage = "download", action = "skipped", "no completed result");
            return Ok(None);
        };

        let outcome = match self.backend.fetch_report(&task_id).await {
            Ok(bytes) => {
                let path = self.report_dir.join(report_filename(&task_id));
                match tokio::fs::write(&path, &bytes).await {
                    Ok(()) => {
                        info!(
                            stage = "download",
                            action = "saved",
                            task_id = %task_id,
                            size_bytes = bytes.len(),
                            "report saved"
                        );
                        Ok(path)
                    }
                    Err(error) => Err(format!(
                        "failed to save report to {}: {error}",
                        path.display()
                    )),
                }
            }
            Err(error) => Err(format!("failed to download report: {error}")),
        };

        if let Err(message) = &outcome {
            warn!(
                stage = "download",
                action = "failed",
                task_id = %task_id,
                error = %message,
                "report download failed"
            );
        }
        self.state.finish_download(outcome.clone());
        outcome.map(Some).map_err(ClientError::Download)
    }

    /// Lists stored tasks.
    ///
    /// # Errors
    /// Returns [`ClientError::Backend`] on any backend failure.
    pub async fn list_tasks(&self) -> Result<TaskList, ClientError> {
        let tasks = self.backend.list_tasks().await?;
        debug!(
            stage = "tasks",
            action = "listed",
            total = tasks.total_tasks,
            "tasks listed"
        );
        Ok(tasks)
    }

    /// Deletes a stored task; clears the displayed result when it belongs to
    /// that task.
    ///
    /// # Errors
    /// Returns [`ClientError::Backend`] on any backend failure.
    pub async fn delete_task(&mut self, task_id: &str) -> Result<TaskDeletion, ClientError> {
        let deletion = self.backend.delete_task(task_id).await?;
        self.state.forget_task(task_id);
        info!(stage = "tasks", action = "deleted", task_id, "task deleted");
        Ok(deletion)
    }

    /// Clears selection, result and errors; health and settings persist.
    pub fn reset(&mut self) {
        self.state.reset();
        debug!(stage = "state", action = "reset", "client reset");
    }

    /// Displayed result, if any.
    pub fn result(&self) -> Option<&DetectionResult> {
        self.state.result()
    }

    /// Chart projections of the displayed result at the current threshold.
    pub fn chart_series(&self) -> Option<ChartSeries> {
        self.state
            .result()
            .map(|result| derive_chart_series(result, self.state.config.threshold()))
    }

    fn apply_detection(
        &mut self,
        ticket: RunTicket,
        outcome: Result<DetectionResult, BackendError>,
    ) -> DetectionPhase {
        match &outcome {
            Ok(result) => info!(
                stage = "detection",
                action = "completed",
                task_id = %result.task_id,
                total_segments = result.total_segments,
                "detection completed"
            ),
            Err(error) => warn!(
                stage = "detection",
                action = "failed",
                error = %error,
                "detection failed"
            ),
        }

        if !self.state.finish_detection(ticket, outcome) {
            debug!(stage = "detection", action = "discarded", "stale response ignored");
        }
        self.state.detection_phase()
    }

    fn apply_health(&mut self, outcome: Result<HealthStatus, BackendError>) -> HealthPhase {
        if let Err(error) = &outcome {
            warn!(
                stage = "health",
                action = "failed",
                error = %error,
                "health probe failed"
            );
        }
        self.state.finish_health_check(outcome);
        self.state.health_phase()
    }
}
