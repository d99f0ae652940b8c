//! Client state slots and their transitions.

use std::path::{Path, PathBuf};

use plagcheck_contract::{DetectionResult, HealthStatus};
use plagcheck_core::{
    CoreError, DetectionConfig, DetectionRequest, FileCandidate, SelectedFile,
    TextDetectionRequest,
};
use plagcheck_transport::{BackendError, FailureClass, classify_backend_error};

const NO_RESPONSE_MESSAGE: &str = "network error or timeout: the detection service did not respond";
const HEALTH_NO_RESPONSE_MESSAGE: &str = "network error or timeout";

/// Detection cycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionPhase {
    /// Nothing submitted since the last selection or reset.
    Idle,
    /// A run is in flight; the trigger should be disabled.
    Pending,
    /// Last run produced a result.
    Completed,
    /// Last run failed.
    Failed,
}

/// Health probe phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthPhase {
    /// Never probed.
    Idle,
    /// Probe in flight.
    Checking,
    /// Last probe succeeded.
    HealthOk,
    /// Last probe failed.
    HealthError,
}

/// Report download phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadPhase {
    /// No download attempted for the current result.
    Idle,
    /// Download in flight.
    Downloading,
    /// Report written to disk.
    Saved,
    /// Download failed; the result stays displayed.
    Failed,
}

/// Identifies one detection run so late responses can be matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunTicket(u64);

/// Aggregate client state.
#[derive(Debug, Clone)]
pub struct ClientState {
    /// Detection settings; survive resets.
    pub config: DetectionConfig,
    selection: Option<SelectedFile>,
    detection_phase: DetectionPhase,
    result: Option<DetectionResult>,
    detection_error: Option<String>,
    health_phase: HealthPhase,
    health_status: Option<HealthStatus>,
    health_error: Option<String>,
    download_phase: DownloadPhase,
    download_error: Option<String>,
    saved_report: Option<PathBuf>,
    active_run: Option<RunTicket>,
    issued_runs: u64,
}

impl Default for ClientState {
    fn default() -> Self {
        Self::new(DetectionConfig::default())
    }
}

impl ClientState {
    /// Creates idle state with the given settings.
    pub fn new(config: DetectionConfig) -> Self {
        Self {
            config,
            selection: None,
            detection_phase: DetectionPhase::Idle,
            result: None,
            detection_error: None,
            health_phase: HealthPhase::Idle,
            health_status: None,
            health_error: None,
            download_phase: DownloadPhase::Idle,
            download_error: None,
            saved_report: None,
            active_run: None,
            issued_runs: 0,
        }
    }

    /// Validates and stores a document in one step.
    ///
    /// # Errors
    /// Returns the validation error after recording it via
    /// [`ClientState::reject_file`].
    pub fn select_candidate(
        &mut self,
        candidate: FileCandidate,
        bytes: Vec<u8>,
    ) -> Result<(), CoreError> {
        match SelectedFile::new(candidate, bytes) {
            Ok(file) => {
                self.select_file(file);
                Ok(())
            }
            Err(error) => {
                self.reject_file(&error);
                Err(error)
            }
        }
    }

    /// Stores a validated document. Any previous result, error or in-flight
    /// run is invalidated.
    pub fn select_file(&mut self, file: SelectedFile) {
        self.selection = Some(file);
        self.clear_detection();
    }

    /// Records a rejected selection. The previous selection and result are
    /// kept.
    pub fn reject_file(&mut self, error: &CoreError) {
        self.detection_error = Some(error.to_string());
    }

    /// Starts a document run and snapshots the request.
    ///
    /// # Errors
    /// Returns [`CoreError::NoFileSelected`] without changing the phase when
    /// nothing is selected.
    pub fn begin_detection(&mut self) -> Result<(RunTicket, DetectionRequest), CoreError> {
        let Some(file) = self.selection.clone() else {
            let error = CoreError::NoFileSelected;
            self.detection_error = Some(error.to_string());
            return Err(error);
        };

        let request = DetectionRequest::new(file, &self.config);
        Ok((self.start_run(), request))
    }

    /// Starts a raw-text run.
    ///
    /// # Errors
    /// Returns [`CoreError::TextTooShort`] without changing the phase.
    pub fn begin_text_detection(
        &mut self,
        text: impl Into<String>,
    ) -> Result<(RunTicket, TextDetectionRequest), CoreError> {
        match TextDetectionRequest::new(text, &self.config) {
            Ok(request) => Ok((self.start_run(), request)),
            Err(error) => {
                self.detection_error = Some(error.to_string());
                Err(error)
            }
        }
    }

    /// Starts loading a stored result by task id.
    pub fn begin_result_lookup(&mut self) -> RunTicket {
        self.start_run()
    }

    /// Applies a run outcome. Returns `false` and changes nothing when the
    /// ticket was superseded by a reset, a new selection or a newer run.
    pub fn finish_detection(
        &mut self,
        ticket: RunTicket,
        outcome: Result<DetectionResult, BackendError>,
    ) -> bool {
        if self.active_run != Some(ticket) {
            return false;
        }
        self.active_run = None;

        match outcome {
            Ok(result) => {
                self.result = Some(result);
                self.detection_error = None;
                self.detection_phase = DetectionPhase::Completed;
            }
            Err(error) => {
                self.detection_error = Some(detection_error_message(&error));
                self.detection_phase = DetectionPhase::Failed;
            }
        }
        true
    }

    /// Starts a health probe; clears the previous probe outcome only.
    pub fn begin_health_check(&mut self) {
        self.health_phase = HealthPhase::Checking;
        self.health_status = None;
        self.health_error = None;
    }

    /// Applies a health probe outcome.
    pub fn finish_health_check(&mut self, outcome: Result<HealthStatus, BackendError>) {
        match outcome {
            Ok(status) => {
                self.health_status = Some(status);
                self.health_phase = HealthPhase::HealthOk;
            }
            Err(error) => {
                self.health_error = Some(health_error_message(&error));
                self.health_phase = HealthPhase::HealthError;
            }
        }
    }

    /// Starts a report download. Returns the task id to fetch, or `None`
    /// (no-op) when no completed result exists.
    pub fn begin_download(&mut self) -> Option<String> {
        if self.detection_phase != DetectionPhase::Completed {
            return None;
        }
        let task_id = self.result.as_ref()?.task_id.clone();
        self.download_phase = DownloadPhase::Downloading;
        self.download_error = None;
        Some(task_id)
    }

    /// Applies a download outcome. The displayed result is never touched.
    pub fn finish_download(&mut self, outcome: Result<PathBuf, String>) {
        match outcome {
            Ok(path) => {
                self.saved_report = Some(path);
                self.download_phase = DownloadPhase::Saved;
            }
            Err(message) => {
                self.download_error = Some(message);
                self.download_phase = DownloadPhase::Failed;
            }
        }
    }

    /// Drops the displayed result when it belongs to a deleted task.
    pub fn forget_task(&mut self, task_id: &str) {
        if self
            .result
            .as_ref()
            .is_some_and(|result| result.task_id == task_id)
        {
            self.result = None;
            self.detection_phase = DetectionPhase::Idle;
            self.download_phase = DownloadPhase::Idle;
            self.download_error = None;
            self.saved_report = None;
        }
    }

    /// Clears selection, result and errors. Health and settings persist.
    pub fn reset(&mut self) {
        self.selection = None;
        self.clear_detection();
    }

    /// Dismisses the detection error.
    pub fn dismiss_detection_error(&mut self) {
        self.detection_error = None;
    }

    /// Dismisses the health error.
    pub fn dismiss_health_error(&mut self) {
        self.health_error = None;
    }

    /// Dismisses the download error.
    pub fn dismiss_download_error(&mut self) {
        self.download_error = None;
    }

    /// Currently selected document.
    pub fn selection(&self) -> Option<&SelectedFile> {
        self.selection.as_ref()
    }

    /// Detection phase.
    pub fn detection_phase(&self) -> DetectionPhase {
        self.detection_phase
    }

    /// Displayed result.
    pub fn result(&self) -> Option<&DetectionResult> {
        self.result.as_ref()
    }

    /// Detection error slot.
    pub fn detection_error(&self) -> Option<&str> {
        self.detection_error.as_deref()
    }

    /// Health phase.
    pub fn health_phase(&self) -> HealthPhase {
        self.health_phase
    }

    /// Last health payload.
    pub fn health_status(&self) -> Option<&HealthStatus> {
        self.health_status.as_ref()
    }

    /// Health error slot.
    pub fn health_error(&self) -> Option<&str> {
        self.health_error.as_deref()
    }

    /// Download phase.
    pub fn download_phase(&self) -> DownloadPhase {
        self.download_phase
    }

    /// Download error slot.
    pub fn download_error(&self) -> Option<&str> {
        self.download_error.as_deref()
    }

    /// Where the last report was written.
    pub fn saved_report(&self) -> Option<&Path> {
        self.saved_report.as_deref()
    }

    /// Whether the detection trigger should be enabled.
    pub fn can_run_detection(&self) -> bool {
        self.selection.is_some() && self.detection_phase != DetectionPhase::Pending
    }

    fn start_run(&mut self) -> RunTicket {
        self.issued_runs += 1;
        let ticket = RunTicket(self.issued_runs);
        self.active_run = Some(ticket);
        self.detection_phase = DetectionPhase::Pending;
        self.detection_error = None;
        self.result = None;
        self.download_phase = DownloadPhase::Idle;
        self.download_error = None;
        self.saved_report = None;
        ticket
    }

    fn clear_detection(&mut self) {
        self.result = None;
        self.detection_error = None;
        self.detection_phase = DetectionPhase::Idle;
        self.active_run = None;
        self.download_phase = DownloadPhase::Idle;
        self.download_error = None;
        self.saved_report = None;
    }
}

/// Detection slot wording: server detail first, then a status line, then the
/// generic no-response message, then the raw error text.
pub(crate) fn detection_error_message(error: &BackendError) -> String {
    match error {
        BackendError::Server {
            detail: Some(detail),
            ..
        } => detail.clone(),
        _ if classify_backend_error(error) == FailureClass::NoResponse => {
            NO_RESPONSE_MESSAGE.to_string()
        }
        _ => error.to_string(),
    }
}

/// Health slot wording: `HTTP <status>: <detail>` or the no-response message.
pub(crate) fn health_error_message(error: &BackendError) -> String {
    match classify_backend_error(error) {
        FailureClass::NoResponse => HEALTH_NO_RESPONSE_MESSAGE.to_string(),
        FailureClass::ServerRejected | FailureClass::Local => error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detection_message_prefers_detail_then_status_then_generic() {
        let detail = BackendError::Server {
            status: 400,
            detail: Some("Abstract not found in PDF".to_string()),
        };
        assert_eq!(detection_error_message(&detail), "Abstract not found in PDF");

        let bare = BackendError::Server {
            status: 500,
            detail: None,
        };
        assert_eq!(detection_error_message(&bare), "HTTP 500: server error");

        assert_eq!(
            detection_error_message(&BackendError::Timeout),
            NO_RESPONSE_MESSAGE
        );
        assert_eq!(
            detection_error_message(&BackendError::Request("bad mime".to_string())),
            "invalid request: bad mime"
        );
    }

    #[test]
    fn health_message_includes_status() {
        let error = BackendError::Server {
            status: 503,
            detail: None,
        };
        assert_eq!(health_error_message(&error), "HTTP 503: server error");
        assert_eq!(
            health_error_message(&BackendError::Network("refused".to_string())),
            HEALTH_NO_RESPONSE_MESSAGE
        );
    }
}
