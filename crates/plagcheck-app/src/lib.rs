#![warn(missing_docs)]
//! # plagcheck-app
//!
//! ## Purpose
//! Orchestrates document selection, detection runs, health probes and report
//! downloads for the `plagcheck` command line client.
//!
//! ## Responsibilities
//! - Resolve client settings from flags and `PLAGCHECK_*` variables.
//! - Turn a file path into a validated selection without reading oversized
//!   files.
//! - Drive [`plagcheck_ui::ClientState`] transitions around backend calls.
//! - Save CSV reports and render results as plain text.
//!
//! ## Data flow
//! Path -> [`candidate_from_path`] -> [`DetectionClient::select_path`] ->
//! [`DetectionClient::run_detection`] -> result views -> optional
//! [`DetectionClient::download_report`].
//!
//! ## Ownership and lifetimes
//! [`DetectionClient`] owns both the backend and the state; backend futures
//! borrow only the request snapshot, and state changes happen between awaits.
//!
//! ## Error model
//! Pre-flight and I/O failures return [`ClientError`]. Backend failures land
//! in the matching state slot and are reported through the returned phase.

mod client;
mod render;
mod settings;

use std::path::PathBuf;

use plagcheck_core::CoreError;
use plagcheck_transport::BackendError;
use plagcheck_ui::ClientState;
use thiserror::Error;

pub use client::{DetectionClient, candidate_from_path};
pub use render::{render_health, render_result, render_segment_details, render_tasks};
pub use settings::{
    API_URL_ENV, ClientSettings, DETECT_TIMEOUT_ENV, HEALTH_TIMEOUT_ENV, LOG_ENV,
    REPORT_DIR_ENV, REPORT_TIMEOUT_ENV, init_logging,
};

/// Build-time application version loaded from root `VERSION` file.
pub const APP_VERSION: &str = env!("PLAGCHECK_VERSION");

/// Returns the app version sourced from root `VERSION`.
pub fn app_version() -> &'static str {
    APP_VERSION
}

/// Flat snapshot of every state slot, for status lines and logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientStatus {
    /// Whether the detection trigger is enabled.
    pub can_run_detection: bool,
    /// Detection phase name.
    pub detection: String,
    /// Health phase name.
    pub health: String,
    /// Download phase name.
    pub download: String,
    /// First error among detection, health and download slots.
    pub error: Option<String>,
}

/// Projects client state into a flat status snapshot.
pub fn project_client_status(state: &ClientState) -> ClientStatus {
    ClientStatus {
        can_run_detection: state.can_run_detection(),
        detection: format!("{:?}", state.detection_phase()),
        health: format!("{:?}", state.health_phase()),
        download: format!("{:?}", state.download_phase()),
        error: state
            .detection_error()
            .or(state.health_error())
            .or(state.download_error())
            .map(str::to_string),
    }
}

/// App-level error type.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Request-side validation failed.
    #[error(transparent)]
    Core(#[from] CoreError),
    /// Backend call failed outside a state slot.
    #[error(transparent)]
    Backend(#[from] BackendError),
    /// Local file could not be inspected or read.
    #[error("failed to read {}: {source}", path.display())]
    ReadFile {
        /// Offending path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Report download or save failed; the message is also in the download
    /// slot.
    #[error("{0}")]
    Download(String),
    /// A configuration value could not be used.
    #[error("invalid setting {key}: {reason}")]
    InvalidSetting {
        /// Variable or flag name.
        key: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}
