#![warn(missing_docs)]
//! # plagcheck-transport
//!
//! ## Purpose
//! Puts the remote detection service behind one narrow capability trait.
//!
//! ## Responsibilities
//! - Define [`DetectionBackend`], the only way client state reaches the
//!   network.
//! - Resolve and validate the API base URL ([`ApiBase`]).
//! - Provide the reqwest-backed [`HttpBackend`] with per-operation timeouts.
//! - Classify failures so callers can word their error slots.
//!
//! ## Data flow
//! Client state builds a request -> [`DetectionBackend`] method -> parsed
//! contract type or [`BackendError`] -> client state transition.
//!
//! ## Ownership and lifetimes
//! Backends borrow requests for the duration of one call and return owned
//! responses, so several calls can be joined on one event loop.
//!
//! ## Error model
//! Every failure is a [`BackendError`]; [`classify_backend_error`] tells
//! whether a response was received at all.

mod endpoint;
mod http;

use async_trait::async_trait;
use plagcheck_contract::{ContractError, DetectionResult, HealthStatus, TaskDeletion, TaskList};
use plagcheck_core::{DetectionRequest, TextDetectionRequest};
use thiserror::Error;

pub use endpoint::{ApiBase, DEFAULT_API_BASE, resolve_api_base};
pub use http::{BackendTimeouts, HttpBackend};

/// Capability interface to the detection service.
///
/// Implementations must not touch client state; they only move requests and
/// responses.
#[async_trait]
pub trait DetectionBackend: Send + Sync {
    /// Uploads a document for detection.
    async fn submit_detection(
        &self,
        request: &DetectionRequest,
    ) -> Result<DetectionResult, BackendError>;

    /// Submits raw text for detection.
    async fn submit_text(
        &self,
        request: &TextDetectionRequest,
    ) -> Result<DetectionResult, BackendError>;

    /// Probes service health.
    async fn fetch_health(&self) -> Result<HealthStatus, BackendError>;

    /// Downloads the CSV report for a task.
    async fn fetch_report(&self, task_id: &str) -> Result<Vec<u8>, BackendError>;

    /// Fetches a stored result by task id.
    async fn fetch_result(&self, task_id: &str) -> Result<DetectionResult, BackendError>;

    /// Lists stored tasks.
    async fn list_tasks(&self) -> Result<TaskList, BackendError>;

    /// Deletes a stored task and its report.
    async fn delete_task(&self, task_id: &str) -> Result<TaskDeletion, BackendError>;
}

/// Coarse failure classes used to pick user-facing wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// Nothing came back (timeout, DNS, refused connection).
    NoResponse,
    /// The server answered with a non-success status.
    ServerRejected,
    /// Anything else: request construction or an unreadable body.
    Local,
}

/// Classifies a backend failure.
pub fn classify_backend_error(error: &BackendError) -> FailureClass {
    match error {
        BackendError::Timeout | BackendError::Network(_) => FailureClass::NoResponse,
        BackendError::Server { .. } => FailureClass::ServerRejected,
        BackendError::Contract(_) | BackendError::Request(_) | BackendError::InvalidBaseUrl(_) => {
            FailureClass::Local
        }
    }
}

/// Errors produced by backend calls.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The bounded wait elapsed.
    #[error("request timed out")]
    Timeout,
    /// Connection-level failure; no response was received.
    #[error("network failure: {0}")]
    Network(String),
    /// Non-success status.
    #[error("HTTP {status}: {}", detail.as_deref().unwrap_or("server error"))]
    Server {
        /// Status code.
        status: u16,
        /// Structured `detail` from the error body.
        detail: Option<String>,
    },
    /// Body could not be parsed or broke contract invariants.
    #[error(transparent)]
    Contract(#[from] ContractError),
    /// Request could not be constructed.
    #[error("invalid request: {0}")]
    Request(String),
    /// API base URL is unusable.
    #[error("invalid API base URL: {0}")]
    InvalidBaseUrl(String),
}
