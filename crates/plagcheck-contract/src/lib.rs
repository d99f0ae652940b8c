#![warn(missing_docs)]
//! # plagcheck-contract
//!
//! ## Purpose
//! Defines the detection service response schema and client-side
//! classification helpers.
//!
//! ## Responsibilities
//! - Parse detection results, health payloads and task listings.
//! - Reject results that break the segment-count invariant.
//! - Extract the human-readable `detail` from error bodies.
//! - Classify segment labels for status chips.
//!
//! ## Data flow
//! Raw JSON body -> [`parse_detection_result`] -> UI state slot ->
//! derived views.
//!
//! ## Ownership and lifetimes
//! Parsed values are owned structs so they outlive the transient response
//! buffer.
//!
//! ## Error model
//! Invalid JSON and invariant violations return [`ContractError`].

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Label substring marking a segment as plagiarized (checked upper-cased).
pub const PLAGIARIZED_LABEL_MARKER: &str = "PLAGIAR";

/// Full detection result returned by `/api/detect`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    /// Server task id; keys the CSV report.
    pub task_id: String,
    /// Original upload name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    /// Server-side status (for example `completed`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Number of analyzed segments.
    pub total_segments: u32,
    /// Segments the server classified as plagiarized.
    pub plagiarized_segments: u32,
    /// Segments the server classified as original.
    pub original_segments: u32,
    /// Server-computed percentage, shown verbatim.
    pub plagiarism_percentage: f64,
    /// Wall-clock processing time in seconds.
    pub processing_time: f64,
    /// Mean raw cosine similarity; may dip below 0 or round past 1.
    pub avg_similarity: f64,
    /// Threshold the server applied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold_used: Option<f64>,
    /// Completion timestamp (ISO 8601).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// Per-segment outcomes in document order.
    #[serde(default)]
    pub details: Vec<SegmentResult>,
}

/// One analyzed document segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentResult {
    /// Unique id within the result.
    pub segment_id: u64,
    /// Analyzed excerpt.
    pub segment_text: String,
    /// Raw cosine similarity to the best reference, nominally in [0, 1] but
    /// kept verbatim when it drifts outside.
    pub similarity_score: f64,
    /// Server classification text.
    #[serde(default)]
    pub label: String,
    /// Word count of the excerpt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_count: Option<u32>,
    /// Nearest reference text, absent when nothing significant matched.
    #[serde(default)]
    pub best_match: Option<String>,
    /// Reference URL.
    #[serde(default)]
    pub source_url: Option<String>,
    /// Reference title.
    #[serde(default)]
    pub source_title: Option<String>,
    /// Reference domain or corpus name, used when no URL exists.
    #[serde(default)]
    pub source_domain: Option<String>,
}

impl SegmentResult {
    /// Classifies the server label for the status chip.
    pub fn label_status(&self) -> LabelStatus {
        classify_label(&self.label)
    }
}

/// Status chip derived from the server label text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LabelStatus {
    /// Label mentions plagiarism.
    Plagiarized,
    /// Any other label.
    Original,
}

impl LabelStatus {
    /// Chip text.
    pub fn as_str(self) -> &'static str {
        match self {
            LabelStatus::Plagiarized => "Plagiat",
            LabelStatus::Original => "Original",
        }
    }
}

/// Maps a label to its chip: case-insensitive `PLAGIAR` substring match.
pub fn classify_label(label: &str) -> LabelStatus {
    if label.to_uppercase().contains(PLAGIARIZED_LABEL_MARKER) {
        LabelStatus::Plagiarized
    } else {
        LabelStatus::Original
    }
}

/// Health payload returned by `/health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Overall status string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Probe timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// Service indicators, displayed verbatim.
    #[serde(default)]
    pub services: BTreeMap<String, Value>,
}

impl HealthStatus {
    /// Service indicator rendered as text, `None` when absent.
    pub fn service(&self, name: &str) -> Option<String> {
        self.services.get(name).map(|value| match value {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        })
    }
}

/// One row of `/api/tasks`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskSummary {
    /// Task id.
    pub task_id: String,
    /// Upload name.
    #[serde(default)]
    pub filename: Option<String>,
    /// Completion timestamp.
    #[serde(default)]
    pub timestamp: Option<String>,
    /// Percentage reported for the task.
    #[serde(default)]
    pub plagiarism_percentage: Option<f64>,
    /// Task status.
    #[serde(default)]
    pub status: Option<String>,
}

/// Body of `/api/tasks`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskList {
    /// Number of stored tasks.
    pub total_tasks: usize,
    /// Stored tasks.
    #[serde(default)]
    pub tasks: Vec<TaskSummary>,
}

/// Body of a successful task deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDeletion {
    /// Confirmation message.
    #[serde(default)]
    pub message: String,
    /// Deleted task id.
    pub task_id: String,
}

/// Parses and validates a detection result.
///
/// # Errors
/// Returns [`ContractError::Decode`] for invalid JSON and
/// [`ContractError::InvalidContract`] when [`validate_detection_result`]
/// rejects the payload.
pub fn parse_detection_result(raw: &[u8]) -> Result<DetectionResult, ContractError> {
    let parsed: DetectionResult = serde_json::from_slice(raw)?;
    validate_detection_result(&parsed)?;
    Ok(parsed)
}

/// Checks result invariants.
///
/// # Errors
/// Returns [`ContractError::InvalidContract`] for a blank task id, a
/// segment-count mismatch, or duplicate segment ids. Scores are not range
/// checked.
pub fn validate_detection_result(result: &DetectionResult) -> Result<(), ContractError> {
    if result.task_id.trim().is_empty() {
        return Err(ContractError::InvalidContract(
            "task_id is empty".to_string(),
        ));
    }

    let counted = u64::from(result.plagiarized_segments) + u64::from(result.original_segments);
    if counted != u64::from(result.total_segments) {
        return Err(ContractError::InvalidContract(format!(
            "plagiarized_segments ({}) + original_segments ({}) != total_segments ({})",
            result.plagiarized_segments, result.original_segments, result.total_segments
        )));
    }

    let mut seen = HashSet::with_capacity(result.details.len());
    for segment in &result.details {
        if !seen.insert(segment.segment_id) {
            return Err(ContractError::InvalidContract(format!(
                "duplicate segment_id {}",
                segment.segment_id
            )));
        }
    }

    Ok(())
}

/// Parses a health payload.
///
/// # Errors
/// Returns [`ContractError::Decode`] for invalid JSON.
pub fn parse_health_status(raw: &[u8]) -> Result<HealthStatus, ContractError> {
    Ok(serde_json::from_slice(raw)?)
}

/// Parses a task listing.
///
/// # Errors
/// Returns [`ContractError::Decode`] for invalid JSON.
pub fn parse_task_list(raw: &[u8]) -> Result<TaskList, ContractError> {
    Ok(serde_json::from_slice(raw)?)
}

/// Parses a task deletion confirmation.
///
/// # Errors
/// Returns [`ContractError::Decode`] for invalid JSON.
pub fn parse_task_deletion(raw: &[u8]) -> Result<TaskDeletion, ContractError> {
    Ok(serde_json::from_slice(raw)?)
}

/// Extracts the structured `detail` message from an error body.
///
/// String details are returned trimmed. Validation-error lists contribute
/// their `msg` entries joined with `; `. Anything else yields `None`.
pub fn extract_error_detail(raw: &[u8]) -> Option<String> {
    let body: Value = serde_json::from_slice(raw).ok()?;
    let detail = match body.get("detail")? {
        Value::String(text) => text.trim().to_string(),
        Value::Array(items) => items
            .iter()
            .filter_map(|item| item.get("msg").and_then(Value::as_str))
            .collect::<Vec<_>>()
            .join("; "),
        _ => return None,
    };

    (!detail.is_empty()).then_some(detail)
}

/// Response contract errors.
#[derive(Debug, Error)]
pub enum ContractError {
    /// JSON decode failure.
    #[error("response decode failure: {0}")]
    Decode(#[from] serde_json::Error),
    /// Parsed payload violates contract invariants.
    #[error("response contract violation: {0}")]
    InvalidContract(String),
}
