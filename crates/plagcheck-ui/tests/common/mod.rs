//! Shared fixtures for UI state tests.

#![allow(dead_code)]

use plagcheck_contract::{DetectionResult, SegmentResult, parse_detection_result};
use plagcheck_core::{FileCandidate, PDF_MIME};
use serde_json::json;

/// Result with ten segments; segments 2, 5 and 9 are labelled plagiarized.
pub fn thesis_result() -> DetectionResult {
    let scores = [0.42, 0.91, 0.33, 0.80, 0.88, 0.12, 0.74, 0.51, 0.97, 0.60];
    let details: Vec<serde_json::Value> = scores
        .iter()
        .enumerate()
        .map(|(index, score)| {
            let id = index as u64 + 1;
            let label = if matches!(id, 2 | 5 | 9) { "PLAGIARIZED" } else { "Original" };
            json!({
                "segment_id": id,
                "segment_text": format!("segment text {id}"),
                "similarity_score": score,
                "label": label,
                "best_match": null,
                "source_url": null,
                "source_title": null
            })
        })
        .collect();

    let raw = json!({
        "task_id": "task-thesis",
        "total_segments": 10,
        "plagiarized_segments": 3,
        "original_segments": 7,
        "plagiarism_percentage": 30.0,
        "avg_similarity": 0.628,
        "processing_time": 12.4,
        "details": details
    });
    parse_detection_result(raw.to_string().as_bytes()).expect("fixture result should parse")
}

/// A segment carrying the given scoring inputs.
pub fn segment(id: u64, score: f64, label: &str) -> SegmentResult {
    SegmentResult {
        segment_id: id,
        segment_text: format!("segment {id}"),
        similarity_score: score,
        label: label.to_string(),
        word_count: Some(25),
        best_match: None,
        source_url: None,
        source_title: None,
        source_domain: None,
    }
}

/// 2.3 MB PDF candidate plus matching bytes.
pub fn thesis_pdf() -> (FileCandidate, Vec<u8>) {
    let size = 2_300_000_usize;
    (
        FileCandidate::new("thesis.pdf", PDF_MIME, size as u64),
        vec![0_u8; size],
    )
}
