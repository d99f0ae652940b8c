//! Benchmark smoke test for deriving views from a large result.

use std::time::Instant;

use plagcheck_contract::{DetectionResult, SegmentResult};
use plagcheck_ui::{derive_chart_series, segment_detail, segment_rows};

const SEGMENTS: u64 = 2_000;

fn large_result() -> DetectionResult {
    let details: Vec<SegmentResult> = (1..=SEGMENTS)
        .map(|id| SegmentResult {
            segment_id: id,
            segment_text: "kalimat contoh untuk segmen dokumen ".repeat(8),
            similarity_score: (id % 100) as f64 / 100.0,
            label: if id % 3 == 0 { "PLAGIARIZED" } else { "Original" }.to_string(),
            word_count: Some(40),
            best_match: (id % 2 == 0).then(|| "referensi yang cocok".to_string()),
            source_url: None,
            source_title: None,
            source_domain: Some("Local Corpus".to_string()),
        })
        .collect();
    let plagiarized = details
        .iter()
        .filter(|segment| segment.label == "PLAGIARIZED")
        .count() as u32;

    DetectionResult {
        task_id: "bench-task".to_string(),
        filename: None,
        status: None,
        total_segments: SEGMENTS as u32,
        plagiarized_segments: plagiarized,
        original_segments: SEGMENTS as u32 - plagiarized,
        plagiarism_percentage: f64::from(plagiarized) * 100.0 / SEGMENTS as f64,
        processing_time: 0.0,
        avg_similarity: 0.495,
        threshold_used: None,
        timestamp: None,
        details,
    }
}

#[test]
fn benchmark_view_derivation_smoke_prints_latency() {
    let result = large_result();
    let start = Instant::now();
    let mut above = 0usize;

    for step in 0..=10_u32 {
        let threshold = 0.5 + f64::from(step) * 0.05;
        let series = derive_chart_series(&result, threshold);
        above += series
            .segments
            .iter()
            .filter(|point| point.score >= threshold)
            .count();
        let rows = segment_rows(&result, threshold, 80);
        assert_eq!(rows.len(), result.details.len());
    }
    let detail_count = result.details.iter().map(segment_detail).count();

    let elapsed_ms = start.elapsed().as_millis();
    println!("benchmark_view_elapsed_ms={elapsed_ms}");
    println!("benchmark_above_threshold_total={above}");
    assert_eq!(detail_count, SEGMENTS as usize);

    // Lightweight guardrail; strict latency targets depend on the machine.
    assert!(elapsed_ms < 5_000, "view derivation should stay bounded");
}
