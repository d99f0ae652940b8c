//! Integration tests for segment detail and health projections.

mod common;

use plagcheck_contract::HealthStatus;
use plagcheck_ui::{MatchView, SourceRef, health_summary, segment_detail};

#[test]
fn segment_detail_tests_without_best_match_reports_no_significant_match() {
    let detail = segment_detail(&common::segment(3, 0.2, "Original"));
    assert_eq!(detail.matched, MatchView::NoSignificantMatch);
}

#[test]
fn segment_detail_tests_source_fallbacks() {
    let mut segment = common::segment(4, 0.9, "PLAGIARIZED");
    segment.best_match = Some("matched reference".to_string());
    segment.source_url = Some("https://journal.test/a".to_string());

    match segment_detail(&segment).matched {
        MatchView::Match { source, score_percent, .. } => {
            assert_eq!(score_percent, 90.0);
            assert_eq!(
                source,
                Some(SourceRef::Link {
                    url: "https://journal.test/a".to_string(),
                    title: "https://journal.test/a".to_string(),
                })
            );
        }
        MatchView::NoSignificantMatch => panic!("best match is present"),
    }

    segment.source_url = None;
    segment.source_domain = Some("Local Corpus".to_string());
    match segment_detail(&segment).matched {
        MatchView::Match { source, .. } => {
            assert_eq!(source, Some(SourceRef::Domain("Local Corpus".to_string())));
        }
        MatchView::NoSignificantMatch => panic!("best match is present"),
    }
}

#[test]
fn segment_detail_tests_health_summary_is_verbatim() {
    let status: HealthStatus = serde_json::from_str(
        r#"{"services":{"api":"running","sbert_model":"loaded","google_cse":"not configured"}}"#,
    )
    .expect("health fixture should parse");
    assert_eq!(
        health_summary(&status),
        "API OK • Model: loaded • Google: not configured"
    );
}
