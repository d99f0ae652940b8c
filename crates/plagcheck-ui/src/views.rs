//! Pure projections from a detection result to display-ready values.
//!
//! Two signals are derived independently and may disagree for a segment:
//! the score band compares `similarity_score` with the chosen threshold,
//! while the status chip reads the server label.

use plagcheck_contract::{DetectionResult, HealthStatus, LabelStatus, SegmentResult};

/// Number of headline figures shown for a result.
pub const SUMMARY_FIELD_COUNT: usize = 4;

const ABOVE_THRESHOLD_COLOR: &str = "#f44336";
const BELOW_THRESHOLD_COLOR: &str = "#4caf50";

/// Score position relative to the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    /// `similarity_score >= threshold`; rendered red.
    AboveThreshold,
    /// `similarity_score < threshold`; rendered green.
    BelowThreshold,
}

impl ScoreBand {
    /// Bands one score.
    pub fn classify(score: f64, threshold: f64) -> Self {
        if score >= threshold {
            ScoreBand::AboveThreshold
        } else {
            ScoreBand::BelowThreshold
        }
    }

    /// Chart fill color.
    pub fn color(self) -> &'static str {
        match self {
            ScoreBand::AboveThreshold => ABOVE_THRESHOLD_COLOR,
            ScoreBand::BelowThreshold => BELOW_THRESHOLD_COLOR,
        }
    }
}

/// Two-category distribution taken from the server counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryDistribution {
    /// Plagiarized segment count.
    pub plagiarized: u32,
    /// Original segment count.
    pub original: u32,
}

impl CategoryDistribution {
    /// Category labels in series order.
    pub const LABELS: [&'static str; 2] = ["Plagiat", "Original"];

    /// Counts in [`CategoryDistribution::LABELS`] order.
    pub fn values(&self) -> [u32; 2] {
        [self.plagiarized, self.original]
    }
}

/// One bar of the per-segment series.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentPoint {
    /// Segment id the bar belongs to.
    pub segment_id: u64,
    /// Axis label, `Seg <id>`.
    pub label: String,
    /// Similarity score.
    pub score: f64,
    /// Threshold band.
    pub band: ScoreBand,
}

/// Chart projections for one result at one threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    /// Plagiarized vs original counts.
    pub distribution: CategoryDistribution,
    /// Per-segment scores in document order.
    pub segments: Vec<SegmentPoint>,
}

/// Derives both chart projections. Changing only `threshold` changes only
/// the bands.
pub fn derive_chart_series(result: &DetectionResult, threshold: f64) -> ChartSeries {
    ChartSeries {
        distribution: CategoryDistribution {
            plagiarized: result.plagiarized_segments,
            original: result.original_segments,
        },
        segments: result
            .details
            .iter()
            .map(|segment| SegmentPoint {
                segment_id: segment.segment_id,
                label: format!("Seg {}", segment.segment_id),
                score: segment.similarity_score,
                band: ScoreBand::classify(segment.similarity_score, threshold),
            })
            .collect(),
    }
}

/// Headline figures for a result.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryFigures {
    /// Total segments.
    pub total_segments: u32,
    /// Plagiarized segments.
    pub plagiarized_segments: u32,
    /// Original segments.
    pub original_segments: u32,
    /// Server percentage, verbatim.
    pub plagiarism_percentage: f64,
    /// Average similarity as a percentage.
    pub avg_similarity_percent: f64,
    /// Processing time in seconds.
    pub processing_time: f64,
}

impl SummaryFigures {
    /// Collects the figures.
    pub fn from_result(result: &DetectionResult) -> Self {
        Self {
            total_segments: result.total_segments,
            plagiarized_segments: result.plagiarized_segments,
            original_segments: result.original_segments,
            plagiarism_percentage: result.plagiarism_percentage,
            avg_similarity_percent: result.avg_similarity * 100.0,
            processing_time: result.processing_time,
        }
    }

    /// The four headline cards as `(caption, value)`.
    pub fn cards(&self) -> [(&'static str, String); SUMMARY_FIELD_COUNT] {
        [
            ("Total segments", self.total_segments.to_string()),
            ("Plagiarized", self.plagiarized_segments.to_string()),
            ("Original", self.original_segments.to_string()),
            ("Plagiarism", format!("{}%", self.plagiarism_percentage)),
        ]
    }

    /// Secondary line with average similarity and processing time.
    pub fn footnote(&self) -> String {
        format!(
            "Average similarity: {:.2}% | Processing time: {}s",
            self.avg_similarity_percent, self.processing_time
        )
    }
}

/// One table row.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentRow {
    /// Row key.
    pub segment_id: u64,
    /// Excerpt, shortened for the table.
    pub excerpt: String,
    /// Score with three decimals.
    pub score_text: String,
    /// Score chip color, from the threshold.
    pub band: ScoreBand,
    /// Status chip, from the server label.
    pub status: LabelStatus,
}

/// Builds table rows, shortening excerpts to `max_excerpt_chars`.
pub fn segment_rows(
    result: &DetectionResult,
    threshold: f64,
    max_excerpt_chars: usize,
) -> Vec<SegmentRow> {
    result
        .details
        .iter()
        .map(|segment| SegmentRow {
            segment_id: segment.segment_id,
            excerpt: shorten(&segment.segment_text, max_excerpt_chars),
            score_text: format!("{:.3}", segment.similarity_score),
            band: ScoreBand::classify(segment.similarity_score, threshold),
            status: segment.label_status(),
        })
        .collect()
}

fn shorten(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

/// Where a matched reference came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceRef {
    /// Web source; `title` falls back to the URL.
    Link {
        /// Source URL.
        url: String,
        /// Link text.
        title: String,
    },
    /// Local corpus or other URL-less source.
    Domain(String),
}

/// Match section of the segment detail.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchView {
    /// A reference matched.
    Match {
        /// Reference text.
        text: String,
        /// Score as a percentage.
        score_percent: f64,
        /// Reference origin, if known.
        source: Option<SourceRef>,
    },
    /// No significant match; likely original.
    NoSignificantMatch,
}

/// Detail view for one segment.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentDetail {
    /// Segment id.
    pub segment_id: u64,
    /// Full segment text.
    pub text: String,
    /// Match section.
    pub matched: MatchView,
}

/// Projects one segment for the detail view.
pub fn segment_detail(segment: &SegmentResult) -> SegmentDetail {
    let matched = match non_blank(segment.best_match.as_deref()) {
        Some(text) => MatchView::Match {
            text: text.to_string(),
            score_percent: segment.similarity_score * 100.0,
            source: source_ref(segment),
        },
        None => MatchView::NoSignificantMatch,
    };

    SegmentDetail {
        segment_id: segment.segment_id,
        text: segment.segment_text.clone(),
        matched,
    }
}

fn source_ref(segment: &SegmentResult) -> Option<SourceRef> {
    if let Some(url) = non_blank(segment.source_url.as_deref()) {
        let title = non_blank(segment.source_title.as_deref()).unwrap_or(url);
        return Some(SourceRef::Link {
            url: url.to_string(),
            title: title.to_string(),
        });
    }
    non_blank(segment.source_domain.as_deref()).map(|domain| SourceRef::Domain(domain.to_string()))
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.trim().is_empty())
}

/// One-line health summary with service indicators shown verbatim.
pub fn health_summary(status: &HealthStatus) -> String {
    let model = status.service("sbert_model").unwrap_or_else(|| "-".to_string());
    let google = status.service("google_cse").unwrap_or_else(|| "-".to_string());
    format!("API OK • Model: {model} • Google: {google}")
}
