//! Plain-text rendering of results, health and task listings.

use std::fmt;

use plagcheck_contract::{DetectionResult, HealthStatus, TaskList};
use plagcheck_ui::{
    CategoryDistribution, MatchView, ScoreBand, SourceRef, SummaryFigures, derive_chart_series,
    health_summary, segment_detail, segment_rows,
};

const EXCERPT_CHARS: usize = 60;

fn band_name(band: ScoreBand) -> &'static str {
    match band {
        ScoreBand::AboveThreshold => "above",
        ScoreBand::BelowThreshold => "below",
    }
}

struct ResultReport<'a> {
    result: &'a DetectionResult,
    threshold: f64,
}

impl fmt::Display for ResultReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (result, threshold) = (self.result, self.threshold);
        let summary = SummaryFigures::from_result(result);

        write!(f, "Task {}", result.task_id)?;
        if let Some(filename) = &result.filename {
            write!(f, " ({filename})")?;
        }
        writeln!(f)?;

        let cards: Vec<String> = summary
            .cards()
            .iter()
            .map(|(caption, value)| format!("{caption}: {value}"))
            .collect();
        writeln!(f, "{}", cards.join(" | "))?;
        writeln!(f, "{}", summary.footnote())?;

        let series = derive_chart_series(result, threshold);
        let distribution = CategoryDistribution::LABELS
            .iter()
            .zip(series.distribution.values())
            .map(|(label, count)| format!("{label}={count}"))
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(f, "Distribution: {distribution}")?;
        writeln!(f, "Threshold: {threshold:.2}")?;

        writeln!(f)?;
        writeln!(
            f,
            "{:<6} {:<7} {:<6} {:<12} Excerpt",
            "ID", "Score", "Band", "Status"
        )?;
        for row in segment_rows(result, threshold, EXCERPT_CHARS) {
            writeln!(
                f,
                "{:<6} {:<7} {:<6} {:<12} {}",
                row.segment_id,
                row.score_text,
                band_name(row.band),
                row.status.as_str(),
                row.excerpt
            )?;
        }
        Ok(())
    }
}

struct SegmentDetails<'a>(&'a DetectionResult);

impl fmt::Display for SegmentDetails<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.0.details {
            let detail = segment_detail(segment);
            writeln!(f, "Segment {}", detail.segment_id)?;
            writeln!(f, "  Text: {}", detail.text)?;
            match detail.matched {
                MatchView::Match {
                    text,
                    score_percent,
                    source,
                } => {
                    writeln!(f, "  Match ({score_percent:.1}%): {text}")?;
                    match source {
                        Some(SourceRef::Link { url, title }) => {
                            writeln!(f, "  Source: {title} <{url}>")?
                        }
                        Some(SourceRef::Domain(domain)) => writeln!(f, "  Source: {domain}")?,
                        None => {}
                    }
                }
                MatchView::NoSignificantMatch => {
                    writeln!(f, "  No significant match found; likely original.")?
                }
            }
        }
        Ok(())
    }
}

struct TaskListing<'a>(&'a TaskList);

impl fmt::Display for TaskListing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tasks = self.0;
        writeln!(f, "{} stored task(s)", tasks.total_tasks)?;
        for task in &tasks.tasks {
            let percentage = task
                .plagiarism_percentage
                .map_or_else(|| "-".to_string(), |value| format!("{value}%"));
            writeln!(
                f,
                "{}  {}  {}  {}  {}",
                task.task_id,
                task.filename.as_deref().unwrap_or("-"),
                task.status.as_deref().unwrap_or("-"),
                percentage,
                task.timestamp.as_deref().unwrap_or("-"),
            )?;
        }
        Ok(())
    }
}

/// Summary cards, distribution and the per-segment table.
pub fn render_result(result: &DetectionResult, threshold: f64) -> String {
    ResultReport { result, threshold }.to_string()
}

/// Match detail for every segment.
pub fn render_segment_details(result: &DetectionResult) -> String {
    SegmentDetails(result).to_string()
}

/// One-line health summary.
pub fn render_health(status: &HealthStatus) -> String {
    health_summary(status)
}

/// Task listing, newest entries as returned by the server.
pub fn render_tasks(tasks: &TaskList) -> String {
    TaskListing(tasks).to_string()
}
