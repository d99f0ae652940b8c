#![warn(missing_docs)]
//! # plagcheck-ui
//!
//! ## Purpose
//! Holds the client-side interaction state for `plagcheck` and derives
//! display-ready views from it.
//!
//! ## Responsibilities
//! - Keep one named slot per concern (selection, detection, health,
//!   download, configuration) and change them only through transitions.
//! - Word failures per slot so detection, health and download errors never
//!   overwrite one another.
//! - Derive chart series, summary figures, table rows and segment detail.
//!
//! ## Data flow
//! Orchestrator calls a `begin_*` transition -> awaits the backend -> hands
//! the outcome to the matching `finish_*` transition -> renders views from
//! [`ClientState`].
//!
//! ## Ownership and lifetimes
//! `ClientState` owns every value it shows, so backend futures never borrow
//! from it while in flight.
//!
//! ## Error model
//! Pre-flight validation returns `plagcheck_core::CoreError`; backend
//! failures are stored as text in their slot and never propagate.

mod state;
mod views;

pub use state::{ClientState, DetectionPhase, DownloadPhase, HealthPhase, RunTicket};
pub use views::{
    CategoryDistribution, ChartSeries, MatchView, SUMMARY_FIELD_COUNT, ScoreBand, SegmentDetail,
    SegmentPoint, SegmentRow, SourceRef, SummaryFigures, derive_chart_series, health_summary,
    segment_detail, segment_rows,
};
