//! Reconciliation report

use chrono::{DateTime, Utc};
use dj_core::{ContentType, Diagnostic, ExploreName, ReportMode, Severity, ViewName};
use serde::Serialize;
use uuid::Uuid;

use crate::analyzer::{Analysis, UnusedView};
use crate::filter::ReportFilter;
use crate::record::DependencyRecord;

/// Outcome of one reconciliation run
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub mode: ReportMode,
    pub filter: ReportFilter,
    /// Per-element records, ordered by content type, content id, element id
    pub elements: Vec<DependencyRecord>,
    /// Aggregate tally; empty in per-element mode
    pub unused_views: Vec<UnusedView>,
    pub diagnostics: Vec<Diagnostic>,
    /// Rendering stopped before every query was processed
    pub cancelled: bool,
}

/// One flat row for tabular renderers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub content_type: Option<ContentType>,
    pub content_id: Option<String>,
    pub element_id: Option<String>,
    pub explore: Option<ExploreName>,
    pub view: ViewName,
    /// No-content reason for the element, if any
    pub note: Option<String>,
}

impl Report {
    pub fn new(
        mode: ReportMode,
        filter: ReportFilter,
        analysis: Analysis,
        diagnostics: Vec<Diagnostic>,
        cancelled: bool,
    ) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            mode,
            filter,
            elements: analysis.elements,
            unused_views: analysis.unused_views,
            diagnostics,
            cancelled,
        }
    }

    /// Flatten into one row per unused view.
    ///
    /// Per-element mode yields a row per (element, unused join); aggregate
    /// mode a row per (unused view, declaring explore).
    pub fn rows(&self) -> Vec<ReportRow> {
        match self.mode {
            ReportMode::PerElement => self
                .elements
                .iter()
                .flat_map(|record| {
                    record.unused_joins.iter().map(move |view| ReportRow {
                        content_type: Some(record.key.content_type),
                        content_id: Some(record.key.content_id.clone()),
                        element_id: Some(record.key.element_id.clone()),
                        explore: record.explore.clone(),
                        view: view.clone(),
                        note: record.no_content.clone(),
                    })
                })
                .collect(),
            ReportMode::Aggregate => self
                .unused_views
                .iter()
                .flat_map(|unused| {
                    let explores: Vec<Option<ExploreName>> = if unused.explores.is_empty() {
                        vec![None]
                    } else {
                        unused.explores.iter().cloned().map(Some).collect()
                    };
                    explores.into_iter().map(move |explore| ReportRow {
                        content_type: None,
                        content_id: None,
                        element_id: None,
                        explore,
                        view: unused.view.clone(),
                        note: None,
                    })
                })
                .collect(),
        }
    }

    pub fn no_content_count(&self) -> usize {
        self.elements.iter().filter(|r| r.is_no_content()).count()
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
#[path = "report_test.rs"]
mod tests;
