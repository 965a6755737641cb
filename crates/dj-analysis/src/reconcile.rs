//! End-to-end reconciliation: model build, resolution, analysis
//!
//! [`reconcile`] works from a pre-fetched SQL feed. [`reconcile_with_renderer`]
//! obtains SQL from a [`SqlRenderer`] through a bounded worker pool, rendering
//! each distinct query once and resolving its elements in the same task.

use dj_core::{
    ContentElement, Diagnostic, DiagnosticCode, ModelFeed, ModelGraph, QueryId, ReportMode,
    SqlFeed, SqlText,
};
use dj_sql::TableExtractor;
use log::{debug, warn};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;

use crate::analyzer::UnusedJoinAnalyzer;
use crate::error::AnalysisResult;
use crate::filter::ReportFilter;
use crate::render::{render_with_retry, RetryPolicy, SqlRenderer};
use crate::report::Report;
use crate::resolver::{ContentDependencyResolver, Resolution};

/// No-content reason for queries skipped after cancellation
pub const CANCELLED_REASON: &str = "cancelled";

/// Shared stop flag for a render run
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    stopped: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop starting new renders; in-flight renders finish
    pub fn cancel(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

/// Options for a rendered reconciliation run
#[derive(Debug, Clone)]
pub struct ReconcileSettings {
    pub filter: ReportFilter,
    pub mode: ReportMode,
    /// Render worker pool width
    pub threads: usize,
    pub retry: RetryPolicy,
}

impl Default for ReconcileSettings {
    fn default() -> Self {
        Self {
            filter: ReportFilter::None,
            mode: ReportMode::default(),
            threads: 4,
            retry: RetryPolicy::default(),
        }
    }
}

/// Reconcile content against the model using a pre-fetched SQL feed.
///
/// Fails only when the model has no usable explore.
pub fn reconcile(
    content: &[ContentElement],
    sql: &SqlFeed,
    model: &ModelFeed,
    filter: ReportFilter,
    mode: ReportMode,
    extractor: &dyn TableExtractor,
) -> AnalysisResult<Report> {
    let build = ModelGraph::build(model)?;
    let explores = build.graph.explore_graph();
    let resolver = ContentDependencyResolver::new(&explores, build.graph.view_tables(), extractor);
    let resolution = resolver.resolve(content, sql);

    let mut diagnostics = build.diagnostics;
    diagnostics.extend(resolution.diagnostics);

    let analysis = UnusedJoinAnalyzer::new(filter.clone(), mode).analyze(resolution.records);
    Ok(Report::new(mode, filter, analysis, diagnostics, false))
}

/// Reconcile content against the model, rendering SQL on demand.
///
/// Elements sharing a query id share one render. After `cancel` fires,
/// queries not yet started resolve as no-content with reason `cancelled`.
pub async fn reconcile_with_renderer(
    content: &[ContentElement],
    renderer: Arc<dyn SqlRenderer>,
    model: &ModelFeed,
    extractor: Arc<dyn TableExtractor>,
    settings: &ReconcileSettings,
    cancel: &CancelHandle,
) -> AnalysisResult<Report> {
    let build = ModelGraph::build(model)?;
    let explores = Arc::new(build.graph.explore_graph());
    let view_tables = Arc::new(build.graph.view_tables().clone());
    let mut diagnostics = build.diagnostics;

    // Group elements by query; elements without one resolve immediately
    let local = ContentDependencyResolver::new(&explores, &view_tables, extractor.as_ref());
    let mut by_query: BTreeMap<QueryId, Vec<ContentElement>> = BTreeMap::new();
    let mut resolution = Resolution::default();
    for element in content {
        match &element.query_id {
            Some(id) => by_query
                .entry(id.clone())
                .or_default()
                .push(element.clone()),
            None => resolution.extend(local.resolve_element(element, None)),
        }
    }

    debug!(
        "rendering {} distinct queries for {} elements with {} workers",
        by_query.len(),
        content.len(),
        settings.threads
    );

    let semaphore = Arc::new(Semaphore::new(settings.threads.max(1)));
    let mut handles = Vec::with_capacity(by_query.len());

    for (query_id, elements) in by_query {
        let semaphore = Arc::clone(&semaphore);
        let renderer = Arc::clone(&renderer);
        let extractor = Arc::clone(&extractor);
        let explores = Arc::clone(&explores);
        let view_tables = Arc::clone(&view_tables);
        let cancel = cancel.clone();
        let retry = settings.retry;
        // Kept for the fallback path if the task panics
        let task_elements = elements.clone();

        let handle = tokio::spawn(async move {
            let mut task_diagnostics = Vec::new();
            let sql = match semaphore.acquire().await {
                Ok(_permit) if !cancel.is_cancelled() => {
                    let outcome = render_with_retry(renderer.as_ref(), &query_id, &retry).await;
                    if outcome.attempts > 1 && outcome.sql.as_sql().is_some() {
                        task_diagnostics.push(
                            Diagnostic::new(
                                DiagnosticCode::DJ021,
                                format!(
                                    "query {} rendered after {} attempts",
                                    query_id, outcome.attempts
                                ),
                            )
                            .with_subject(query_id.to_string()),
                        );
                    }
                    outcome.sql
                }
                // Cancelled, or the semaphore was closed
                _ => SqlText::unavailable(CANCELLED_REASON),
            };

            let resolver =
                ContentDependencyResolver::new(&explores, &view_tables, extractor.as_ref());
            let mut resolution = Resolution {
                records: Vec::new(),
                diagnostics: task_diagnostics,
            };
            for element in &task_elements {
                resolution.extend(resolver.resolve_element(element, Some(&sql)));
            }
            resolution
        });

        handles.push((elements, handle));
    }

    for (elements, handle) in handles {
        match handle.await {
            Ok(task_resolution) => resolution.extend(task_resolution),
            Err(e) => {
                warn!("render task failed: {}", e);
                let failed = SqlText::unavailable(format!("render task failed: {}", e));
                for element in &elements {
                    resolution.extend(local.resolve_element(element, Some(&failed)));
                }
            }
        }
    }

    let cancelled = cancel.is_cancelled();
    diagnostics.extend(resolution.diagnostics);
    if cancelled {
        let skipped = resolution
            .records
            .iter()
            .filter(|r| r.no_content.as_deref() == Some(CANCELLED_REASON))
            .count();
        diagnostics.push(
            Diagnostic::new(
                DiagnosticCode::DJ030,
                format!("run cancelled; {} elements were not rendered", skipped),
            )
            .with_hint("rerun to cover the skipped elements"),
        );
    }

    let analysis =
        UnusedJoinAnalyzer::new(settings.filter.clone(), settings.mode).analyze(resolution.records);
    Ok(Report::new(
        settings.mode,
        settings.filter.clone(),
        analysis,
        diagnostics,
        cancelled,
    ))
}

#[cfg(test)]
#[path = "reconcile_test.rs"]
mod tests;
