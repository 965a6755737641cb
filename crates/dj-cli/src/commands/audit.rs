//! Audit command implementation

use anyhow::{Context, Result};
use dj_analysis::{
    reconcile_with_renderer, CancelHandle, FeedRenderer, ReconcileSettings, Report, ReportFilter,
    RetryPolicy,
};
use dj_core::{load_content_feed, ModelFeed, ReportMode, SqlFeed};
use dj_sql::{extractor_for, TableExtractor};
use log::warn;
use std::sync::Arc;

use crate::cli::{AuditArgs, GlobalArgs, OutputFormat};
use crate::commands::common::{emit, load_config, report_diagnostics, ExitCode};

/// Execute the audit command
pub(crate) async fn execute(args: &AuditArgs, global: &GlobalArgs) -> Result<()> {
    // Reject contradictory filters before reading any feed
    let filter = ReportFilter::from_options(args.table.as_deref(), args.field.as_deref())?;

    let mut config = load_config(global)?;
    if let Some(threads) = args.threads {
        config.threads = threads;
    }
    if let Some(mode) = args.mode {
        config.mode = mode.into();
    }
    config.validate().context("Invalid options")?;

    let content = load_content_feed(&args.content).context("Failed to load content feed")?;
    let sql = SqlFeed::load(&args.sql).context("Failed to load SQL feed")?;
    let model = ModelFeed::load(&args.model).context("Failed to load model feed")?;

    if global.verbose {
        eprintln!(
            "[verbose] {} elements, {} queries with SQL, {} explores; {} extractor, {} threads",
            content.len(),
            sql.len(),
            model.explores.len(),
            config.extractor,
            config.threads
        );
    }

    let extractor: Arc<dyn TableExtractor> = Arc::from(extractor_for(&config));
    let settings = ReconcileSettings {
        filter,
        mode: config.mode,
        threads: config.threads,
        retry: RetryPolicy::from(&config.retry),
    };
    let cancel = CancelHandle::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted; finishing in-flight renders");
            on_interrupt.cancel();
        }
    });

    let mut report = reconcile_with_renderer(
        &content.elements,
        Arc::new(FeedRenderer::new(sql)),
        &model,
        extractor,
        &settings,
        &cancel,
    )
    .await
    .context("Reconciliation failed")?;

    // Skipped content records lead the run's diagnostics
    let mut diagnostics = content.diagnostics;
    diagnostics.append(&mut report.diagnostics);
    report.diagnostics = report_diagnostics(diagnostics, &config);

    let text = match args.output {
        OutputFormat::Json => report.to_json()?,
        OutputFormat::Table => render_table(&report),
    };
    emit(&text, args.out.as_deref())?;

    if report.has_errors() {
        return Err(ExitCode(1).into());
    }
    Ok(())
}

/// Render the report as aligned text
fn render_table(report: &Report) -> String {
    let mut out = String::new();
    let element_width = report
        .elements
        .iter()
        .map(|r| r.key.to_string().len())
        .max()
        .unwrap_or(7)
        .max(7);
    let explore_width = report
        .elements
        .iter()
        .map(|r| r.explore.as_ref().map(|e| e.len()).unwrap_or(1))
        .max()
        .unwrap_or(7)
        .max(7);

    out.push_str(&format!(
        "{:<element_width$}  {:<explore_width$}  {:<10}  UNUSED\n",
        "ELEMENT",
        "EXPLORE",
        "STATUS",
        element_width = element_width,
        explore_width = explore_width
    ));
    out.push_str(&format!(
        "{:-<element_width$}  {:-<explore_width$}  {:-<10}  {}\n",
        "",
        "",
        "",
        "-".repeat(40),
        element_width = element_width,
        explore_width = explore_width
    ));

    for record in &report.elements {
        let status = if record.is_clean() {
            "clean"
        } else if record.is_no_content() {
            "no_content"
        } else if record.unknown_explore {
            "unknown"
        } else {
            "unused"
        };
        let unused: Vec<&str> = record.unused_joins.iter().map(|v| v.as_str()).collect();
        out.push_str(&format!(
            "{:<element_width$}  {:<explore_width$}  {:<10}  {}\n",
            record.key.to_string(),
            record.explore.as_deref().unwrap_or("-"),
            status,
            if unused.is_empty() {
                "-".to_string()
            } else {
                unused.join(", ")
            },
            element_width = element_width,
            explore_width = explore_width
        ));
    }

    if report.mode == ReportMode::Aggregate {
        out.push('\n');
        if report.unused_views.is_empty() {
            out.push_str("Every declared view is used by some analyzed content.\n");
        } else {
            out.push_str("Views unused by all analyzed content:\n");
            for unused in &report.unused_views {
                let explores: Vec<&str> = unused.explores.iter().map(|e| e.as_str()).collect();
                out.push_str(&format!(
                    "  {} ({} elements; explores: {})\n",
                    unused.view,
                    unused.unused_in,
                    explores.join(", ")
                ));
            }
        }
    }

    out.push_str(&format!(
        "\n{} elements, {} without SQL, {} diagnostics{}\n",
        report.elements.len(),
        report.no_content_count(),
        report.diagnostics.len(),
        if report.cancelled { " (cancelled)" } else { "" }
    ));
    out
}

#[cfg(test)]
#[path = "audit_test.rs"]
mod tests;
