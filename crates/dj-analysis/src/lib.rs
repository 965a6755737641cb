//! dj-analysis: dependency reconciliation for BI content
//!
//! This crate resolves each content element's SQL against the explore graph
//! and view → table map from dj-core, then reports which declared joins the
//! deployed content never uses, per element or across the whole run.

pub mod analyzer;
pub(crate) mod error;
pub mod filter;
pub mod reconcile;
pub mod record;
pub mod render;
pub mod report;
pub mod resolver;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;

pub use analyzer::{aggregate_unused, Analysis, UnusedJoinAnalyzer, UnusedView};
pub use error::{AnalysisError, AnalysisResult};
pub use filter::ReportFilter;
pub use reconcile::{
    reconcile, reconcile_with_renderer, CancelHandle, ReconcileSettings, CANCELLED_REASON,
};
pub use record::DependencyRecord;
pub use render::{
    render_with_retry, FeedRenderer, RenderError, RenderOutcome, RetryPolicy, SqlRenderer,
};
pub use report::{Report, ReportRow};
pub use resolver::{ContentDependencyResolver, Resolution};
