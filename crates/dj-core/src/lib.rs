//! dj-core - Core library for Deadjoin
//!
//! This crate provides the typed model feed (explores, joins, views), the
//! explore graph and view → table map built from it, the content and SQL
//! feeds, configuration, and the diagnostics type shared by every stage.

pub mod config;
pub mod content;
pub mod diagnostic;
pub mod error;
pub mod graph;
pub mod model;
pub mod names;
mod newtype_string;
pub(crate) mod serde_helpers;
pub mod sql_feed;
pub mod sql_utils;

pub use config::{Config, ConfigSeverity, Dialect, ExtractorKind, ReportMode, RetryConfig};
pub use content::{
    load_content_feed, parse_content_feed, ContentElement, ContentFeed, ContentType, ElementKey,
};
pub use diagnostic::{apply_severity_overrides, Diagnostic, DiagnosticCode, Severity};
pub use error::{CoreError, CoreResult};
pub use graph::{ExploreGraph, ModelBuild, ModelGraph, Reach, ViewTableMap};
pub use model::{Explore, ExploreDef, Join, JoinDef, ModelFeed, View, ViewDef};
pub use names::{ExploreName, QueryId, ViewName};
pub use sql_feed::{SqlFeed, SqlText};
