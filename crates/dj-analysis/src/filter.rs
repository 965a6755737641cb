//! Report filters

use serde::Serialize;

use crate::error::{AnalysisError, AnalysisResult};
use crate::record::DependencyRecord;

/// Restricts which records a report covers
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ReportFilter {
    #[default]
    None,
    /// Records whose SQL used the named view
    Table(String),
    /// Records with a field containing the substring
    Field(String),
}

impl ReportFilter {
    /// Build a filter from optional table and field arguments.
    ///
    /// The two are mutually exclusive.
    pub fn from_options(table: Option<&str>, field: Option<&str>) -> AnalysisResult<Self> {
        match (table, field) {
            (Some(table), Some(field)) => Err(AnalysisError::Configuration {
                message: format!(
                    "table filter '{}' and field filter '{}' cannot be combined",
                    table, field
                ),
            }),
            (Some(table), None) => non_blank("table", table).map(ReportFilter::Table),
            (None, Some(field)) => non_blank("field", field).map(ReportFilter::Field),
            (None, None) => Ok(ReportFilter::None),
        }
    }

    pub fn matches(&self, record: &DependencyRecord) -> bool {
        match self {
            ReportFilter::None => true,
            ReportFilter::Table(view) => record.used_view_names.contains(view.as_str()),
            ReportFilter::Field(needle) => record.fields.iter().any(|f| f.contains(needle.as_str())),
        }
    }
}

impl std::fmt::Display for ReportFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportFilter::None => write!(f, "none"),
            ReportFilter::Table(view) => write!(f, "table={}", view),
            ReportFilter::Field(needle) => write!(f, "field~{}", needle),
        }
    }
}

fn non_blank(kind: &str, value: &str) -> AnalysisResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AnalysisError::Configuration {
            message: format!("{} filter must not be empty", kind),
        });
    }
    Ok(value.to_string())
}

#[cfg(test)]
#[path = "filter_test.rs"]
mod tests;
