//! Content dependency resolution
//!
//! Joins three inputs per content element: the explore's reachable view set,
//! the references extracted from the element's SQL, and the view → table map
//! that ties schema-qualified references back to view names.

use dj_core::sql_utils::is_qualified;
use dj_core::{
    ContentElement, Diagnostic, DiagnosticCode, ExploreGraph, SqlFeed, SqlText, ViewName,
    ViewTableMap,
};
use dj_sql::TableExtractor;
use std::collections::BTreeSet;

use crate::record::DependencyRecord;

/// Records plus the diagnostics raised while building them
#[derive(Debug, Default)]
pub struct Resolution {
    pub records: Vec<DependencyRecord>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Resolution {
    pub fn extend(&mut self, other: Resolution) {
        self.records.extend(other.records);
        self.diagnostics.extend(other.diagnostics);
    }
}

/// Resolves content elements against the model and their SQL
pub struct ContentDependencyResolver<'a> {
    explores: &'a ExploreGraph,
    view_tables: &'a ViewTableMap,
    extractor: &'a dyn TableExtractor,
}

impl<'a> ContentDependencyResolver<'a> {
    pub fn new(
        explores: &'a ExploreGraph,
        view_tables: &'a ViewTableMap,
        extractor: &'a dyn TableExtractor,
    ) -> Self {
        Self {
            explores,
            view_tables,
            extractor,
        }
    }

    /// Resolve every element, looking its SQL up in the feed
    pub fn resolve(&self, elements: &[ContentElement], sql: &SqlFeed) -> Resolution {
        let mut resolution = Resolution::default();
        for element in elements {
            let text = element.query_id.as_ref().and_then(|id| sql.get(id));
            resolution.extend(self.resolve_element(element, text));
        }
        resolution
    }

    /// Build the record for one element.
    ///
    /// `sql` is `None` when no SQL entry exists for the element's query.
    pub fn resolve_element(&self, element: &ContentElement, sql: Option<&SqlText>) -> Resolution {
        let mut diagnostics = Vec::new();
        let subject = element.key.to_string();

        let (potential_join, unknown_explore) = match &element.explore {
            Some(explore) => match self.explores.reachable(explore) {
                Some(views) => (views.clone(), false),
                None => {
                    diagnostics.push(
                        Diagnostic::new(
                            DiagnosticCode::DJ010,
                            format!("explore '{}' is not defined in the model", explore),
                        )
                        .with_subject(subject.clone())
                        .with_hint("the content may target a different model or a removed explore"),
                    );
                    (BTreeSet::new(), true)
                }
            },
            None => {
                diagnostics.push(
                    Diagnostic::new(DiagnosticCode::DJ010, "element names no explore")
                        .with_subject(subject.clone()),
                );
                (BTreeSet::new(), true)
            }
        };

        let sql_text = match (&element.query_id, sql) {
            (None, _) => Err("element has no query id".to_string()),
            (Some(_), None) => Err("no SQL entry for query".to_string()),
            (Some(_), Some(SqlText::Unavailable { reason })) => Err(reason.clone()),
            (Some(_), Some(SqlText::Available(text))) => Ok(text.as_str()),
        };

        let mut sql_joins = BTreeSet::new();
        let mut used_joins = BTreeSet::new();
        let mut used_view_names = BTreeSet::new();
        let no_content = match sql_text {
            Ok(text) => {
                sql_joins = self.extractor.extract(text);
                for reference in &sql_joins {
                    if is_qualified(reference) {
                        let views: Vec<&ViewName> =
                            self.view_tables.views_for_table(reference).collect();
                        if !views.is_empty() {
                            used_joins.insert(reference.clone());
                            used_view_names.extend(views.into_iter().cloned());
                        }
                    } else if let Some(view) = ViewName::try_new(reference.as_str()) {
                        used_joins.insert(reference.clone());
                        used_view_names.insert(view);
                    }
                }
                None
            }
            Err(reason) => {
                let query = element
                    .query_id
                    .as_ref()
                    .map(|id| id.to_string())
                    .unwrap_or_else(|| "-".to_string());
                diagnostics.push(
                    Diagnostic::new(
                        DiagnosticCode::DJ020,
                        format!("SQL for query {} unavailable: {}", query, reason),
                    )
                    .with_subject(subject),
                );
                Some(reason)
            }
        };

        let unused_joins = potential_join
            .difference(&used_view_names)
            .cloned()
            .collect();

        Resolution {
            records: vec![DependencyRecord {
                key: element.key.clone(),
                explore: element.explore.clone(),
                query_id: element.query_id.clone(),
                fields: element.fields.clone(),
                title: element.title.clone(),
                potential_join,
                sql_joins,
                used_joins,
                used_view_names,
                unused_joins,
                no_content,
                unknown_explore,
            }],
            diagnostics,
        }
    }
}

#[cfg(test)]
#[path = "resolver_test.rs"]
mod tests;
