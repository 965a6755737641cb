//! Semantic-model feed: explores, joins and views
//!
//! The feed is produced by whatever parses the model project's source files.
//! Every field is optional at the serde level so that one malformed entry
//! does not fail the whole document; [`ModelFeed::validate`] turns raw entries
//! into [`Explore`] and [`View`] values and reports what it had to skip.

use crate::diagnostic::{Diagnostic, DiagnosticCode};
use crate::error::{read_feed, CoreError, CoreResult};
use crate::names::{ExploreName, ViewName};
use crate::sql_utils::normalize_table_reference;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Raw model feed as decoded from YAML or JSON
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelFeed {
    /// Explore definitions from the model file
    #[serde(default)]
    pub explores: Vec<ExploreDef>,

    /// View definitions from the project's view files
    #[serde(default)]
    pub views: Vec<ViewDef>,
}

/// Raw explore definition
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExploreDef {
    pub name: Option<String>,

    /// Explicit source view for the explore
    #[serde(default)]
    pub view_name: Option<String>,

    /// Table alias override for the explore's base view
    #[serde(default)]
    pub from: Option<String>,

    /// Joined views, in declaration order
    #[serde(default, alias = "join")]
    pub joins: Vec<JoinDef>,
}

/// Raw join definition inside an explore
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JoinDef {
    pub name: Option<String>,

    #[serde(default)]
    pub view_name: Option<String>,

    #[serde(default)]
    pub from: Option<String>,
}

/// Raw view definition
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ViewDef {
    pub name: Option<String>,

    /// Physical table the view reads from, as written in the model
    #[serde(default)]
    pub sql_table_name: Option<String>,

    /// Whether the view is backed by a derived table
    #[serde(default)]
    pub derived_table: bool,
}

/// A validated explore
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Explore {
    pub name: ExploreName,

    /// Base view names. The first is the primary base view; a second entry
    /// appears only when both `view_name` and `from` were declared.
    pub base_views: Vec<ViewName>,

    /// Joined views in declaration order
    pub joins: Vec<Join>,
}

impl Explore {
    /// The primary base view
    pub fn base_view(&self) -> &ViewName {
        &self.base_views[0]
    }
}

/// A validated join
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Join {
    /// Join name, which is also the alias used in generated SQL
    pub name: ViewName,

    /// Underlying view names from `view_name` / `from` overrides
    pub overrides: Vec<ViewName>,
}

/// A validated view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub name: ViewName,

    /// Normalized physical table, `None` for logical-only views
    pub sql_table_name: Option<String>,
}

/// Result of validating a [`ModelFeed`]
#[derive(Debug, Clone, Default)]
pub struct ValidatedModel {
    pub explores: Vec<Explore>,
    pub views: Vec<View>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ModelFeed {
    /// Load a model feed from a `.json`, `.yml` or `.yaml` file
    pub fn load(path: &Path) -> CoreResult<Self> {
        let content = read_feed("model", path)?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));

        let parsed = if is_json {
            serde_json::from_str(&content).map_err(|e| e.to_string())
        } else {
            serde_yaml::from_str(&content).map_err(|e| e.to_string())
        };

        parsed.map_err(|message| CoreError::FeedParseError {
            feed: "model",
            path: path.display().to_string(),
            message,
        })
    }

    /// Parse a model feed from a YAML string
    pub fn from_yaml_str(yaml: &str) -> CoreResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Validate raw entries, skipping malformed or duplicate ones.
    ///
    /// Never fails: every skipped entry produces a diagnostic instead.
    pub fn validate(&self) -> ValidatedModel {
        let mut out = ValidatedModel::default();

        let mut seen_explores = HashSet::new();
        for (idx, def) in self.explores.iter().enumerate() {
            let Some(explore) = validate_explore(idx, def, &mut out.diagnostics) else {
                continue;
            };
            if !seen_explores.insert(explore.name.clone()) {
                out.diagnostics.push(
                    Diagnostic::new(
                        DiagnosticCode::DJ002,
                        format!(
                            "Duplicate explore '{}'; keeping the first definition",
                            explore.name
                        ),
                    )
                    .with_subject(explore.name.as_str()),
                );
                continue;
            }
            out.explores.push(explore);
        }

        let mut seen_views = HashSet::new();
        for (idx, def) in self.views.iter().enumerate() {
            let Some(name) = def.name.clone().and_then(ViewName::try_new) else {
                out.diagnostics.push(
                    Diagnostic::new(
                        DiagnosticCode::DJ001,
                        format!("View #{} has no name; skipped", idx + 1),
                    )
                    .with_hint("Every view definition needs a non-empty `name`"),
                );
                continue;
            };
            if !seen_views.insert(name.clone()) {
                out.diagnostics.push(
                    Diagnostic::new(
                        DiagnosticCode::DJ002,
                        format!("Duplicate view '{}'; keeping the first definition", name),
                    )
                    .with_subject(name.as_str()),
                );
                continue;
            }
            let sql_table_name = def
                .sql_table_name
                .as_deref()
                .map(normalize_table_reference)
                .filter(|t| !t.is_empty());
            out.views.push(View {
                name,
                sql_table_name,
            });
        }

        out
    }
}

fn validate_explore(
    idx: usize,
    def: &ExploreDef,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<Explore> {
    let Some(name) = def.name.clone().and_then(ExploreName::try_new) else {
        diagnostics.push(
            Diagnostic::new(
                DiagnosticCode::DJ001,
                format!("Explore #{} has no name; skipped", idx + 1),
            )
            .with_hint("Every explore definition needs a non-empty `name`"),
        );
        return None;
    };

    let mut base_views = overrides_of(def.view_name.as_deref(), def.from.as_deref());
    if base_views.is_empty() {
        base_views.push(ViewName::new(name.as_str()));
    }

    let mut joins = Vec::with_capacity(def.joins.len());
    for (join_idx, join) in def.joins.iter().enumerate() {
        let Some(join_name) = join.name.clone().and_then(ViewName::try_new) else {
            diagnostics.push(
                Diagnostic::new(
                    DiagnosticCode::DJ001,
                    format!(
                        "Join #{} in explore '{}' has no name; join skipped",
                        join_idx + 1,
                        name
                    ),
                )
                .with_subject(name.as_str()),
            );
            continue;
        };
        joins.push(Join {
            name: join_name,
            overrides: overrides_of(join.view_name.as_deref(), join.from.as_deref()),
        });
    }

    Some(Explore {
        name,
        base_views,
        joins,
    })
}

/// Collect `view_name` / `from` overrides, skipping blanks and repeats
fn overrides_of(view_name: Option<&str>, from: Option<&str>) -> Vec<ViewName> {
    let mut out: Vec<ViewName> = Vec::new();
    for candidate in [view_name, from].into_iter().flatten() {
        if let Some(v) = ViewName::try_new(candidate) {
            if !out.contains(&v) {
                out.push(v);
            }
        }
    }
    out
}

#[cfg(test)]
#[path = "model_test.rs"]
mod tests;
