//! Content metadata feed: dashboard elements and looks
//!
//! Two record shapes are accepted. The canonical shape names every field
//! explicitly; the activity shape is a row of the BI service's
//! system-activity export (`dashboard.id`, `query.view`, ...), converted on
//! load.

use crate::diagnostic::{Diagnostic, DiagnosticCode};
use crate::error::{read_feed, CoreError, CoreResult};
use crate::names::{ExploreName, QueryId};
use crate::serde_helpers::{field_list, opt_string_or_number};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::path::Path;

/// Kind of reporting content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Dashboard,
    Look,
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentType::Dashboard => write!(f, "dashboard"),
            ContentType::Look => write!(f, "look"),
        }
    }
}

/// Identity of a content element
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementKey {
    pub content_type: ContentType,
    /// Owning dashboard or look id
    pub content_id: String,
    /// Dashboard element id; for a look, the look id
    pub element_id: String,
}

impl Ord for ElementKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.content_type
            .cmp(&other.content_type)
            .then_with(|| compare_ids(&self.content_id, &other.content_id))
            .then_with(|| compare_ids(&self.element_id, &other.element_id))
    }
}

impl PartialOrd for ElementKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for ElementKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.content_type {
            ContentType::Dashboard => write!(
                f,
                "dashboard {} / element {}",
                self.content_id, self.element_id
            ),
            ContentType::Look => write!(f, "look {}", self.content_id),
        }
    }
}

/// Compare ids numerically when both are integers, lexically otherwise
pub fn compare_ids(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

/// One dashboard element or look, as delivered by the content feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentElement {
    pub key: ElementKey,
    /// Explore the underlying query was built against (`query.view`)
    pub explore: Option<ExploreName>,
    pub query_id: Option<QueryId>,
    /// Fully-qualified field names referenced by the query
    pub fields: Vec<String>,
    /// Model the query runs against
    pub model: Option<String>,
    pub title: Option<String>,
}

impl ContentElement {
    /// Build a dashboard element
    pub fn dashboard(
        dashboard_id: impl Into<String>,
        element_id: impl Into<String>,
        explore: &str,
        query_id: &str,
    ) -> Self {
        Self {
            key: ElementKey {
                content_type: ContentType::Dashboard,
                content_id: dashboard_id.into(),
                element_id: element_id.into(),
            },
            explore: ExploreName::try_new(explore),
            query_id: QueryId::try_new(query_id),
            fields: Vec::new(),
            model: None,
            title: None,
        }
    }

    /// Build a look
    pub fn look(look_id: impl Into<String>, explore: &str, query_id: &str) -> Self {
        let id = look_id.into();
        Self {
            key: ElementKey {
                content_type: ContentType::Look,
                content_id: id.clone(),
                element_id: id,
            },
            explore: ExploreName::try_new(explore),
            query_id: QueryId::try_new(query_id),
            fields: Vec::new(),
            model: None,
            title: None,
        }
    }

    /// Replace the field list
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }
}

/// Canonical content record
#[derive(Debug, Clone, Deserialize)]
struct ContentRecord {
    content_type: ContentType,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    element_id: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number", alias = "dashboard_id", alias = "look_id")]
    content_id: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    query_id: Option<String>,
    #[serde(default, alias = "explore")]
    explore_name: Option<String>,
    #[serde(default, deserialize_with = "field_list", alias = "fields")]
    fields_used: Vec<String>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    title: Option<String>,
}

/// System-activity export row
#[derive(Debug, Clone, Deserialize)]
struct ActivityRow {
    #[serde(default, rename = "dashboard.id", deserialize_with = "opt_string_or_number")]
    dashboard_id: Option<String>,
    #[serde(default, rename = "dashboard_element.id", deserialize_with = "opt_string_or_number")]
    element_id: Option<String>,
    #[serde(default, rename = "look.id", deserialize_with = "opt_string_or_number")]
    look_id: Option<String>,
    #[serde(default, rename = "query.id", deserialize_with = "opt_string_or_number")]
    query_id: Option<String>,
    #[serde(default, rename = "query.view")]
    view: Option<String>,
    #[serde(default, rename = "query.model")]
    model: Option<String>,
    #[serde(default, rename = "query.formatted_fields", deserialize_with = "field_list")]
    fields: Vec<String>,
    #[serde(default, rename = "dashboard.title")]
    dashboard_title: Option<String>,
    #[serde(default, rename = "look.title")]
    look_title: Option<String>,
}

impl ContentRecord {
    fn into_element(self) -> Result<ContentElement, String> {
        let content_id = self
            .content_id
            .or_else(|| self.element_id.clone())
            .ok_or_else(|| "record has neither content_id nor element_id".to_string())?;
        let element_id = self.element_id.unwrap_or_else(|| content_id.clone());
        Ok(ContentElement {
            key: ElementKey {
                content_type: self.content_type,
                content_id,
                element_id,
            },
            explore: self.explore_name.and_then(ExploreName::try_new),
            query_id: self.query_id.and_then(QueryId::try_new),
            fields: self.fields_used,
            model: self.model,
            title: self.title,
        })
    }
}

impl ActivityRow {
    fn into_element(self) -> Result<ContentElement, String> {
        let key = match (self.dashboard_id, self.element_id, self.look_id) {
            (Some(dashboard), Some(element), _) => ElementKey {
                content_type: ContentType::Dashboard,
                content_id: dashboard,
                element_id: element,
            },
            (None, _, Some(look)) => ElementKey {
                content_type: ContentType::Look,
                content_id: look.clone(),
                element_id: look,
            },
            (Some(_), None, _) => {
                return Err("dashboard row has no dashboard_element.id".to_string())
            }
            (None, _, None) => return Err("row has neither dashboard.id nor look.id".to_string()),
        };
        Ok(ContentElement {
            key,
            explore: self.view.and_then(ExploreName::try_new),
            query_id: self.query_id.and_then(QueryId::try_new),
            fields: self.fields,
            model: self.model,
            title: self.dashboard_title.or(self.look_title),
        })
    }
}

/// Convert one feed record, trying the canonical shape first.
///
/// A record that declares a valid `content_type` is judged as canonical only;
/// anything else is tried as an activity row and, on failure, the reason names
/// both shapes.
fn convert_record(value: &serde_json::Value) -> Result<ContentElement, String> {
    let canonical_err = match ContentRecord::deserialize(value) {
        Ok(record) => return record.into_element(),
        Err(e) => e,
    };
    let activity_err = match ActivityRow::deserialize(value) {
        Ok(row) => match row.into_element() {
            Ok(element) => return Ok(element),
            Err(reason) => reason,
        },
        Err(e) => e.to_string(),
    };
    Err(format!(
        "not a content record ({}) and not an activity row ({})",
        canonical_err, activity_err
    ))
}

/// Content feed after per-record conversion
#[derive(Debug, Clone, Default)]
pub struct ContentFeed {
    pub elements: Vec<ContentElement>,
    /// One DJ011 per skipped record
    pub diagnostics: Vec<Diagnostic>,
}

impl ContentFeed {
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// Parse a content feed from a JSON array string.
///
/// Fails only when the document is not a JSON array. Records without a usable
/// identity are skipped with a diagnostic.
pub fn parse_content_feed(json: &str) -> CoreResult<ContentFeed> {
    let raw: Vec<serde_json::Value> = serde_json::from_str(json)?;
    let mut feed = ContentFeed::default();
    for (idx, value) in raw.iter().enumerate() {
        match convert_record(value) {
            Ok(element) => feed.elements.push(element),
            Err(reason) => feed.diagnostics.push(
                Diagnostic::new(
                    DiagnosticCode::DJ011,
                    format!("Content record #{} skipped: {}", idx + 1, reason),
                )
                .with_hint(
                    "Give each record a content_type and id, or dashboard.id with \
                     dashboard_element.id, or look.id",
                ),
            ),
        }
    }
    Ok(feed)
}

/// Load a content feed from a JSON file
pub fn load_content_feed(path: &Path) -> CoreResult<ContentFeed> {
    let content = read_feed("content", path)?;
    parse_content_feed(&content).map_err(|e| match e {
        CoreError::Json(err) => CoreError::FeedParseError {
            feed: "content",
            path: path.display().to_string(),
            message: err.to_string(),
        },
        other => other,
    })
}

#[cfg(test)]
#[path = "content_test.rs"]
mod tests;
