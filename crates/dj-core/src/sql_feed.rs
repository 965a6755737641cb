//! SQL text feed: query id → generated SQL, or an unavailable marker

use crate::error::{read_feed, CoreError, CoreResult};
use crate::names::QueryId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Sentinel string some exporters write in place of SQL for a broken query
pub const NO_CONTENT_MARKER: &str = "No Content";

/// SQL text for one query, or the reason it could not be obtained
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SqlText {
    Available(String),
    Unavailable { reason: String },
}

impl SqlText {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        SqlText::Unavailable {
            reason: reason.into(),
        }
    }

    /// Classify SQL text returned by a renderer; the no-content marker and
    /// blank text count as unavailable
    pub fn from_rendered(sql: String) -> Self {
        if sql.trim() == NO_CONTENT_MARKER {
            SqlText::unavailable("query could not be rendered")
        } else if sql.trim().is_empty() {
            SqlText::unavailable("empty SQL text")
        } else {
            SqlText::Available(sql)
        }
    }

    pub fn as_sql(&self) -> Option<&str> {
        match self {
            SqlText::Available(sql) => Some(sql),
            SqlText::Unavailable { .. } => None,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSqlEntry {
    Text(String),
    Marker { unavailable: String },
    Null(()),
}

impl From<RawSqlEntry> for SqlText {
    fn from(raw: RawSqlEntry) -> Self {
        match raw {
            RawSqlEntry::Text(s) => SqlText::from_rendered(s),
            RawSqlEntry::Marker { unavailable } => SqlText::Unavailable {
                reason: unavailable,
            },
            RawSqlEntry::Null(()) => SqlText::unavailable("no SQL supplied"),
        }
    }
}

/// Lookup from query id to SQL text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SqlFeed {
    entries: HashMap<QueryId, SqlText>,
}

impl SqlFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, query_id: QueryId, sql: SqlText) {
        self.entries.insert(query_id, sql);
    }

    /// Convenience for inserting available SQL
    pub fn insert_sql(&mut self, query_id: &str, sql: impl Into<String>) {
        if let Some(id) = QueryId::try_new(query_id) {
            self.entries.insert(id, SqlText::Available(sql.into()));
        }
    }

    /// SQL entry for a query; `None` when the feed never mentioned it
    pub fn get(&self, query_id: &str) -> Option<&SqlText> {
        self.entries.get(query_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&QueryId, &SqlText)> {
        self.entries.iter()
    }

    /// Parse a feed from a JSON object of `query_id → sql | null | {"unavailable": reason}`
    pub fn from_json_str(json: &str) -> CoreResult<Self> {
        let raw: HashMap<QueryId, RawSqlEntry> = serde_json::from_str(json)?;
        Ok(Self {
            entries: raw.into_iter().map(|(k, v)| (k, v.into())).collect(),
        })
    }

    /// Load a feed from a JSON file
    pub fn load(path: &Path) -> CoreResult<Self> {
        let content = read_feed("sql", path)?;
        Self::from_json_str(&content).map_err(|e| CoreError::FeedParseError {
            feed: "sql",
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }
}

impl FromIterator<(QueryId, SqlText)> for SqlFeed {
    fn from_iter<T: IntoIterator<Item = (QueryId, SqlText)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
#[path = "sql_feed_test.rs"]
mod tests;
