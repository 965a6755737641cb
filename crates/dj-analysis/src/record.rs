//! Per-element dependency records

use dj_core::{ElementKey, ExploreName, QueryId, ViewName};
use serde::Serialize;
use std::collections::BTreeSet;

/// Reconciliation result for one content element.
///
/// Built once by the resolver and never mutated afterwards. Sets are
/// ordered so serialized output is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyRecord {
    pub key: ElementKey,
    pub explore: Option<ExploreName>,
    pub query_id: Option<QueryId>,
    pub fields: Vec<String>,
    pub title: Option<String>,

    /// Every view the element's explore could reach
    pub potential_join: BTreeSet<ViewName>,
    /// Raw references extracted from the element's SQL
    pub sql_joins: BTreeSet<String>,
    /// References that resolved to a view
    pub used_joins: BTreeSet<String>,
    /// View names the SQL actually touched
    pub used_view_names: BTreeSet<ViewName>,
    /// `potential_join - used_view_names`
    pub unused_joins: BTreeSet<ViewName>,

    /// Why SQL was unavailable, when it was
    pub no_content: Option<String>,
    /// The element's explore is missing from the model
    pub unknown_explore: bool,
}

impl DependencyRecord {
    pub fn is_no_content(&self) -> bool {
        self.no_content.is_some()
    }

    /// Whether every declared view was used and nothing is flagged
    pub fn is_clean(&self) -> bool {
        self.unused_joins.is_empty() && !self.is_no_content() && !self.unknown_explore
    }
}
