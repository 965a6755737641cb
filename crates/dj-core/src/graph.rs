//! Explore graph building
//!
//! Explores and views are nodes of one directed graph; an edge runs from an
//! explore to every view name it can reach, labelled with how the view got
//! there. Generated SQL may name a joined view by its alias or by the view
//! behind a `from`/`view_name` override, so both are reachable.

use crate::diagnostic::Diagnostic;
use crate::error::{CoreError, CoreResult};
use crate::model::{ModelFeed, ValidatedModel, View};
use crate::names::{ExploreName, ViewName};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Node in the model graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelNode {
    Explore(ExploreName),
    View(ViewName),
}

/// How an explore reaches a view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reach {
    /// The explore's base view
    Base,
    /// A join declared on the explore
    Join,
    /// The view behind a join's or base view's `view_name`/`from` override
    Override,
}

/// Explore name → every view name reachable from it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExploreGraph {
    reachable: BTreeMap<ExploreName, BTreeSet<ViewName>>,
}

impl ExploreGraph {
    /// Views reachable from an explore, `None` when the explore is unknown
    pub fn reachable(&self, explore: &str) -> Option<&BTreeSet<ViewName>> {
        self.reachable.get(explore)
    }

    pub fn contains(&self, explore: &str) -> bool {
        self.reachable.contains_key(explore)
    }

    pub fn len(&self) -> usize {
        self.reachable.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reachable.is_empty()
    }

    /// Iterate explores in name order
    pub fn iter(&self) -> impl Iterator<Item = (&ExploreName, &BTreeSet<ViewName>)> {
        self.reachable.iter()
    }
}

/// View name → normalized physical table name.
///
/// Views without a `sql_table_name` are absent and treated as logical-only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewTableMap {
    tables: BTreeMap<ViewName, String>,
}

impl ViewTableMap {
    /// Build from validated views
    pub fn from_views(views: &[View]) -> Self {
        let tables = views
            .iter()
            .filter_map(|v| {
                v.sql_table_name
                    .as_ref()
                    .map(|t| (v.name.clone(), t.clone()))
            })
            .collect();
        Self { tables }
    }

    /// Physical table for a view, if it has one
    pub fn table_for(&self, view: &str) -> Option<&str> {
        self.tables.get(view).map(String::as_str)
    }

    /// Every view whose physical table equals `table`.
    ///
    /// Several views may share one table, so this scans every entry.
    pub fn views_for_table<'a>(&'a self, table: &'a str) -> impl Iterator<Item = &'a ViewName> {
        self.tables
            .iter()
            .filter(move |(_, t)| t.as_str() == table)
            .map(|(v, _)| v)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Iterate view → table entries in view name order
    pub fn iter(&self) -> impl Iterator<Item = (&ViewName, &str)> {
        self.tables.iter().map(|(v, t)| (v, t.as_str()))
    }
}

/// The built model: explore/view graph plus the view → table map
#[derive(Debug)]
pub struct ModelGraph {
    graph: DiGraph<ModelNode, Reach>,
    explore_index: HashMap<ExploreName, NodeIndex>,
    view_index: HashMap<ViewName, NodeIndex>,
    view_tables: ViewTableMap,
    defined_views: BTreeSet<ViewName>,
}

/// Output of [`ModelGraph::build`]
#[derive(Debug)]
pub struct ModelBuild {
    pub graph: ModelGraph,
    /// Entries skipped while validating the feed
    pub diagnostics: Vec<Diagnostic>,
}

impl ModelGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            explore_index: HashMap::new(),
            view_index: HashMap::new(),
            view_tables: ViewTableMap::default(),
            defined_views: BTreeSet::new(),
        }
    }

    /// Build the graph from a raw model feed.
    ///
    /// Malformed entries are skipped and reported in
    /// [`ModelBuild::diagnostics`]. Fails only when no explore survives
    /// validation, since nothing can be reconciled against an empty model.
    pub fn build(feed: &ModelFeed) -> CoreResult<ModelBuild> {
        let validated = feed.validate();
        if validated.explores.is_empty() {
            return Err(CoreError::EmptyModel {
                skipped: validated.diagnostics.len(),
            });
        }
        Ok(Self::from_validated(validated))
    }

    /// Build from an already validated model
    pub fn from_validated(model: ValidatedModel) -> ModelBuild {
        let mut graph = Self::new();

        for explore in &model.explores {
            let idx = graph.add_explore(&explore.name);
            for base in &explore.base_views {
                graph.add_reach(idx, base, Reach::Base);
            }
            for join in &explore.joins {
                graph.add_reach(idx, &join.name, Reach::Join);
                for over in &join.overrides {
                    graph.add_reach(idx, over, Reach::Override);
                }
            }
        }

        graph.view_tables = ViewTableMap::from_views(&model.views);
        graph.defined_views = model.views.iter().map(|v| v.name.clone()).collect();

        ModelBuild {
            graph,
            diagnostics: model.diagnostics,
        }
    }

    fn add_explore(&mut self, name: &ExploreName) -> NodeIndex {
        if let Some(&idx) = self.explore_index.get(name) {
            return idx;
        }
        let idx = self.graph.add_node(ModelNode::Explore(name.clone()));
        self.explore_index.insert(name.clone(), idx);
        idx
    }

    fn add_view(&mut self, name: &ViewName) -> NodeIndex {
        if let Some(&idx) = self.view_index.get(name) {
            return idx;
        }
        let idx = self.graph.add_node(ModelNode::View(name.clone()));
        self.view_index.insert(name.clone(), idx);
        idx
    }

    fn add_reach(&mut self, explore: NodeIndex, view: &ViewName, reach: Reach) {
        let view_idx = self.add_view(view);
        // An alias equal to its own override would add a parallel edge
        if self.graph.find_edge(explore, view_idx).is_none() {
            self.graph.add_edge(explore, view_idx, reach);
        }
    }

    /// Snapshot explore → reachable views
    pub fn explore_graph(&self) -> ExploreGraph {
        let reachable = self
            .explore_index
            .iter()
            .map(|(name, &idx)| (name.clone(), self.views_from(idx)))
            .collect();
        ExploreGraph { reachable }
    }

    /// The view → physical table map
    pub fn view_tables(&self) -> &ViewTableMap {
        &self.view_tables
    }

    /// Views reachable from one explore, empty when the explore is unknown
    pub fn reachable_views(&self, explore: &str) -> BTreeSet<ViewName> {
        self.explore_index
            .get(explore)
            .map(|&idx| self.views_from(idx))
            .unwrap_or_default()
    }

    /// How an explore reaches a view, if it does
    pub fn reach_kind(&self, explore: &str, view: &str) -> Option<Reach> {
        let &e = self.explore_index.get(explore)?;
        let &v = self.view_index.get(view)?;
        self.graph.find_edge(e, v).map(|edge| self.graph[edge])
    }

    /// Explores from which a view is reachable, sorted by name
    pub fn explores_reaching(&self, view: &str) -> Vec<ExploreName> {
        let Some(&idx) = self.view_index.get(view) else {
            return Vec::new();
        };
        let mut out: Vec<ExploreName> = self
            .graph
            .edges_directed(idx, Direction::Incoming)
            .filter_map(|e| match &self.graph[e.source()] {
                ModelNode::Explore(name) => Some(name.clone()),
                ModelNode::View(_) => None,
            })
            .collect();
        out.sort();
        out.dedup();
        out
    }

    /// Defined views that no explore can reach
    pub fn orphan_views(&self) -> Vec<ViewName> {
        self.defined_views
            .iter()
            .filter(|v| {
                self.view_index.get(v.as_str()).map_or(true, |&idx| {
                    self.graph
                        .edges_directed(idx, Direction::Incoming)
                        .next()
                        .is_none()
                })
            })
            .cloned()
            .collect()
    }

    /// Defined views without a physical table
    pub fn logical_only_views(&self) -> Vec<ViewName> {
        self.defined_views
            .iter()
            .filter(|v| self.view_tables.table_for(v).is_none())
            .cloned()
            .collect()
    }

    pub fn explore_count(&self) -> usize {
        self.explore_index.len()
    }

    fn views_from(&self, idx: NodeIndex) -> BTreeSet<ViewName> {
        self.graph
            .edges_directed(idx, Direction::Outgoing)
            .filter_map(|e| match &self.graph[e.target()] {
                ModelNode::View(name) => Some(name.clone()),
                ModelNode::Explore(_) => None,
            })
            .collect()
    }
}

impl Default for ModelGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "graph_test.rs"]
mod tests;
