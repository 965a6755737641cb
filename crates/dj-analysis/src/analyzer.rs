//! Unused join analysis over resolved records

use dj_core::{ExploreName, ReportMode, ViewName};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::filter::ReportFilter;
use crate::record::DependencyRecord;

/// A view declared by some analyzed element and used by none of them
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnusedView {
    pub view: ViewName,
    /// Explores whose analyzed content could have reached the view
    pub explores: BTreeSet<ExploreName>,
    /// Number of analyzed records that left the view unused
    pub unused_in: usize,
}

/// Analyzer output: the kept records in report order plus the aggregate tally
#[derive(Debug, Clone, Default)]
pub struct Analysis {
    pub elements: Vec<DependencyRecord>,
    /// Empty in per-element mode
    pub unused_views: Vec<UnusedView>,
}

/// Filters, orders and tallies dependency records
#[derive(Debug, Clone, Default)]
pub struct UnusedJoinAnalyzer {
    filter: ReportFilter,
    mode: ReportMode,
}

impl UnusedJoinAnalyzer {
    pub fn new(filter: ReportFilter, mode: ReportMode) -> Self {
        Self { filter, mode }
    }

    pub fn filter(&self) -> &ReportFilter {
        &self.filter
    }

    pub fn mode(&self) -> ReportMode {
        self.mode
    }

    pub fn analyze(&self, records: Vec<DependencyRecord>) -> Analysis {
        let mut elements: Vec<DependencyRecord> = records
            .into_iter()
            .filter(|r| self.filter.matches(r))
            .collect();
        elements.sort_by(|a, b| a.key.cmp(&b.key));

        let unused_views = match self.mode {
            ReportMode::Aggregate => aggregate_unused(&elements),
            ReportMode::PerElement => Vec::new(),
        };

        Analysis {
            elements,
            unused_views,
        }
    }
}

/// Views in some record's potential set that no record with SQL used.
///
/// Records without content still declare views, but cannot mark any used.
pub fn aggregate_unused(records: &[DependencyRecord]) -> Vec<UnusedView> {
    let used: BTreeSet<&ViewName> = records
        .iter()
        .filter(|r| !r.is_no_content())
        .flat_map(|r| r.used_view_names.iter())
        .collect();

    let mut tally: BTreeMap<&ViewName, UnusedView> = BTreeMap::new();
    for record in records {
        for view in record.potential_join.iter().filter(|v| !used.contains(v)) {
            let entry = tally.entry(view).or_insert_with(|| UnusedView {
                view: view.clone(),
                explores: BTreeSet::new(),
                unused_in: 0,
            });
            if let Some(explore) = &record.explore {
                entry.explores.insert(explore.clone());
            }
            entry.unused_in += 1;
        }
    }

    tally.into_values().collect()
}

#[cfg(test)]
#[path = "analyzer_test.rs"]
mod tests;
