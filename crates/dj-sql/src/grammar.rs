//! Grammar-based table extraction
//!
//! Parses SQL with sqlparser and collects every table factor in the AST,
//! including those inside sub-selects and CTE bodies. Statements that do
//! not parse fall back to line-prefix scraping so a run never loses a
//! query to an unsupported construct.

use std::collections::BTreeSet;
use std::ops::ControlFlow;

use dj_core::sql_utils::{is_identifier_path, normalize_table_reference};
use dj_core::Dialect;
use log::debug;
use sqlparser::ast::{ObjectName, Statement, TableFactor, Visit, Visitor};

use crate::error::SqlResult;
use crate::extractor::{LinePrefixExtractor, TableExtractor};
use crate::parser::SqlParser;

/// AST walking extractor with line-prefix fallback
pub struct GrammarExtractor {
    parser: SqlParser,
}

impl GrammarExtractor {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            parser: SqlParser::for_dialect(dialect),
        }
    }

    /// Extract references, surfacing parse failures instead of falling back
    pub fn extract_checked(&self, sql: &str) -> SqlResult<BTreeSet<String>> {
        let statements = self.parser.parse(sql)?;
        Ok(collect_relations(&statements))
    }
}

impl TableExtractor for GrammarExtractor {
    fn name(&self) -> &'static str {
        "grammar"
    }

    fn extract(&self, sql: &str) -> BTreeSet<String> {
        match self.extract_checked(sql) {
            Ok(refs) => refs,
            Err(e) => {
                debug!(
                    "{} parse failed, using line-prefix scraping: {}",
                    self.parser.dialect_name(),
                    e
                );
                LinePrefixExtractor.extract(sql)
            }
        }
    }
}

/// Collects table names and their aliases from `TableFactor::Table` nodes
#[derive(Default)]
struct RelationCollector {
    refs: BTreeSet<String>,
}

impl RelationCollector {
    fn insert(&mut self, raw: &str) {
        let name = normalize_table_reference(raw);
        if is_identifier_path(&name) {
            self.refs.insert(name);
        }
    }
}

impl Visitor for RelationCollector {
    type Break = ();

    fn pre_visit_table_factor(&mut self, factor: &TableFactor) -> ControlFlow<()> {
        if let TableFactor::Table { name, alias, .. } = factor {
            self.insert(&object_name_to_string(name));
            if let Some(alias) = alias {
                self.insert(&alias.name.value);
            }
        }
        ControlFlow::Continue(())
    }
}

fn collect_relations(statements: &[Statement]) -> BTreeSet<String> {
    let mut collector = RelationCollector::default();
    for stmt in statements {
        let _ = stmt.visit(&mut collector);
    }
    collector.refs
}

/// Join the identifier parts of a name with `.`
fn object_name_to_string(name: &ObjectName) -> String {
    name.0
        .iter()
        .filter_map(|part| part.as_ident())
        .map(|ident| ident.value.as_str())
        .collect::<Vec<_>>()
        .join(".")
}

#[cfg(test)]
#[path = "grammar_test.rs"]
mod tests;
