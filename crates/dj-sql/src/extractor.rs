//! Table reference extraction from generated SQL
//!
//! Callers depend on the [`TableExtractor`] trait only. The default
//! [`LinePrefixExtractor`] scrapes the line-per-clause layout that
//! model-driven query compilers emit; [`GrammarExtractor`](crate::grammar::GrammarExtractor)
//! parses the statement instead and can be swapped in through config.
//!
//! Known blind spots of the line-prefix strategy:
//! - a sub-select on the same line as its `FROM` yields only its alias;
//! - quoted identifiers containing ` AS ` or ` ON ` are cut at the keyword;
//! - keywords are matched case-sensitively, so lowercase emitters are missed;
//! - `RIGHT`/`FULL OUTER` joins and bare `JOIN` lines are not scanned.

use dj_core::sql_utils::{is_identifier_path, normalize_table_reference};
use dj_core::{Config, ExtractorKind};
use std::collections::BTreeSet;

use crate::grammar::GrammarExtractor;

/// Extracts the set of table and view references from SQL text.
///
/// Implementations must never fail: unrecognized input yields an empty set.
pub trait TableExtractor: Send + Sync {
    /// Strategy name (used in reports and logs)
    fn name(&self) -> &'static str;

    /// Return normalized references. A reference without a period is a
    /// logical name; one with a period is a schema-qualified table.
    fn extract(&self, sql: &str) -> BTreeSet<String>;
}

/// Build the extractor selected in config
pub fn extractor_for(config: &Config) -> Box<dyn TableExtractor> {
    match config.extractor {
        ExtractorKind::LinePrefix => Box::new(LinePrefixExtractor),
        ExtractorKind::Grammar => Box::new(GrammarExtractor::new(config.dialect)),
    }
}

/// First tokens of the lines that carry table references
const LINE_PREFIXES: [&str; 6] = ["FROM", "LEFT", "INNER", "CROSS", "UNION", "AS"];

/// Keywords stripped from the front of a line before its table expression
const LEADING_KEYWORDS: [&str; 10] = [
    "FROM", "LEFT", "RIGHT", "FULL", "INNER", "CROSS", "OUTER", "JOIN", "UNION", "ALL",
];

/// Line-prefix token scraping over generated SQL
#[derive(Debug, Clone, Copy, Default)]
pub struct LinePrefixExtractor;

impl TableExtractor for LinePrefixExtractor {
    fn name(&self) -> &'static str {
        "line_prefix"
    }

    fn extract(&self, sql: &str) -> BTreeSet<String> {
        let mut refs = BTreeSet::new();
        for line in sql.lines() {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            let Some(first) = tokens.first() else {
                continue;
            };
            if !LINE_PREFIXES.contains(first) {
                continue;
            }
            refs.extend(line_references(&tokens));
        }
        refs
    }
}

/// References on one collected line.
///
/// With an `AS` token, the alias after it is the reference; the source
/// expression before it is reported too when it is a plain identifier, so a
/// qualified physical table is not lost behind its alias. Without `AS`, the
/// table expression follows the leading join keywords, optionally trailed by
/// an implicit alias.
fn line_references(tokens: &[&str]) -> Vec<String> {
    let mut candidates: Vec<&str> = Vec::new();

    match tokens.iter().position(|t| *t == "AS") {
        Some(as_pos) => {
            if let [alias] = before_on(&tokens[as_pos + 1..]) {
                candidates.push(alias);
            }
            if let [source] = before_on(strip_leading_keywords(&tokens[..as_pos])) {
                candidates.push(source);
            }
        }
        None => match before_on(strip_leading_keywords(tokens)) {
            [table] => candidates.push(table),
            [table, alias] => {
                candidates.push(table);
                candidates.push(alias);
            }
            _ => {}
        },
    }

    candidates
        .into_iter()
        .map(normalize_table_reference)
        .filter(|c| is_identifier_path(c))
        .collect()
}

/// Tokens up to (not including) the first `ON`
fn before_on<'a, 'b>(tokens: &'a [&'b str]) -> &'a [&'b str] {
    let end = tokens
        .iter()
        .position(|t| *t == "ON")
        .unwrap_or(tokens.len());
    &tokens[..end]
}

fn strip_leading_keywords<'a, 'b>(tokens: &'a [&'b str]) -> &'a [&'b str] {
    let start = tokens
        .iter()
        .position(|t| !LEADING_KEYWORDS.contains(t))
        .unwrap_or(tokens.len());
    &tokens[start..]
}

#[cfg(test)]
#[path = "extractor_test.rs"]
mod tests;
