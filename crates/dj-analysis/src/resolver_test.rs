use super::*;
use crate::test_utils::{ecommerce_model, sql_feed, tile, CONSTANT_SQL, ORDERS_BY_USER_SQL};
use dj_core::{ModelGraph, ViewName};
use dj_sql::LinePrefixExtractor;

fn names(views: &BTreeSet<ViewName>) -> Vec<&str> {
    views.iter().map(|v| v.as_str()).collect()
}

fn resolve(elements: &[ContentElement], sql: &SqlFeed) -> Resolution {
    let build = ModelGraph::build(&ecommerce_model()).unwrap();
    let explores = build.graph.explore_graph();
    let resolver =
        ContentDependencyResolver::new(&explores, build.graph.view_tables(), &LinePrefixExtractor);
    resolver.resolve(elements, sql)
}

#[test]
fn test_qualified_references_resolve_to_views() {
    let resolution = resolve(
        &[tile("10", "order_items", "q1")],
        &sql_feed(&[("q1", ORDERS_BY_USER_SQL)]),
    );
    assert!(resolution.diagnostics.is_empty());

    let record = &resolution.records[0];
    assert_eq!(names(&record.potential_join), vec!["order_items", "products", "users"]);
    assert_eq!(names(&record.used_view_names), vec!["order_items", "users"]);
    assert_eq!(names(&record.unused_joins), vec!["products"]);
    assert!(record.used_joins.contains("proj.ecomm.users"));
    assert!(record.used_joins.contains("users"));
    assert!(record.no_content.is_none());
    assert!(!record.unknown_explore);
}

#[test]
fn test_unmatched_qualified_reference_not_used() {
    let resolution = resolve(
        &[tile("10", "order_items", "q1")],
        &sql_feed(&[("q1", "FROM warehouse.other_table\n")]),
    );
    let record = &resolution.records[0];
    assert!(record.sql_joins.contains("warehouse.other_table"));
    assert!(record.used_joins.is_empty());
    assert!(record.used_view_names.is_empty());
    assert_eq!(record.unused_joins, record.potential_join);
}

#[test]
fn test_missing_sql_is_no_content() {
    let resolution = resolve(&[tile("10", "order_items", "q404")], &SqlFeed::new());
    let record = &resolution.records[0];
    assert!(record.is_no_content());
    assert!(record.used_joins.is_empty());
    assert!(record.sql_joins.is_empty());
    assert_eq!(record.unused_joins, record.potential_join);
    assert_eq!(resolution.diagnostics.len(), 1);
    assert_eq!(resolution.diagnostics[0].code, DiagnosticCode::DJ020);
}

#[test]
fn test_unavailable_marker_is_no_content() {
    let sql = SqlFeed::from_json_str(r#"{"q1": "No Content"}"#).unwrap();
    let resolution = resolve(&[tile("10", "order_items", "q1")], &sql);
    assert_eq!(
        resolution.records[0].no_content.as_deref(),
        Some("query could not be rendered")
    );
}

#[test]
fn test_unknown_explore_flagged() {
    let resolution = resolve(
        &[tile("10", "ghost", "q1")],
        &sql_feed(&[("q1", ORDERS_BY_USER_SQL)]),
    );
    let record = &resolution.records[0];
    assert!(record.unknown_explore);
    assert!(record.potential_join.is_empty());
    assert!(record.unused_joins.is_empty());
    // SQL is still scanned
    assert!(record.used_view_names.contains("users"));
    assert_eq!(resolution.diagnostics[0].code, DiagnosticCode::DJ010);
}

#[test]
fn test_element_without_query_id() {
    let resolution = resolve(&[tile("10", "order_items", "")], &SqlFeed::new());
    let record = &resolution.records[0];
    assert_eq!(record.no_content.as_deref(), Some("element has no query id"));
}

#[test]
fn test_sql_without_references() {
    let resolution = resolve(
        &[tile("10", "order_items", "q1")],
        &sql_feed(&[("q1", CONSTANT_SQL)]),
    );
    let record = &resolution.records[0];
    assert!(!record.is_no_content());
    assert!(record.sql_joins.is_empty());
    assert_eq!(record.unused_joins, record.potential_join);
}

#[test]
fn test_unused_is_potential_minus_used() {
    let elements = [
        tile("1", "order_items", "q1"),
        tile("2", "events", "q1"),
        tile("3", "order_items", "q2"),
    ];
    let sql = sql_feed(&[("q1", ORDERS_BY_USER_SQL), ("q2", "FROM x AS products\n")]);
    for record in resolve(&elements, &sql).records {
        let expected: BTreeSet<ViewName> = record
            .potential_join
            .difference(&record.used_view_names)
            .cloned()
            .collect();
        assert_eq!(record.unused_joins, expected);
        assert!(record.unused_joins.is_disjoint(&record.used_view_names));
    }
}

#[test]
fn test_one_record_per_element() {
    let elements = [
        tile("1", "order_items", "q1"),
        tile("1", "order_items", "q1"),
        tile("2", "nope", "q9"),
    ];
    let resolution = resolve(&elements, &sql_feed(&[("q1", ORDERS_BY_USER_SQL)]));
    assert_eq!(resolution.records.len(), 3);
}
