//! End-to-end reconciliation scenarios

use dj_analysis::test_utils::{
    ecommerce_model, sql_feed, tile, CONSTANT_SQL, ORDERS_BY_USER_SQL, ORDERS_FULL_SQL,
};
use dj_analysis::{reconcile, DependencyRecord, Report, ReportFilter};
use dj_core::{ContentElement, ModelFeed, ReportMode, SqlFeed, ViewName};
use dj_sql::{GrammarExtractor, LinePrefixExtractor, TableExtractor};
use std::collections::BTreeSet;

fn run(content: &[ContentElement], sql: &SqlFeed, mode: ReportMode) -> Report {
    reconcile(
        content,
        sql,
        &ecommerce_model(),
        ReportFilter::None,
        mode,
        &LinePrefixExtractor,
    )
    .unwrap()
}

fn set(names: &[&str]) -> BTreeSet<ViewName> {
    names.iter().map(|n| ViewName::new(*n)).collect()
}

// ── Scenario A: qualified tables resolve to views ───────────────────────

#[test]
fn test_scenario_a_used_and_unused() {
    let sql = "SELECT COUNT(*) AS order_items_count\n\
               FROM `proj.ecomm.order_items` AS order_items\n\
               LEFT JOIN `proj.ecomm.users` AS users ON users.id = order_items.user_id\n";
    let report = run(
        &[tile("1", "order_items", "q1")],
        &sql_feed(&[("q1", sql)]),
        ReportMode::PerElement,
    );

    let record = &report.elements[0];
    assert_eq!(record.potential_join, set(&["order_items", "users", "products"]));
    assert_eq!(record.used_view_names, set(&["order_items", "users"]));
    assert_eq!(record.unused_joins, set(&["products"]));
}

#[test]
fn test_scenario_a_with_grammar_extractor() {
    let sql = "SELECT COUNT(*) FROM `proj.ecomm.order_items` AS order_items \
               LEFT JOIN `proj.ecomm.users` AS users ON users.id = order_items.user_id";
    let extractor = GrammarExtractor::new(dj_core::Dialect::BigQuery);
    let report = reconcile(
        &[tile("1", "order_items", "q1")],
        &sql_feed(&[("q1", sql)]),
        &ecommerce_model(),
        ReportFilter::None,
        ReportMode::PerElement,
        &extractor,
    )
    .unwrap();
    assert_eq!(report.elements[0].unused_joins, set(&["products"]));
}

// ── Scenario B: missing SQL ─────────────────────────────────────────────

#[test]
fn test_scenario_b_missing_sql_entry() {
    let report = run(
        &[tile("1", "order_items", "q404")],
        &SqlFeed::new(),
        ReportMode::PerElement,
    );
    let record = &report.elements[0];
    assert!(record.is_no_content());
    assert!(record.used_joins.is_empty());
    assert_eq!(record.unused_joins, record.potential_join);
    assert_eq!(report.no_content_count(), 1);
}

// ── Scenario C: shared explore, aggregate vs per-element ────────────────

fn scenario_c(mode: ReportMode) -> Report {
    run(
        &[tile("1", "order_items", "q_all"), tile("2", "order_items", "q_none")],
        &sql_feed(&[("q_all", ORDERS_FULL_SQL), ("q_none", CONSTANT_SQL)]),
        mode,
    )
}

#[test]
fn test_scenario_c_aggregate() {
    let report = scenario_c(ReportMode::Aggregate);
    assert!(report.unused_views.is_empty());
    assert!(report.rows().is_empty());
}

#[test]
fn test_scenario_c_per_element() {
    let report = scenario_c(ReportMode::PerElement);
    assert!(report.elements[0].unused_joins.is_empty());
    assert_eq!(
        report.elements[1].unused_joins,
        set(&["order_items", "users", "products"])
    );
    assert_eq!(report.rows().len(), 3);
}

// ── Properties ──────────────────────────────────────────────────────────

fn mixed_content() -> (Vec<ContentElement>, SqlFeed) {
    let content = vec![
        tile("4", "order_items", "q1"),
        tile("1", "events", "q2"),
        tile("3", "order_items", "q3"),
        tile("2", "ghost", "q1"),
        ContentElement::look("9", "order_items", "q2"),
    ];
    let sql = sql_feed(&[
        ("q1", ORDERS_BY_USER_SQL),
        ("q2", "SELECT 1\nFROM proj.web.events AS event_log\n"),
    ]);
    (content, sql)
}

fn record_sets(records: &[DependencyRecord]) -> Vec<(String, BTreeSet<ViewName>, BTreeSet<ViewName>)> {
    records
        .iter()
        .map(|r| (r.key.to_string(), r.used_view_names.clone(), r.unused_joins.clone()))
        .collect()
}

#[test]
fn test_idempotent() {
    let (content, sql) = mixed_content();
    let first = run(&content, &sql, ReportMode::Aggregate);
    let second = run(&content, &sql, ReportMode::Aggregate);
    assert_eq!(record_sets(&first.elements), record_sets(&second.elements));
    assert_eq!(first.unused_views, second.unused_views);
    assert_ne!(first.run_id, second.run_id);
}

#[test]
fn test_every_element_reported_once_in_order() {
    let (content, sql) = mixed_content();
    let report = run(&content, &sql, ReportMode::PerElement);
    let keys: Vec<String> = report.elements.iter().map(|r| r.key.to_string()).collect();
    assert_eq!(
        keys,
        vec![
            "dashboard 1 / element 1",
            "dashboard 1 / element 2",
            "dashboard 1 / element 3",
            "dashboard 1 / element 4",
            "look 9",
        ]
    );
}

#[test]
fn test_unused_and_used_disjoint() {
    let (content, sql) = mixed_content();
    for record in run(&content, &sql, ReportMode::PerElement).elements {
        assert!(record.unused_joins.is_disjoint(&record.used_view_names));
        let expected: BTreeSet<ViewName> = record
            .potential_join
            .difference(&record.used_view_names)
            .cloned()
            .collect();
        assert_eq!(record.unused_joins, expected);
    }
}

#[test]
fn test_physical_table_round_trip() {
    let model = ecommerce_model();
    for view in model.views.iter() {
        let (Some(name), Some(table)) = (&view.name, &view.sql_table_name) else {
            continue;
        };
        let sql = format!("SELECT 1\nFROM {}\n", table);
        let refs = LinePrefixExtractor.extract(&sql);
        assert_eq!(refs.len(), 1, "{}", sql);

        let report = reconcile(
            &[tile("1", "order_items", "q1")],
            &sql_feed(&[("q1", sql.as_str())]),
            &model,
            ReportFilter::None,
            ReportMode::PerElement,
            &LinePrefixExtractor,
        )
        .unwrap();
        assert!(
            report.elements[0].used_view_names.contains(name.as_str()),
            "{} should resolve to {}",
            table,
            name
        );
    }
}

#[test]
fn test_table_filter() {
    let (content, sql) = mixed_content();
    let report = reconcile(
        &content,
        &sql,
        &ecommerce_model(),
        ReportFilter::from_options(Some("event_log"), None).unwrap(),
        ReportMode::PerElement,
        &LinePrefixExtractor,
    )
    .unwrap();
    let keys: Vec<String> = report.elements.iter().map(|r| r.key.to_string()).collect();
    assert_eq!(keys, vec!["dashboard 1 / element 1", "look 9"]);
}

#[test]
fn test_field_filter() {
    let content = vec![
        tile("1", "order_items", "q1").with_fields(["order_items.count", "users.email"]),
        tile("2", "order_items", "q2").with_fields(["order_items.count"]),
    ];
    let sql = sql_feed(&[("q1", ORDERS_BY_USER_SQL), ("q2", ORDERS_FULL_SQL)]);
    let report = reconcile(
        &content,
        &sql,
        &ecommerce_model(),
        ReportFilter::from_options(None, Some("email")).unwrap(),
        ReportMode::PerElement,
        &LinePrefixExtractor,
    )
    .unwrap();
    assert_eq!(report.elements.len(), 1);
    assert_eq!(report.elements[0].key.element_id, "1");
    assert_eq!(report.elements[0].fields, vec!["order_items.count", "users.email"]);
}

#[test]
fn test_clean_only_when_every_join_used() {
    let content = vec![
        tile("1", "order_items", "full"),
        tile("2", "order_items", "by_user"),
        tile("3", "order_items", "missing"),
        tile("4", "ghost", "full"),
    ];
    let sql = sql_feed(&[("full", ORDERS_FULL_SQL), ("by_user", ORDERS_BY_USER_SQL)]);
    let report = run(&content, &sql, ReportMode::PerElement);
    let clean: Vec<bool> = report.elements.iter().map(|r| r.is_clean()).collect();
    assert_eq!(clean, vec![true, false, false, false]);
}

#[test]
fn test_malformed_model_entries_are_warnings() {
    let model = ModelFeed::from_yaml_str(
        r#"
explores:
  - name: order_items
    joins:
      - name: users
      - view_name: orphan
  - joins: []
  - name: order_items
views:
  - name: users
    sql_table_name: proj.ecomm.users
"#,
    )
    .unwrap();
    let report = reconcile(
        &[tile("1", "order_items", "q1")],
        &sql_feed(&[("q1", ORDERS_BY_USER_SQL)]),
        &model,
        ReportFilter::None,
        ReportMode::PerElement,
        &LinePrefixExtractor,
    )
    .unwrap();

    let codes: Vec<&str> = report.diagnostics.iter().map(|d| d.code.as_str()).collect();
    assert_eq!(codes.iter().filter(|c| **c == "DJ001").count(), 2);
    assert_eq!(codes.iter().filter(|c| **c == "DJ002").count(), 1);
    assert_eq!(report.elements[0].potential_join, set(&["order_items", "users"]));
}
