use super::*;
use crate::reconcile::reconcile;
use crate::test_utils::{ecommerce_model, sql_feed, tile, ORDERS_BY_USER_SQL};
use dj_sql::LinePrefixExtractor;

fn report(mode: ReportMode) -> Report {
    let content = vec![
        tile("1", "order_items", "q1"),
        tile("2", "events", "q2"),
    ];
    reconcile(
        &content,
        &sql_feed(&[("q1", ORDERS_BY_USER_SQL)]),
        &ecommerce_model(),
        ReportFilter::None,
        mode,
        &LinePrefixExtractor,
    )
    .unwrap()
}

#[test]
fn test_per_element_rows() {
    let report = report(ReportMode::PerElement);
    let rows = report.rows();
    let pairs: Vec<(&str, &str)> = rows
        .iter()
        .map(|r| (r.element_id.as_deref().unwrap_or(""), r.view.as_str()))
        .collect();
    assert_eq!(
        pairs,
        vec![("1", "products"), ("2", "event_log"), ("2", "users")]
    );
    assert_eq!(rows[1].note.as_deref(), Some("no SQL entry for query"));
}

#[test]
fn test_aggregate_rows() {
    let report = report(ReportMode::Aggregate);
    let rows = report.rows();
    let pairs: Vec<(&str, &str)> = rows
        .iter()
        .map(|r| (r.explore.as_ref().map(|e| e.as_str()).unwrap_or(""), r.view.as_str()))
        .collect();
    // `users` is used by element 1, so only its no-content sibling's views remain
    assert_eq!(
        pairs,
        vec![("events", "event_log"), ("order_items", "products")]
    );
    assert!(rows.iter().all(|r| r.content_id.is_none()));
}

#[test]
fn test_counts_and_json() {
    let report = report(ReportMode::Aggregate);
    assert_eq!(report.no_content_count(), 1);
    assert!(!report.has_errors());
    assert!(!report.cancelled);

    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    assert_eq!(json["mode"], "aggregate");
    assert_eq!(json["filter"]["kind"], "none");
    assert_eq!(json["elements"].as_array().unwrap().len(), 2);
    assert_eq!(json["unused_views"][0]["view"], "event_log");
}
