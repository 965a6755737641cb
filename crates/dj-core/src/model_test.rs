use super::*;
use std::io::Write;

const THE_LOOK: &str = r#"
explores:
  - name: order_items
    joins:
      - name: users
      - name: products
      - name: buyers
        from: users
  - name: events
    view_name: event_log
views:
  - name: order_items
    sql_table_name: "`proj.ecomm.order_items`"
  - name: users
    sql_table_name: proj.ecomm.users
  - name: products
    sql_table_name: proj.ecomm.products
  - name: user_order_facts
    derived_table: true
"#;

#[test]
fn test_parse_and_validate() {
    let feed = ModelFeed::from_yaml_str(THE_LOOK).unwrap();
    let model = feed.validate();

    assert!(model.diagnostics.is_empty());
    assert_eq!(model.explores.len(), 2);
    assert_eq!(model.views.len(), 4);

    let order_items = &model.explores[0];
    assert_eq!(order_items.base_view(), "order_items");
    assert_eq!(order_items.joins.len(), 3);
    assert_eq!(order_items.joins[2].name, "buyers");
    assert_eq!(order_items.joins[2].overrides, vec![ViewName::new("users")]);

    let events = &model.explores[1];
    assert_eq!(events.base_view(), "event_log");
}

#[test]
fn test_sql_table_name_normalized() {
    let model = ModelFeed::from_yaml_str(THE_LOOK).unwrap().validate();
    let order_items = model.views.iter().find(|v| v.name == "order_items").unwrap();
    assert_eq!(
        order_items.sql_table_name.as_deref(),
        Some("proj.ecomm.order_items")
    );

    let derived = model
        .views
        .iter()
        .find(|v| v.name == "user_order_facts")
        .unwrap();
    assert!(derived.sql_table_name.is_none());
}

#[test]
fn test_explore_with_both_overrides_keeps_both() {
    let yaml = r#"
explores:
  - name: customers
    view_name: users
    from: user_base
"#;
    let model = ModelFeed::from_yaml_str(yaml).unwrap().validate();
    assert_eq!(
        model.explores[0].base_views,
        vec![ViewName::new("users"), ViewName::new("user_base")]
    );
}

#[test]
fn test_malformed_entries_skipped_with_warning() {
    let yaml = r#"
explores:
  - view_name: orphan
  - name: orders
    joins:
      - from: users
      - name: products
views:
  - sql_table_name: public.nothing
  - name: orders
    sql_table_name: "  "
"#;
    let model = ModelFeed::from_yaml_str(yaml).unwrap().validate();

    assert_eq!(model.explores.len(), 1);
    assert_eq!(model.explores[0].joins.len(), 1);
    assert_eq!(model.views.len(), 1);
    assert!(model.views[0].sql_table_name.is_none());

    let dj001 = model
        .diagnostics
        .iter()
        .filter(|d| d.code == DiagnosticCode::DJ001)
        .count();
    assert_eq!(dj001, 3);
}

#[test]
fn test_duplicate_explore_keeps_first() {
    let yaml = r#"
explores:
  - name: orders
  - name: orders
    view_name: other
"#;
    let model = ModelFeed::from_yaml_str(yaml).unwrap().validate();
    assert_eq!(model.explores.len(), 1);
    assert_eq!(model.explores[0].base_view(), "orders");
    assert_eq!(model.diagnostics[0].code, DiagnosticCode::DJ002);
}

#[test]
fn test_join_alias_accepted() {
    let yaml = r#"
explores:
  - name: orders
    join:
      - name: users
"#;
    let model = ModelFeed::from_yaml_str(yaml).unwrap().validate();
    assert_eq!(model.explores[0].joins[0].name, "users");
}

#[test]
fn test_load_json_and_yaml_files() {
    let dir = tempfile::tempdir().unwrap();

    let json_path = dir.path().join("model.json");
    let mut f = std::fs::File::create(&json_path).unwrap();
    write!(
        f,
        r#"{{"explores": [{{"name": "orders"}}], "views": [{{"name": "orders", "sql_table_name": "public.orders"}}]}}"#
    )
    .unwrap();
    let feed = ModelFeed::load(&json_path).unwrap();
    assert_eq!(feed.explores.len(), 1);

    let yaml_path = dir.path().join("model.yml");
    std::fs::write(&yaml_path, THE_LOOK).unwrap();
    let feed = ModelFeed::load(&yaml_path).unwrap();
    assert_eq!(feed.explores.len(), 2);
}

#[test]
fn test_load_missing_file() {
    let err = ModelFeed::load(Path::new("/nonexistent/model.yml")).unwrap_err();
    assert!(matches!(err, CoreError::FeedNotFound { feed: "model", .. }));
}

#[test]
fn test_load_malformed_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.json");
    std::fs::write(&path, "{not json").unwrap();
    let err = ModelFeed::load(&path).unwrap_err();
    assert!(matches!(err, CoreError::FeedParseError { .. }));
}
