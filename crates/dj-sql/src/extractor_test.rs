use super::*;

fn extract(sql: &str) -> Vec<String> {
    LinePrefixExtractor.extract(sql).into_iter().collect()
}

const LOOKER_SQL: &str = r#"
SELECT
    (FORMAT_TIMESTAMP('%Y-%m', order_items.created_at )) AS order_items_created_month,
    COUNT(*) AS order_items_count
FROM `proj.ecomm.order_items`
     AS order_items
LEFT JOIN `proj.ecomm.users` AS users ON users.id = order_items.user_id
GROUP BY
    1
ORDER BY
    1 DESC
LIMIT 500
"#;

#[test]
fn test_extract_aliased_tables() {
    let refs = extract(
        "SELECT 1\nFROM `proj.ecomm.order_items` AS order_items\nLEFT JOIN `proj.ecomm.users` AS users ON users.id = order_items.user_id",
    );
    assert_eq!(
        refs,
        vec![
            "order_items",
            "proj.ecomm.order_items",
            "proj.ecomm.users",
            "users"
        ]
    );
}

#[test]
fn test_alias_on_continuation_line() {
    // The alias line starts with AS; the FROM line has no alias on it
    let refs = extract(LOOKER_SQL);
    assert!(refs.contains(&"order_items".to_string()));
    assert!(refs.contains(&"proj.ecomm.order_items".to_string()));
    assert!(refs.contains(&"users".to_string()));
    assert!(refs.contains(&"proj.ecomm.users".to_string()));
    assert_eq!(refs.len(), 4);
}

#[test]
fn test_select_list_aliases_ignored() {
    // Lines starting with SELECT / COUNT carry AS but are never collected
    let refs = extract("SELECT\n    COUNT(*) AS order_items_count\nFROM public.orders AS orders");
    assert_eq!(refs, vec!["orders", "public.orders"]);
}

#[test]
fn test_join_without_alias() {
    let refs = extract(
        "FROM order_items AS order_items\nLEFT JOIN user_order_facts ON user_order_facts.user_id = order_items.user_id",
    );
    assert_eq!(refs, vec!["order_items", "user_order_facts"]);
}

#[test]
fn test_implicit_alias() {
    let refs = extract("FROM public.users u");
    assert_eq!(refs, vec!["public.users", "u"]);
}

#[test]
fn test_inner_and_cross_join() {
    let refs = extract(
        "FROM a.orders AS orders\nINNER JOIN a.items AS items ON items.order_id = orders.id\nCROSS JOIN UNNEST(orders.tags) AS tags",
    );
    assert_eq!(refs, vec!["a.items", "a.orders", "items", "orders", "tags"]);
}

#[test]
fn test_union_all_lines() {
    let refs = extract(
        "SELECT id FROM x\nUNION ALL\nSELECT id\nFROM public.archive AS archive",
    );
    assert_eq!(refs, vec!["archive", "public.archive"]);
}

#[test]
fn test_subquery_yields_alias_only() {
    let refs = extract("FROM (SELECT * FROM raw.events) AS events");
    assert_eq!(refs, vec!["events"]);
}

#[test]
fn test_lowercase_keywords_not_matched() {
    assert!(extract("select * from public.users as users").is_empty());
}

#[test]
fn test_keyword_must_be_whole_token() {
    assert!(extract("ASSERT something\nFROMAGE cheese").is_empty());
}

#[test]
fn test_malformed_input_never_fails() {
    for sql in ["", "   ", "FROM", "AS", "LEFT JOIN ON", "FROM ((( AS", "\u{0}\u{1}"] {
        let _ = LinePrefixExtractor.extract(sql);
    }
    assert!(extract("FROM").is_empty());
    assert!(extract("LEFT JOIN ON x = y").is_empty());
}

#[test]
fn test_deduplicates() {
    let refs = extract("FROM a.t AS t\nUNION ALL\nFROM a.t AS t");
    assert_eq!(refs, vec!["a.t", "t"]);
}

#[test]
fn test_extractor_for_config() {
    let mut config = Config::default();
    assert_eq!(extractor_for(&config).name(), "line_prefix");
    config.extractor = ExtractorKind::Grammar;
    assert_eq!(extractor_for(&config).name(), "grammar");
}
