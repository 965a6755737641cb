//! Shared test utilities for dj-analysis

use crate::render::{RenderError, SqlRenderer};
use async_trait::async_trait;
use dj_core::{ContentElement, ModelFeed, QueryId, SqlFeed};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// E-commerce model: `order_items` joins `users` and `products`
pub const ECOMMERCE_MODEL: &str = r#"
explores:
  - name: order_items
    joins:
      - name: users
      - name: products
  - name: events
    view_name: event_log
    joins:
      - name: users
views:
  - name: order_items
    sql_table_name: "`proj.ecomm.order_items`"
  - name: users
    sql_table_name: proj.ecomm.users
  - name: products
    sql_table_name: proj.ecomm.products
  - name: event_log
    sql_table_name: proj.web.events
"#;

/// Compiler-style SQL touching `order_items` and `users`
pub const ORDERS_BY_USER_SQL: &str = "SELECT\n    users.state AS users_state,\n    COUNT(*) AS order_items_count\nFROM `proj.ecomm.order_items`\n     AS order_items\nLEFT JOIN `proj.ecomm.users` AS users ON users.id = order_items.user_id\nGROUP BY\n    1\nLIMIT 500";

/// SQL touching every view `order_items` can reach
pub const ORDERS_FULL_SQL: &str = "SELECT\n    products.brand AS products_brand,\n    users.state AS users_state\nFROM `proj.ecomm.order_items` AS order_items\nLEFT JOIN `proj.ecomm.users` AS users ON users.id = order_items.user_id\nLEFT JOIN `proj.ecomm.products` AS products ON products.id = order_items.product_id\nGROUP BY\n    1,\n    2";

/// SQL that references no model view at all
pub const CONSTANT_SQL: &str = "SELECT 1 AS one";

pub fn ecommerce_model() -> ModelFeed {
    ModelFeed::from_yaml_str(ECOMMERCE_MODEL).unwrap()
}

/// Dashboard element on dashboard 1
pub fn tile(element_id: &str, explore: &str, query_id: &str) -> ContentElement {
    ContentElement::dashboard("1", element_id, explore, query_id)
}

pub fn sql_feed(entries: &[(&str, &str)]) -> SqlFeed {
    let mut feed = SqlFeed::new();
    for (query_id, sql) in entries {
        feed.insert_sql(query_id, *sql);
    }
    feed
}

/// Renderer driven by a per-query script of failures before success.
///
/// Each query fails with the scripted errors in order, then returns its SQL.
/// Queries without SQL fail permanently.
#[derive(Default)]
pub struct ScriptedRenderer {
    sql: HashMap<String, String>,
    failures: Mutex<HashMap<String, Vec<RenderError>>>,
    calls: AtomicUsize,
}

impl ScriptedRenderer {
    pub fn new(entries: &[(&str, &str)]) -> Self {
        Self {
            sql: entries
                .iter()
                .map(|(id, sql)| (id.to_string(), sql.to_string()))
                .collect(),
            ..Default::default()
        }
    }

    pub fn fail_first(self, query_id: &str, errors: Vec<RenderError>) -> Self {
        self.failures
            .lock()
            .unwrap()
            .insert(query_id.to_string(), errors);
        self
    }

    /// Total render calls, retries included
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SqlRenderer for ScriptedRenderer {
    async fn render(&self, query_id: &QueryId) -> Result<String, RenderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(errors) = self.failures.lock().unwrap().get_mut(query_id.as_str()) {
            if !errors.is_empty() {
                return Err(errors.remove(0));
            }
        }
        self.sql
            .get(query_id.as_str())
            .cloned()
            .ok_or_else(|| RenderError::Permanent(format!("query {} not found", query_id)))
    }
}
