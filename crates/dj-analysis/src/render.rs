//! SQL rendering through an external service, with bounded retry

use async_trait::async_trait;
use dj_core::{QueryId, RetryConfig, SqlFeed, SqlText};
use log::debug;
use std::time::Duration;
use thiserror::Error;

/// Failure reported by a renderer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// Worth retrying (timeouts, rate limits, 5xx)
    #[error("transient render failure: {0}")]
    Transient(String),

    /// Retrying cannot help (unknown query, invalid fields)
    #[error("render failed: {0}")]
    Permanent(String),
}

/// Produces the SQL text the BI service generates for a saved query
#[async_trait]
pub trait SqlRenderer: Send + Sync {
    async fn render(&self, query_id: &QueryId) -> Result<String, RenderError>;
}

/// Serves SQL from a pre-fetched feed
#[derive(Debug, Clone, Default)]
pub struct FeedRenderer {
    feed: SqlFeed,
}

impl FeedRenderer {
    pub fn new(feed: SqlFeed) -> Self {
        Self { feed }
    }
}

#[async_trait]
impl SqlRenderer for FeedRenderer {
    async fn render(&self, query_id: &QueryId) -> Result<String, RenderError> {
        match self.feed.get(query_id) {
            Some(SqlText::Available(sql)) => Ok(sql.clone()),
            Some(SqlText::Unavailable { reason }) => Err(RenderError::Permanent(reason.clone())),
            None => Err(RenderError::Permanent("no SQL entry for query".to_string())),
        }
    }
}

/// Fixed-delay retry budget for transient failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self::new(config.max_attempts, config.delay())
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

/// SQL obtained for one query and the attempts it took
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOutcome {
    pub sql: SqlText,
    pub attempts: u32,
}

/// Render a query, retrying transient failures up to the policy's budget.
///
/// Never fails: exhaustion and permanent errors become unavailable SQL.
pub async fn render_with_retry(
    renderer: &dyn SqlRenderer,
    query_id: &QueryId,
    policy: &RetryPolicy,
) -> RenderOutcome {
    let mut attempts = 0;
    loop {
        attempts += 1;
        let sql = match renderer.render(query_id).await {
            Ok(sql) => SqlText::from_rendered(sql),
            Err(RenderError::Transient(err)) if attempts < policy.max_attempts => {
                debug!(
                    "rendering query {} failed (attempt {}/{}), retrying in {}ms: {}",
                    query_id,
                    attempts,
                    policy.max_attempts,
                    policy.delay.as_millis(),
                    err
                );
                tokio::time::sleep(policy.delay).await;
                continue;
            }
            Err(RenderError::Transient(err)) => SqlText::unavailable(format!(
                "gave up after {} attempts: {}",
                attempts, err
            )),
            Err(RenderError::Permanent(err)) => SqlText::unavailable(err),
        };
        break RenderOutcome { sql, attempts };
    }
}

#[cfg(test)]
#[path = "render_test.rs"]
mod tests;
