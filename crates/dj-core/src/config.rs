//! Configuration types and parsing for deadjoin.yml

use crate::diagnostic::DiagnosticCode;
use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

/// Config file names looked up in a directory, in order
pub const CONFIG_FILE_NAMES: [&str; 2] = ["deadjoin.yml", "deadjoin.yaml"];

/// Main configuration from deadjoin.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Width of the SQL rendering worker pool
    #[serde(default = "default_threads")]
    pub threads: usize,

    /// Retry policy for transient rendering failures
    #[serde(default)]
    pub retry: RetryConfig,

    /// Table extraction strategy
    #[serde(default)]
    pub extractor: ExtractorKind,

    /// SQL dialect used by the grammar extractor
    #[serde(default)]
    pub dialect: Dialect,

    /// Unused-view reporting mode
    #[serde(default)]
    pub mode: ReportMode,

    /// Override default severities for specific diagnostic codes.
    ///
    /// Keys are diagnostic code strings (e.g. "DJ010").
    #[serde(default)]
    pub severity_overrides: HashMap<String, ConfigSeverity>,
}

/// Retry policy configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetryConfig {
    /// Total attempts per query, including the first
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Fixed delay between attempts, in milliseconds
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

impl RetryConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            delay_ms: default_delay_ms(),
        }
    }
}

/// Table extraction strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractorKind {
    /// Line-prefix token scraping
    #[default]
    LinePrefix,
    /// sqlparser-based extraction with line-prefix fallback
    Grammar,
}

impl std::fmt::Display for ExtractorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractorKind::LinePrefix => write!(f, "line_prefix"),
            ExtractorKind::Grammar => write!(f, "grammar"),
        }
    }
}

/// Warehouse SQL dialect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    BigQuery,
    Snowflake,
    Postgres,
    Generic,
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dialect::BigQuery => write!(f, "bigquery"),
            Dialect::Snowflake => write!(f, "snowflake"),
            Dialect::Postgres => write!(f, "postgres"),
            Dialect::Generic => write!(f, "generic"),
        }
    }
}

/// How unused views are tallied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportMode {
    /// Views unused across every analyzed element collectively
    #[default]
    Aggregate,
    /// Each element's own unused joins
    PerElement,
}

impl std::fmt::Display for ReportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportMode::Aggregate => write!(f, "aggregate"),
            ReportMode::PerElement => write!(f, "per_element"),
        }
    }
}

/// Severity level for diagnostic overrides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSeverity {
    Info,
    Warning,
    Error,
    /// Suppress the diagnostic entirely
    Off,
}

fn default_threads() -> usize {
    4
}

fn default_max_attempts() -> u32 {
    3
}

fn default_delay_ms() -> u64 {
    500
}

impl Default for Config {
    fn default() -> Self {
        Self {
            threads: default_threads(),
            retry: RetryConfig::default(),
            extractor: ExtractorKind::default(),
            dialect: Dialect::default(),
            mode: ReportMode::default(),
            severity_overrides: HashMap::new(),
        }
    }
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `deadjoin.yml` (or `.yaml`) from a directory, falling back to
    /// defaults when neither exists
    pub fn load_or_default(dir: &Path) -> CoreResult<Self> {
        for name in CONFIG_FILE_NAMES {
            let path = dir.join(name);
            if path.exists() {
                return Self::load(&path);
            }
        }
        Ok(Self::default())
    }

    /// Validate the configuration
    pub fn validate(&self) -> CoreResult<()> {
        if self.threads == 0 {
            return Err(CoreError::ConfigInvalid {
                message: "threads must be at least 1".to_string(),
            });
        }

        if self.retry.max_attempts == 0 {
            return Err(CoreError::ConfigInvalid {
                message: "retry.max_attempts must be at least 1".to_string(),
            });
        }

        for code in self.severity_overrides.keys() {
            if DiagnosticCode::parse(code).is_none() {
                let valid: Vec<&str> = DiagnosticCode::ALL.iter().map(|c| c.as_str()).collect();
                return Err(CoreError::ConfigInvalid {
                    message: format!(
                        "Unknown diagnostic code '{}' in severity_overrides. Valid codes: {}",
                        code,
                        valid.join(", ")
                    ),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
