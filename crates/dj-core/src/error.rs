//! Error types for dj-core

use thiserror::Error;

/// Core error type for Deadjoin
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Invalid configuration value
    #[error("[E002] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E003: Input feed file not found
    #[error("[E003] {feed} feed not found: {path}")]
    FeedNotFound { feed: &'static str, path: String },

    /// E004: Input feed could not be decoded
    #[error("[E004] Failed to parse {feed} feed {path}: {message}")]
    FeedParseError {
        feed: &'static str,
        path: String,
        message: String,
    },

    /// E005: The model feed produced no usable explores
    #[error("[E005] Model feed contains no usable explores ({skipped} entries skipped)")]
    EmptyModel { skipped: usize },

    /// E006: An identifier that must be non-empty was empty
    #[error("[E006] Empty name for {context}")]
    EmptyName { context: String },

    /// E007: IO error
    #[error("[E007] IO error: {0}")]
    Io(#[from] std::io::Error),

    /// E008: IO error with file path context
    #[error("[E008] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// E009: YAML parse error
    #[error("[E009] YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;

/// Read a feed file, mapping a missing file to [`CoreError::FeedNotFound`].
pub(crate) fn read_feed(feed: &'static str, path: &std::path::Path) -> CoreResult<String> {
    if !path.exists() {
        return Err(CoreError::FeedNotFound {
            feed,
            path: path.display().to_string(),
        });
    }
    std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
        path: path.display().to_string(),
        source: e,
    })
}
