//! Error types for dj-analysis

use thiserror::Error;

/// Run-level analysis errors
///
/// Problems with a single element never surface here; they become flags on
/// that element's record plus a diagnostic.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// AE001: Report options contradict each other
    #[error("[AE001] Configuration error: {message}")]
    Configuration { message: String },

    /// AE002: Core error propagation
    #[error("[AE002] Core error: {0}")]
    Core(#[from] dj_core::CoreError),
}

/// Result type alias for AnalysisError
pub type AnalysisResult<T> = Result<T, AnalysisError>;
