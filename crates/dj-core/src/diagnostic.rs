//! Diagnostics returned alongside results
//!
//! Nothing in the reconciliation path logs or prints. Per-entry and
//! per-element problems are collected as [`Diagnostic`] values and handed back
//! to the caller, which decides how to surface them.

use crate::config::ConfigSeverity;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational, no action required
    Info,
    /// Warning: the result is partial for some entry or element
    Warning,
    /// Error: the result for the subject is unusable
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// Stable diagnostic codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DiagnosticCode {
    /// Model entry missing required structure; skipped
    DJ001,
    /// Duplicate explore or view name; later definition skipped
    DJ002,
    /// Content element references an explore absent from the model
    DJ010,
    /// Content record with no usable identity; skipped
    DJ011,
    /// SQL text unavailable for a query
    DJ020,
    /// Query rendered only after transient failures
    DJ021,
    /// Run stopped before every query was rendered
    DJ030,
}

impl DiagnosticCode {
    /// Every known code, in declaration order
    pub const ALL: [DiagnosticCode; 7] = [
        DiagnosticCode::DJ001,
        DiagnosticCode::DJ002,
        DiagnosticCode::DJ010,
        DiagnosticCode::DJ011,
        DiagnosticCode::DJ020,
        DiagnosticCode::DJ021,
        DiagnosticCode::DJ030,
    ];

    /// Code string, e.g. `"DJ010"`
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticCode::DJ001 => "DJ001",
            DiagnosticCode::DJ002 => "DJ002",
            DiagnosticCode::DJ010 => "DJ010",
            DiagnosticCode::DJ011 => "DJ011",
            DiagnosticCode::DJ020 => "DJ020",
            DiagnosticCode::DJ021 => "DJ021",
            DiagnosticCode::DJ030 => "DJ030",
        }
    }

    /// Parse a code string
    pub fn parse(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == code)
    }

    /// Severity used unless overridden in config
    pub fn default_severity(&self) -> Severity {
        match self {
            DiagnosticCode::DJ021 => Severity::Info,
            DiagnosticCode::DJ001
            | DiagnosticCode::DJ002
            | DiagnosticCode::DJ010
            | DiagnosticCode::DJ011
            | DiagnosticCode::DJ020
            | DiagnosticCode::DJ030 => Severity::Warning,
        }
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A diagnostic produced while building the graph or reconciling content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Diagnostic code
    pub code: DiagnosticCode,
    /// Severity level
    pub severity: Severity,
    /// Human-readable message
    pub message: String,
    /// Entity the diagnostic is about (explore, view, query or element)
    pub subject: Option<String>,
    /// Optional hint for how to fix
    pub hint: Option<String>,
}

impl Diagnostic {
    /// Create a diagnostic at the code's default severity
    pub fn new(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            code,
            severity: code.default_severity(),
            message: message.into(),
            subject: None,
            hint: None,
        }
    }

    /// Attach the subject the diagnostic is about
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Attach a remediation hint
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(hint) = &self.hint {
            write!(f, " (hint: {})", hint)?;
        }
        Ok(())
    }
}

/// Apply per-code severity overrides, dropping diagnostics set to `off`.
pub fn apply_severity_overrides(
    diagnostics: Vec<Diagnostic>,
    overrides: &HashMap<String, ConfigSeverity>,
) -> Vec<Diagnostic> {
    if overrides.is_empty() {
        return diagnostics;
    }
    diagnostics
        .into_iter()
        .filter_map(|mut d| match overrides.get(d.code.as_str()) {
            Some(ConfigSeverity::Off) => None,
            Some(ConfigSeverity::Info) => {
                d.severity = Severity::Info;
                Some(d)
            }
            Some(ConfigSeverity::Warning) => {
                d.severity = Severity::Warning;
                Some(d)
            }
            Some(ConfigSeverity::Error) => {
                d.severity = Severity::Error;
                Some(d)
            }
            None => Some(d),
        })
        .collect()
}

#[cfg(test)]
#[path = "diagnostic_test.rs"]
mod tests;
