//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use dj_core::{apply_severity_overrides, Config, Diagnostic, Severity};
use log::{error, info, warn};
use std::fmt;
use std::path::Path;

use crate::cli::GlobalArgs;

/// Error type representing a non-zero process exit code.
///
/// Use `return Err(ExitCode(N).into())` instead of `std::process::exit(N)`
/// so that RAII destructors run and cleanup happens properly.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) i32);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Control flow only; nothing to print
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

/// Load the config named by `--config`, else `deadjoin.yml` in the working
/// directory, else defaults
pub(crate) fn load_config(global: &GlobalArgs) -> Result<Config> {
    match &global.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Config::load_or_default(Path::new(".")).context("Failed to load config"),
    }
}

/// Apply the config's severity overrides and log what remains.
///
/// Returns the diagnostics that survived the overrides.
pub(crate) fn report_diagnostics(diagnostics: Vec<Diagnostic>, config: &Config) -> Vec<Diagnostic> {
    let diagnostics = apply_severity_overrides(diagnostics, &config.severity_overrides);
    for d in &diagnostics {
        let subject = d.subject.as_deref().unwrap_or("-");
        match d.severity {
            Severity::Info => info!("{}: {}", subject, d),
            Severity::Warning => warn!("{}: {}", subject, d),
            Severity::Error => error!("{}: {}", subject, d),
        }
    }
    diagnostics
}

/// Write to a file when given, else print
pub(crate) fn emit(text: &str, out: Option<&Path>) -> Result<()> {
    match out {
        Some(path) => std::fs::write(path, text)
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            println!("{}", text);
            Ok(())
        }
    }
}
