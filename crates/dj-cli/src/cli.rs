//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};
use dj_core::ReportMode;
use std::path::PathBuf;

/// Deadjoin - find the joins and views your BI content never uses
#[derive(Parser, Debug)]
#[command(name = "dj")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path (default: ./deadjoin.yml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Reconcile content against the model and report unused joins
    Audit(AuditArgs),

    /// Print the table references extracted from a SQL file
    Extract(ExtractArgs),

    /// Print each explore's reachable views and the view → table map
    Graph(GraphArgs),
}

/// Arguments for the audit command
#[derive(Args, Debug)]
pub struct AuditArgs {
    /// Content metadata feed (JSON)
    #[arg(long)]
    pub content: PathBuf,

    /// SQL text feed (JSON object of query id → SQL)
    #[arg(long)]
    pub sql: PathBuf,

    /// Model definition feed (YAML or JSON)
    #[arg(short, long)]
    pub model: PathBuf,

    /// Only report elements whose SQL used this view
    #[arg(long)]
    pub table: Option<String>,

    /// Only report elements with a field containing this substring
    #[arg(long)]
    pub field: Option<String>,

    /// How unused views are tallied (overrides config)
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Render worker count (overrides config)
    #[arg(long)]
    pub threads: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: OutputFormat,

    /// Write the report to a file instead of stdout
    #[arg(long)]
    pub out: Option<PathBuf>,
}

/// Arguments for the extract command
#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// SQL file to scan
    pub file: PathBuf,

    /// Parse the SQL instead of scanning line prefixes
    #[arg(long)]
    pub grammar: bool,
}

/// Arguments for the graph command
#[derive(Args, Debug)]
pub struct GraphArgs {
    /// Model definition feed (YAML or JSON)
    #[arg(short, long)]
    pub model: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: OutputFormat,
}

/// Report tally modes
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArg {
    /// Views unused across all analyzed content
    Aggregate,
    /// Each element's own unused joins
    PerElement,
}

impl From<ModeArg> for ReportMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Aggregate => ReportMode::Aggregate,
            ModeArg::PerElement => ReportMode::PerElement,
        }
    }
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
