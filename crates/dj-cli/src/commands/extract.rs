//! Extract command implementation

use anyhow::{Context, Result};
use dj_core::sql_utils::is_qualified;
use dj_core::ExtractorKind;
use dj_sql::extractor_for;

use crate::cli::{ExtractArgs, GlobalArgs};
use crate::commands::common::load_config;

/// Execute the extract command
pub(crate) async fn execute(args: &ExtractArgs, global: &GlobalArgs) -> Result<()> {
    let mut config = load_config(global)?;
    if args.grammar {
        config.extractor = ExtractorKind::Grammar;
    }

    let sql = std::fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;

    let extractor = extractor_for(&config);
    let refs = extractor.extract(&sql);
    if global.verbose {
        eprintln!(
            "[verbose] {} references via {} extractor",
            refs.len(),
            extractor.name()
        );
    }

    for reference in &refs {
        let kind = if is_qualified(reference) {
            "table"
        } else {
            "view"
        };
        println!("{:<6} {}", kind, reference);
    }
    Ok(())
}
