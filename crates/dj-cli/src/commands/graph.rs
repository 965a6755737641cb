//! Graph command implementation

use anyhow::{Context, Result};
use dj_core::{ModelFeed, ModelGraph, Reach};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::cli::{GlobalArgs, GraphArgs, OutputFormat};
use crate::commands::common::{load_config, report_diagnostics};

/// Execute the graph command
pub(crate) async fn execute(args: &GraphArgs, global: &GlobalArgs) -> Result<()> {
    let config = load_config(global)?;
    let feed = ModelFeed::load(&args.model).context("Failed to load model feed")?;
    let build = ModelGraph::build(&feed).context("Failed to build model graph")?;
    report_diagnostics(build.diagnostics, &config);

    let graph = build.graph;
    let explores: Vec<ExploreInfo> = graph
        .explore_graph()
        .iter()
        .map(|(explore, views)| ExploreInfo {
            name: explore.to_string(),
            views: views
                .iter()
                .map(|v| ViewInfo {
                    name: v.to_string(),
                    reach: graph.reach_kind(explore, v).map(reach_label).unwrap_or("-"),
                    table: graph.view_tables().table_for(v).map(String::from),
                })
                .collect(),
        })
        .collect();

    match args.output {
        OutputFormat::Table => print_table(&explores, &graph),
        OutputFormat::Json => {
            let tables: BTreeMap<&str, &str> = graph
                .view_tables()
                .iter()
                .map(|(v, t)| (v.as_str(), t))
                .collect();
            let json = serde_json::json!({
                "explores": explores,
                "view_tables": tables,
                "logical_only_views": graph.logical_only_views(),
                "orphan_views": graph.orphan_views(),
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct ExploreInfo {
    name: String,
    views: Vec<ViewInfo>,
}

#[derive(Debug, Serialize)]
struct ViewInfo {
    name: String,
    reach: &'static str,
    table: Option<String>,
}

fn reach_label(reach: Reach) -> &'static str {
    match reach {
        Reach::Base => "base",
        Reach::Join => "join",
        Reach::Override => "override",
    }
}

fn print_table(explores: &[ExploreInfo], graph: &ModelGraph) {
    let view_width = explores
        .iter()
        .flat_map(|e| e.views.iter().map(|v| v.name.len()))
        .max()
        .unwrap_or(4)
        .max(4);
    let reach_width = 8;

    for explore in explores {
        println!("{}", explore.name);
        for view in &explore.views {
            println!(
                "  {:<view_width$}  {:<reach_width$}  {}",
                view.name,
                view.reach,
                view.table.as_deref().unwrap_or("(logical)"),
                view_width = view_width,
                reach_width = reach_width
            );
        }
    }

    let orphans = graph.orphan_views();
    if !orphans.is_empty() {
        let names: Vec<&str> = orphans.iter().map(|v| v.as_str()).collect();
        println!();
        println!("Views no explore reaches: {}", names.join(", "));
    }
    println!();
    println!(
        "{} explores, {} views bound to tables",
        graph.explore_count(),
        graph.view_tables().len()
    );
}
