//! Command implementations

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::Cli;
use crate::config_initialization::resolve_planner_config;
use crate::output::{ConfigWriter, GopStatistics};
use crate::planner::KeyframePlanner;
use crate::probe::inspector::AnalysisInspector;

/// Plan keyframes for `input`, write the encoder configuration and print the report
pub fn plan(input: &Path, cli: &Cli) -> Result<()> {
    info!("Input: {}", input.display());

    let config = resolve_planner_config(&cli.planner)
        .context("Failed to resolve planner configuration")?;
    let planner = KeyframePlanner::new(config)?;

    let analysis = AnalysisInspector::new()
        .inspect(input)
        .context("Failed to load scene analysis")?;

    let plan = planner.plan(&analysis);

    if cli.output.no_config {
        info!("Skipping encoder configuration file");
    } else {
        let path = cli
            .output
            .output
            .clone()
            .unwrap_or_else(|| ConfigWriter::config_path_for(input));
        ConfigWriter::new()
            .write(&path, &plan)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    println!("{}", plan.force_keyframes_line());

    let stats = GopStatistics::from_plan(&plan, planner.config().gop_size);
    if cli.output.json {
        let json = serde_json::to_string_pretty(&stats)
            .context("Failed to serialize statistics to JSON")?;
        println!("{}", json);
    } else {
        println!("{}", stats);
    }

    Ok(())
}
