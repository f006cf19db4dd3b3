//! Configuration initialization and hierarchy management

use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::cli::args::PlannerArgs;
use crate::domain::model::MetricMode;
use crate::error::{KeyplanError, KeyplanResult};
use crate::planner::merge::MergeThreshold;
use crate::planner::PlannerConfig;

/// Layout of the TOML configuration file
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    planner: PlannerConfig,
}

/// Resolve planner configuration following precedence: CLI > Env > File > Defaults
///
/// Environment variables reach this point through the clap `env` bindings on
/// [`PlannerArgs`], so they already sit in the CLI layer.
pub fn resolve_planner_config(args: &PlannerArgs) -> KeyplanResult<PlannerConfig> {
    let mut config = match &args.config {
        Some(path) => load_config_file(path)?,
        None => PlannerConfig::default(),
    };

    let overrides = apply_cli_overrides(&mut config, args);
    if overrides > 0 {
        info!("Applied {} CLI configuration overrides", overrides);
    }

    config.validate()?;
    Ok(config)
}

/// Load planner settings from a TOML file
pub fn load_config_file(path: &Path) -> KeyplanResult<PlannerConfig> {
    info!("Loading configuration from: {}", path.display());

    let content = std::fs::read_to_string(path).map_err(|e| KeyplanError::InvalidConfig {
        message: format!("Failed to read config file {}: {}", path.display(), e),
    })?;
    parse_config(&content)
}

/// Parse the `[planner]` table of a TOML document
pub fn parse_config(content: &str) -> KeyplanResult<PlannerConfig> {
    let file: ConfigFile = toml::from_str(content).map_err(|e| KeyplanError::InvalidConfig {
        message: format!("Failed to parse TOML config: {}", e),
    })?;
    Ok(file.planner)
}

/// Apply CLI arguments on top of `config`; returns how many values were overridden
fn apply_cli_overrides(config: &mut PlannerConfig, args: &PlannerArgs) -> usize {
    let mut overrides = 0;
    let mut set = |name: &str| {
        info!("CLI override: {}", name);
        overrides += 1;
    };

    if let Some(gop_size) = args.gop_size {
        config.gop_size = gop_size;
        set("gop_size");
    }
    if args.no_merge {
        config.merge_short_gops = false;
        set("merge_short_gops");
    }
    if args.merge_inclusive {
        config.merge_threshold = MergeThreshold::Reaches;
        set("merge_threshold");
    }
    if let Some(distance) = args.merge_min_distance {
        config.merge_min_distance = distance;
        set("merge_min_distance");
    }
    if args.no_discard {
        config.discard_short_gops = false;
        set("discard_short_gops");
    }
    if args.no_reeval {
        config.reevaluate_discards = false;
        set("reevaluate_discards");
    }
    if let Some(divisor) = args.discard_divisor {
        config.discard_divisor = divisor;
        set("discard_divisor");
    }

    // --mixed beats --imp, which beats --metric
    let metric = if args.mixed {
        Some(MetricMode::Product)
    } else if args.imp {
        Some(MetricMode::Importance)
    } else {
        args.metric
    };
    if let Some(metric) = metric {
        config.metric = metric;
        set("metric");
    }

    if let Some(bias) = args.bias {
        config.bias_factor = bias;
        set("bias_factor");
    }
    if args.exact {
        config.exact = true;
        set("exact");
    }
    if args.strict {
        config.strict_hierarchy = true;
        set("strict_hierarchy");
    }
    if let Some(limit) = args.limit {
        config.candidate_limit = limit;
        set("candidate_limit");
    }
    if args.ewma {
        config.ewma_floor = true;
        set("ewma_floor");
    }
    if let Some(decay) = args.ewma_decay {
        config.ewma_decay = decay;
        set("ewma_decay");
    }

    overrides
}
