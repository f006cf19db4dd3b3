//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

use crate::domain::model::MetricMode;

fn at_least_one(s: &str) -> Result<u64, String> {
    clap_num::number_range(s, 1, u64::MAX)
}

/// Planner tuning; unset values fall back to the config file, then to defaults
#[derive(Args, Debug, Default, Clone)]
pub struct PlannerArgs {
    /// Target GOP size in frames
    #[arg(short = 'g', long, env = "KEYPLAN_GOP_SIZE", value_parser = at_least_one)]
    pub gop_size: Option<u64>,

    /// Do not merge short scenes
    #[arg(long)]
    pub no_merge: bool,

    /// Flush a merged run once it reaches the GOP size instead of exceeding it
    #[arg(long)]
    pub merge_inclusive: bool,

    /// Minimum frames between consecutive merge points
    #[arg(long, env = "KEYPLAN_MERGE_MIN_DISTANCE")]
    pub merge_min_distance: Option<u64>,

    /// Accept the best split point even if it creates a short GOP
    #[arg(long)]
    pub no_discard: bool,

    /// Do not track discarded subdivision runs
    #[arg(long)]
    pub no_reeval: bool,

    /// Shortest allowed GOP is the GOP size divided by this value
    #[arg(long, env = "KEYPLAN_DISCARD_DIVISOR", value_parser = at_least_one)]
    pub discard_divisor: Option<u64>,

    /// Metric used to rank split points
    #[arg(long, value_enum, env = "KEYPLAN_METRIC")]
    pub metric: Option<MetricMode>,

    /// Rank by block-importance cost (overrides --metric)
    #[arg(long)]
    pub imp: bool,

    /// Rank by importance times inter cost (overrides --imp and --metric)
    #[arg(long)]
    pub mixed: bool,

    /// Rank by raw metric without hierarchy bias (overrides --bias)
    #[arg(long)]
    pub exact: bool,

    /// Score multiplier per hierarchy level
    #[arg(long, env = "KEYPLAN_BIAS")]
    pub bias: Option<f64>,

    /// Only split on frames aligned to 16 frames from the target
    #[arg(long)]
    pub strict: bool,

    /// Maximum candidates considered per split (default: unlimited)
    #[arg(long, env = "KEYPLAN_CANDIDATE_LIMIT")]
    pub limit: Option<usize>,

    /// Only split on frames whose metric beats the local EWMA baseline
    #[arg(long)]
    pub ewma: bool,

    /// Decay of the EWMA baseline
    #[arg(long, env = "KEYPLAN_EWMA_DECAY")]
    pub ewma_decay: Option<f64>,

    /// TOML file with a [planner] table
    #[arg(long, env = "KEYPLAN_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Output destinations
#[derive(Args, Debug, Default, Clone)]
pub struct OutputArgs {
    /// Do not write the encoder configuration file
    #[arg(long)]
    pub no_config: bool,

    /// Encoder configuration path (default: input with .conf extension)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print the statistics report as JSON
    #[arg(long)]
    pub json: bool,
}
