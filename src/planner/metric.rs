//! Frame metric and hierarchical alignment scoring

use crate::domain::model::{CostRecord, MetricMode};

/// Deepest hierarchy level rewarded by the alignment bias (offset divisible by 32)
pub const MAX_HIERARCHY_LEVEL: u32 = 5;

/// Minimum level a candidate needs in strict hierarchy mode (offset divisible by 16)
pub const STRICT_HIERARCHY_LEVEL: u32 = 4;

/// Scalar used to rank a frame under the selected metric mode
pub fn metric(record: &CostRecord, mode: MetricMode) -> f64 {
    match mode {
        MetricMode::Cost => record.inter_cost,
        MetricMode::Importance => record.imp_block_cost,
        MetricMode::Product => record.imp_block_cost * record.inter_cost,
    }
}

/// Largest `k <= 5` such that `distance` is divisible by `2^k`
pub fn hierarchy(distance: u64) -> u32 {
    if distance == 0 {
        MAX_HIERARCHY_LEVEL
    } else {
        distance.trailing_zeros().min(MAX_HIERARCHY_LEVEL)
    }
}

/// Metric biased toward positions aligned with deep hierarchy levels
///
/// A `bias_factor` of 1 leaves the metric untouched.
pub fn biased_score(metric: f64, bias_factor: f64, distance: u64) -> f64 {
    metric * bias_factor.powi(hierarchy(distance) as i32)
}
