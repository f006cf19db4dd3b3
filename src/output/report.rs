//! GOP length statistics

use std::fmt;

use serde::Serialize;

use crate::domain::model::KeyframePlan;

/// Summary of the GOP lengths produced by a plan
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GopStatistics {
    pub frame_count: u64,
    /// `frame_count / target`
    pub expected_scenes: u64,
    /// Number of keyframes placed
    pub actual_scenes: usize,
    pub min: u64,
    pub max: u64,
    pub mean: f64,
    pub median: f64,
    pub target: u64,
    pub lengths: Vec<u64>,
}

impl GopStatistics {
    pub fn from_plan(plan: &KeyframePlan, target: u64) -> Self {
        let lengths = plan.gop_lengths();

        let mut sorted = lengths.clone();
        sorted.sort_unstable();

        let mean = if lengths.is_empty() {
            0.0
        } else {
            lengths.iter().sum::<u64>() as f64 / lengths.len() as f64
        };

        Self {
            frame_count: plan.frame_count,
            expected_scenes: if target == 0 { 0 } else { plan.frame_count / target },
            actual_scenes: plan.keyframes.len(),
            min: sorted.first().copied().unwrap_or(0),
            max: sorted.last().copied().unwrap_or(0),
            mean,
            median: median(&sorted),
            target,
            lengths,
        }
    }
}

/// Median of an ascending slice
fn median(sorted: &[u64]) -> f64 {
    match sorted.len() {
        0 => 0.0,
        n if n % 2 == 1 => sorted[n / 2] as f64,
        n => (sorted[n / 2 - 1] + sorted[n / 2]) as f64 / 2.0,
    }
}

impl fmt::Display for GopStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "frames: {}", self.frame_count)?;
        writeln!(
            f,
            "scenes: {} (expected {})",
            self.actual_scenes, self.expected_scenes
        )?;
        writeln!(
            f,
            "gop lengths: min {} / mean {:.1} / median {} / max {} / target {}",
            self.min, self.mean, self.median, self.max, self.target
        )?;
        write!(f, "lengths: {:?}", self.lengths)
    }
}
