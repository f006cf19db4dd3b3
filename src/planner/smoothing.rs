//! Exponentially weighted moving average baseline for candidate filtering

use tracing::debug;

use crate::domain::model::{CostTable, MetricMode};
use crate::planner::metric::metric;

/// Forward EWMA: `s[0] = x[0]`, `s[i] = d * x[i] + (1 - d) * s[i - 1]`
pub fn ewma(values: &[f64], decay: f64) -> Vec<f64> {
    let mut smoothed = Vec::with_capacity(values.len());
    let mut state: Option<f64> = None;

    for &value in values {
        let next = match state {
            None => value,
            Some(previous) => decay * value + (1.0 - decay) * previous,
        };
        smoothed.push(next);
        state = Some(next);
    }

    smoothed
}

/// Element-wise mean of the forward EWMA and the EWMA of the reversed sequence
pub fn symmetric_ewma(values: &[f64], decay: f64) -> Vec<f64> {
    let forward = ewma(values, decay);

    let reversed: Vec<f64> = values.iter().rev().copied().collect();
    let mut backward = ewma(&reversed, decay);
    backward.reverse();

    forward
        .iter()
        .zip(backward.iter())
        .map(|(f, b)| (f + b) / 2.0)
        .collect()
}

/// Local metric baseline, one value per cost-table entry
#[derive(Debug, Clone)]
pub struct MetricBaseline {
    values: Vec<f64>,
}

impl MetricBaseline {
    /// Smooth the metric over every record in the table
    pub fn compute(costs: &CostTable, mode: MetricMode, decay: f64) -> Self {
        let raw: Vec<f64> = costs
            .entries()
            .iter()
            .map(|entry| metric(&entry.cost, mode))
            .collect();

        debug!("Computed EWMA baseline over {} frames (decay {})", raw.len(), decay);

        Self {
            values: symmetric_ewma(&raw, decay),
        }
    }

    /// Baseline at a cost-table position
    pub fn at(&self, position: usize) -> Option<f64> {
        self.values.get(position).copied()
    }

    /// A frame passes when its raw metric strictly exceeds the local baseline
    pub fn admits(&self, position: usize, value: f64) -> bool {
        self.at(position).map_or(true, |floor| value > floor)
    }
}
