//! Ranked keyframe candidates for one subdivision of an over-long scene

use std::ops::Range;

use tracing::debug;

use crate::domain::model::{CostTable, FrameIndex, MetricMode};
use crate::planner::metric::{biased_score, hierarchy, metric, STRICT_HIERARCHY_LEVEL};
use crate::planner::smoothing::MetricBaseline;

/// Parameters of the candidate search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidateSettings {
    pub gop_size: u64,
    pub metric: MetricMode,
    /// Multiplier applied once per hierarchy level; 1 ranks by raw metric
    pub bias_factor: f64,
    /// Keep only frames aligned to a level of at least 4
    pub strict_hierarchy: bool,
    /// Maximum number of candidates returned; 0 means unlimited
    pub limit: usize,
}

/// A frame eligible to become a keyframe, valid for one subdivision decision
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub frame: FrameIndex,
    /// Raw metric of the frame
    pub metric: f64,
    /// Hierarchy level of the frame relative to the target offset
    pub level: u32,
    /// Biased score used for ranking
    pub score: f64,
}

/// Produces best-first candidate sequences from a cost table
#[derive(Debug, Clone, Copy)]
pub struct CandidateGenerator<'a> {
    costs: &'a CostTable,
    settings: CandidateSettings,
    baseline: Option<&'a MetricBaseline>,
}

impl<'a> CandidateGenerator<'a> {
    pub fn new(
        costs: &'a CostTable,
        settings: CandidateSettings,
        baseline: Option<&'a MetricBaseline>,
    ) -> Self {
        Self {
            costs,
            settings,
            baseline,
        }
    }

    /// Idealized position of subdivision `idrs`, pulled left by earlier discards
    pub fn target_offset(last: FrameIndex, idrs: u64, discarded: u64) -> FrameIndex {
        (last + idrs).saturating_sub(discarded)
    }

    /// Frame window searched for subdivision `idrs` of the scene `[last, this)`
    pub fn pool_bounds(
        &self,
        last: FrameIndex,
        this: FrameIndex,
        idrs: u64,
        discarded: u64,
    ) -> Range<FrameIndex> {
        let offset = Self::target_offset(last, idrs, discarded);
        let gop = self.settings.gop_size;
        let start = (offset + idrs.saturating_sub(1) * gop).max(last);
        let end = (offset + (idrs + 1) * gop).min(this);
        start..end.max(start)
    }

    /// Candidates for subdivision `idrs`, best first
    ///
    /// Equal scores keep ascending frame order. An empty window yields an empty sequence.
    pub fn candidates(
        &self,
        last: FrameIndex,
        this: FrameIndex,
        idrs: u64,
        discarded: u64,
    ) -> impl Iterator<Item = Candidate> {
        let offset = Self::target_offset(last, idrs, discarded);
        let bounds = self.pool_bounds(last, this, idrs, discarded);
        let window = self.costs.window(bounds.start, bounds.end);
        let first = window.start;

        let mut pool: Vec<Candidate> = self.costs.entries()[window]
            .iter()
            .enumerate()
            .filter_map(|(i, entry)| {
                let value = metric(&entry.cost, self.settings.metric);
                if let Some(baseline) = self.baseline {
                    if !baseline.admits(first + i, value) {
                        return None;
                    }
                }

                let distance = entry.frame - offset;
                let level = hierarchy(distance);
                if self.settings.strict_hierarchy && level < STRICT_HIERARCHY_LEVEL {
                    return None;
                }

                Some(Candidate {
                    frame: entry.frame,
                    metric: value,
                    level,
                    score: biased_score(value, self.settings.bias_factor, distance),
                })
            })
            .collect();

        // sort_by is stable: ties stay in ascending frame order
        pool.sort_by(|a, b| b.score.total_cmp(&a.score));

        debug!(
            "Candidate pool for subdivision {} of [{}, {}): {} frames in {:?}",
            idrs,
            last,
            this,
            pool.len(),
            bounds
        );

        let limit = match self.settings.limit {
            0 => usize::MAX,
            n => n,
        };
        pool.into_iter().take(limit)
    }
}
