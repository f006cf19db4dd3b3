//! Keyframe planning: scene merging and GOP splitting

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::model::{KeyframePlan, MetricMode, SceneAnalysis};
use crate::error::{KeyplanError, KeyplanResult};

pub mod candidates;
pub mod gop;
pub mod merge;
pub mod metric;
pub mod smoothing;

use candidates::{CandidateGenerator, CandidateSettings};
use gop::{GopSplitter, SplitSettings};
use merge::{MergeSettings, MergeThreshold, SceneMerger};
use smoothing::MetricBaseline;

/// Default target GOP length in frames
pub const DEFAULT_GOP_SIZE: u64 = 512;

/// Default hierarchy bias, roughly 2^(1/6)
pub const DEFAULT_BIAS_FACTOR: f64 = 1.122462;

/// Planner configuration, fixed for a whole run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Target GOP length in frames
    pub gop_size: u64,
    /// Coalesce short scenes before splitting
    pub merge_short_gops: bool,
    /// Comparison used by the scene merger
    pub merge_threshold: MergeThreshold,
    /// Minimum frames between consecutive merge points
    pub merge_min_distance: u64,
    /// Reject split points that would create short GOPs
    pub discard_short_gops: bool,
    /// Track discard runs for diagnostics
    pub reevaluate_discards: bool,
    /// Short-GOP limit is `gop_size / discard_divisor`
    pub discard_divisor: u64,
    /// Metric used to rank candidates
    pub metric: MetricMode,
    /// Per-level multiplier for hierarchy-aligned candidates
    pub bias_factor: f64,
    /// Rank by raw metric, ignoring `bias_factor`
    pub exact: bool,
    /// Only keep candidates aligned to 16 frames or better
    pub strict_hierarchy: bool,
    /// Maximum candidates considered per subdivision; 0 means unlimited
    pub candidate_limit: usize,
    /// Require candidates to beat their EWMA baseline
    pub ewma_floor: bool,
    /// EWMA decay
    pub ewma_decay: f64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            gop_size: DEFAULT_GOP_SIZE,
            merge_short_gops: true,
            merge_threshold: MergeThreshold::Exceeds,
            merge_min_distance: 8,
            discard_short_gops: true,
            reevaluate_discards: true,
            discard_divisor: 2,
            metric: MetricMode::Cost,
            bias_factor: DEFAULT_BIAS_FACTOR,
            exact: false,
            strict_hierarchy: false,
            candidate_limit: 0,
            ewma_floor: false,
            ewma_decay: 0.04,
        }
    }
}

impl PlannerConfig {
    /// Check that every value lies in its domain
    pub fn validate(&self) -> KeyplanResult<()> {
        if self.gop_size == 0 {
            return Err(invalid("gop_size must be at least 1"));
        }
        if self.discard_divisor == 0 {
            return Err(invalid("discard_divisor must be at least 1"));
        }
        if !(self.bias_factor.is_finite() && self.bias_factor > 0.0) {
            return Err(invalid(format!(
                "bias_factor must be a positive number, got {}",
                self.bias_factor
            )));
        }
        if !(self.ewma_decay > 0.0 && self.ewma_decay <= 1.0) {
            return Err(invalid(format!(
                "ewma_decay must lie in (0, 1], got {}",
                self.ewma_decay
            )));
        }
        Ok(())
    }

    /// Bias factor actually applied to candidate scores
    pub fn effective_bias(&self) -> f64 {
        if self.exact {
            1.0
        } else {
            self.bias_factor
        }
    }

    /// Shortest GOP the splitter may create when discarding is enabled
    pub fn minimum_distance(&self) -> u64 {
        (self.gop_size / self.discard_divisor.max(1)).max(1)
    }

    pub fn merge_settings(&self) -> MergeSettings {
        MergeSettings {
            target: if self.merge_short_gops { self.gop_size } else { 0 },
            threshold: self.merge_threshold,
            min_distance: self.merge_min_distance,
        }
    }

    pub fn candidate_settings(&self) -> CandidateSettings {
        CandidateSettings {
            gop_size: self.gop_size,
            metric: self.metric,
            bias_factor: self.effective_bias(),
            strict_hierarchy: self.strict_hierarchy,
            limit: self.candidate_limit,
        }
    }

    pub fn split_settings(&self) -> SplitSettings {
        SplitSettings {
            gop_size: self.gop_size,
            discard_short_gops: self.discard_short_gops,
            reevaluate_discards: self.reevaluate_discards,
            minimum_distance: self.minimum_distance(),
        }
    }
}

fn invalid(message: impl Into<String>) -> KeyplanError {
    KeyplanError::InvalidConfig {
        message: message.into(),
    }
}

/// Wires the scene merger and GOP splitter over one scene analysis
#[derive(Debug, Clone)]
pub struct KeyframePlanner {
    config: PlannerConfig,
}

impl KeyframePlanner {
    /// Create a planner, rejecting out-of-domain configuration
    pub fn new(config: PlannerConfig) -> KeyplanResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Compute the forced keyframe positions for `analysis`
    pub fn plan(&self, analysis: &SceneAnalysis) -> KeyframePlan {
        let config = &self.config;
        info!(
            "Planning keyframes for {} frames ({} scene changes, {} cost records, gop size {})",
            analysis.frame_count,
            analysis.scene_changes.len(),
            analysis.costs.len(),
            config.gop_size
        );

        let baseline = config
            .ewma_floor
            .then(|| MetricBaseline::compute(&analysis.costs, config.metric, config.ewma_decay));

        let generator =
            CandidateGenerator::new(&analysis.costs, config.candidate_settings(), baseline.as_ref());
        let splitter = GopSplitter::new(generator, config.split_settings());
        let merger = SceneMerger::new(config.merge_settings());

        let scenes = merger.merge(analysis.scene_changes.iter().copied(), analysis.frame_count);
        let keyframes: Vec<_> = splitter.split(scenes).collect();

        info!("Placed {} keyframes", keyframes.len());
        KeyframePlan::new(analysis.frame_count, keyframes)
    }
}
