// Domain models - Frame costs, scene analysis and keyframe plans

use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Position of a frame within the analysed clip
pub type FrameIndex = u64;

/// Per-frame encoding cost estimates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostRecord {
    /// Cost of coding the frame as an inter frame
    pub inter_cost: f64,
    /// Block-importance weight of the frame
    pub imp_block_cost: f64,
}

impl CostRecord {
    pub fn new(inter_cost: f64, imp_block_cost: f64) -> Self {
        Self {
            inter_cost,
            imp_block_cost,
        }
    }
}

/// Cost record bound to the frame it describes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameCost {
    pub frame: FrameIndex,
    pub cost: CostRecord,
}

/// Which scalar is derived from a cost record when ranking frames
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum MetricMode {
    /// Inter-frame cost only
    #[default]
    #[value(alias = "0")]
    #[serde(alias = "0")]
    Cost,
    /// Block-importance cost only
    #[value(alias = "1", alias = "imp")]
    #[serde(alias = "1", alias = "imp")]
    Importance,
    /// Product of both
    #[value(alias = "2", alias = "mixed")]
    #[serde(alias = "2", alias = "mixed")]
    Product,
}

impl fmt::Display for MetricMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricMode::Cost => write!(f, "cost"),
            MetricMode::Importance => write!(f, "importance"),
            MetricMode::Product => write!(f, "product"),
        }
    }
}

/// Sparse, frame-ordered collection of cost records
///
/// Frames without a record are simply absent; lookups and windows skip them.
#[derive(Debug, Clone, Default)]
pub struct CostTable {
    entries: Vec<FrameCost>,
}

impl CostTable {
    /// Create an empty cost table
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from `(frame, record)` pairs in any order
    ///
    /// When a frame appears more than once the last record wins.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = (FrameIndex, CostRecord)>,
    {
        let mut entries: Vec<FrameCost> = records
            .into_iter()
            .map(|(frame, cost)| FrameCost { frame, cost })
            .collect();

        // Stable sort keeps input order among duplicates, so the last one survives dedup below.
        entries.sort_by_key(|entry| entry.frame);
        let mut deduped: Vec<FrameCost> = Vec::with_capacity(entries.len());
        for entry in entries {
            match deduped.last_mut() {
                Some(last) if last.frame == entry.frame => *last = entry,
                _ => deduped.push(entry),
            }
        }

        Self { entries: deduped }
    }

    /// Number of frames carrying a record
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All records in ascending frame order
    pub fn entries(&self) -> &[FrameCost] {
        &self.entries
    }

    /// Record for a frame, if one exists
    pub fn get(&self, frame: FrameIndex) -> Option<&CostRecord> {
        self.entries
            .binary_search_by_key(&frame, |entry| entry.frame)
            .ok()
            .map(|position| &self.entries[position].cost)
    }

    /// Positions (into [`CostTable::entries`]) of records whose frame lies in `[start, end)`
    pub fn window(&self, start: FrameIndex, end: FrameIndex) -> Range<usize> {
        if start >= end {
            return 0..0;
        }
        let lo = self.entries.partition_point(|entry| entry.frame < start);
        let hi = self.entries.partition_point(|entry| entry.frame < end);
        lo..hi
    }

}

impl FromIterator<(FrameIndex, CostRecord)> for CostTable {
    fn from_iter<T: IntoIterator<Item = (FrameIndex, CostRecord)>>(iter: T) -> Self {
        Self::from_records(iter)
    }
}

/// Scene analysis loaded from the input document
#[derive(Debug, Clone)]
pub struct SceneAnalysis {
    /// Total number of frames; exclusive upper bound for every index
    pub frame_count: FrameIndex,
    /// Hard scene cuts, strictly increasing and below `frame_count`
    pub scene_changes: Vec<FrameIndex>,
    /// Sparse per-frame costs
    pub costs: CostTable,
}

impl SceneAnalysis {
    pub fn new(frame_count: FrameIndex, scene_changes: Vec<FrameIndex>, costs: CostTable) -> Self {
        Self {
            frame_count,
            scene_changes,
            costs,
        }
    }
}

/// Final forced-keyframe placement for a clip
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyframePlan {
    pub frame_count: FrameIndex,
    pub keyframes: Vec<FrameIndex>,
}

impl KeyframePlan {
    pub fn new(frame_count: FrameIndex, keyframes: Vec<FrameIndex>) -> Self {
        Self {
            frame_count,
            keyframes,
        }
    }

    /// Length of every GOP, including the last one that ends at `frame_count`
    pub fn gop_lengths(&self) -> Vec<u64> {
        self.keyframes
            .iter()
            .zip(
                self.keyframes
                    .iter()
                    .skip(1)
                    .chain(std::iter::once(&self.frame_count)),
            )
            .map(|(start, end)| end.saturating_sub(*start))
            .collect()
    }

    /// Render as an encoder `ForceKeyFrames` configuration line
    pub fn force_keyframes_line(&self) -> String {
        let frames: Vec<String> = self.keyframes.iter().map(|k| format!("{}f", k)).collect();
        format!("ForceKeyFrames : {}", frames.join(","))
    }
}

impl fmt::Display for KeyframePlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.force_keyframes_line())
    }
}
