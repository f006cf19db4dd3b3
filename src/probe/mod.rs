//! Scene analysis loading and validation module

use std::collections::HashMap;

use serde::Deserialize;

use crate::domain::model::{CostRecord, FrameIndex};

pub mod inspector;
pub mod validator;

/// Scene analysis document as it appears on disk
#[derive(Debug, Clone, Deserialize)]
pub struct RawAnalysis {
    /// Total number of frames
    pub frame_count: FrameIndex,
    /// Detected scene cuts
    pub scene_changes: Vec<FrameIndex>,
    /// Per-frame costs keyed by stringified frame index
    pub scores: HashMap<String, CostRecord>,
}
