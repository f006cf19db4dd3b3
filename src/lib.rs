//! Keyplan Forced Keyframe Planner Library
//!
//! Turns a per-frame scene analysis (scene cuts plus encoding-cost estimates) into a
//! strictly increasing list of forced keyframes for GOP-based encoders.
//!
//! Planning runs in two stages:
//!
//! - short scenes are merged until a run reaches the target GOP size
//! - over-long scenes are split on frames that are cheap to promote and aligned
//!   to hierarchical reference structures

pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod error;
pub mod output;
pub mod planner;
pub mod probe;
pub mod utils;

// Re-export commonly used types
pub use domain::model::{CostRecord, CostTable, FrameIndex, KeyframePlan, MetricMode, SceneAnalysis};
pub use error::{KeyplanError, KeyplanResult};
pub use planner::{KeyframePlanner, PlannerConfig};
