//! Scene analysis validation utilities

use tracing::warn;

use crate::domain::model::FrameIndex;
use crate::error::{KeyplanError, KeyplanResult};

/// Scene analysis validator
pub struct AnalysisValidator;

impl AnalysisValidator {
    /// A clip needs at least one frame
    pub fn validate_frame_count(&self, source: &str, frame_count: FrameIndex) -> KeyplanResult<()> {
        if frame_count == 0 {
            return Err(KeyplanError::InputMalformed {
                path: source.to_string(),
                message: "frame_count must be positive".to_string(),
            });
        }
        Ok(())
    }

    /// Keep scene changes that are strictly increasing and below `frame_count`
    pub fn sanitize_scene_changes(
        &self,
        scene_changes: &[FrameIndex],
        frame_count: FrameIndex,
    ) -> Vec<FrameIndex> {
        let mut kept: Vec<FrameIndex> = Vec::with_capacity(scene_changes.len());

        for &change in scene_changes {
            if change >= frame_count {
                warn!(
                    "Dropping scene change {} at or beyond frame count {}",
                    change, frame_count
                );
                continue;
            }
            if let Some(&previous) = kept.last() {
                if change <= previous {
                    warn!(
                        "Dropping scene change {} not after previous change {}",
                        change, previous
                    );
                    continue;
                }
            }
            kept.push(change);
        }

        kept
    }
}
