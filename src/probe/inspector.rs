//! Scene analysis inspection implementation

use std::path::Path;

use tracing::{debug, info};

use crate::domain::model::{CostTable, SceneAnalysis};
use crate::error::{KeyplanError, KeyplanResult};
use crate::probe::validator::AnalysisValidator;
use crate::probe::RawAnalysis;

/// Loads scene analysis documents into domain types
pub struct AnalysisInspector {
    validator: AnalysisValidator,
}

impl AnalysisInspector {
    /// Create a new analysis inspector
    pub fn new() -> Self {
        Self {
            validator: AnalysisValidator,
        }
    }

    /// Read and parse a scene analysis file
    pub fn inspect(&self, path: &Path) -> KeyplanResult<SceneAnalysis> {
        info!("Loading scene analysis: {}", path.display());

        if !path.exists() {
            return Err(KeyplanError::InputFileNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path)?;
        self.parse(&path.display().to_string(), &content)
    }

    /// Parse a scene analysis document; `source` names it in error messages
    pub fn parse(&self, source: &str, content: &str) -> KeyplanResult<SceneAnalysis> {
        let raw: RawAnalysis =
            serde_json::from_str(content).map_err(|e| KeyplanError::InputMalformed {
                path: source.to_string(),
                message: e.to_string(),
            })?;

        self.validator.validate_frame_count(source, raw.frame_count)?;
        let frame_count = raw.frame_count;
        debug!("frame count: {}", frame_count);

        let scene_changes = self
            .validator
            .sanitize_scene_changes(&raw.scene_changes, frame_count);

        let costs: CostTable = raw
            .scores
            .into_iter()
            .filter_map(|(key, record)| match key.trim().parse::<u64>() {
                Ok(frame) if frame < frame_count => Some((frame, record)),
                Ok(frame) => {
                    debug!("Skipping cost record for frame {} beyond frame count", frame);
                    None
                }
                Err(_) => {
                    debug!("Skipping cost record with non-numeric key '{}'", key);
                    None
                }
            })
            .collect();

        info!(
            "Loaded {} frames, {} scene changes, {} cost records",
            frame_count,
            scene_changes.len(),
            costs.len()
        );

        Ok(SceneAnalysis::new(frame_count, scene_changes, costs))
    }
}

impl Default for AnalysisInspector {
    fn default() -> Self {
        Self::new()
    }
}
