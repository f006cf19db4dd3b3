//! Encoder configuration file writer

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::domain::model::KeyframePlan;
use crate::error::{KeyplanError, KeyplanResult};

/// Extension of the encoder configuration written next to the input
pub const CONFIG_EXTENSION: &str = "conf";

/// Writes the `ForceKeyFrames` line to an encoder configuration file
///
/// The target is replaced atomically through a hidden sibling file.
pub struct ConfigWriter;

impl ConfigWriter {
    pub fn new() -> Self {
        Self
    }

    /// Sibling of `input` sharing its base name, with the configuration extension
    pub fn config_path_for(input: &Path) -> PathBuf {
        input.with_extension(CONFIG_EXTENSION)
    }

    /// Write the plan's configuration line to `path`
    pub fn write(&self, path: &Path, plan: &KeyframePlan) -> KeyplanResult<()> {
        info!("Writing encoder configuration: {}", path.display());

        self.ensure_output_directory(path)?;
        self.write_atomic(path, plan.force_keyframes_line().as_bytes())
    }

    /// Write to a temporary sibling, then rename over the target
    fn write_atomic(&self, path: &Path, data: &[u8]) -> KeyplanResult<()> {
        let temp_path = self.create_temp_path(path)?;

        let result = self.write_to_file(&temp_path, data).and_then(|()| {
            std::fs::rename(&temp_path, path).map_err(|e| KeyplanError::OutputError {
                message: format!("Failed to rename temporary file: {}", e),
            })
        });

        if result.is_err() {
            if let Err(e) = std::fs::remove_file(&temp_path) {
                debug!("Could not remove {}: {}", temp_path.display(), e);
            }
        }
        result
    }

    fn write_to_file(&self, path: &Path, data: &[u8]) -> KeyplanResult<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)
            .map_err(|e| KeyplanError::OutputError {
                message: format!("Failed to open {} for writing: {}", path.display(), e),
            })?;

        file.write_all(data).map_err(|e| KeyplanError::OutputError {
            message: format!("Failed to write data: {}", e),
        })?;
        file.sync_all()?;

        Ok(())
    }

    fn create_temp_path(&self, final_path: &Path) -> KeyplanResult<PathBuf> {
        let filename = final_path
            .file_name()
            .ok_or_else(|| KeyplanError::OutputError {
                message: format!("Invalid output file path: {}", final_path.display()),
            })?;

        let temp_filename = format!(".tmp_{}", filename.to_string_lossy());
        Ok(final_path.with_file_name(temp_filename))
    }

    fn ensure_output_directory(&self, path: &Path) -> KeyplanResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| KeyplanError::OutputError {
                message: format!("Failed to create output directory: {}", e),
            })?;
        }
        Ok(())
    }
}

impl Default for ConfigWriter {
    fn default() -> Self {
        Self::new()
    }
}
