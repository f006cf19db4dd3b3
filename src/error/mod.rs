//! Error handling module for Keyplan

use thiserror::Error;

/// Main error type for Keyplan operations
#[derive(Error, Debug)]
pub enum KeyplanError {
    /// Input file not found or inaccessible
    #[error("Input file not found: {path}")]
    InputFileNotFound { path: String },

    /// Scene analysis document does not have the expected structure
    #[error("Malformed scene analysis in {path}: {message}")]
    InputMalformed { path: String, message: String },

    /// Configuration value outside of its domain
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Output file write error
    #[error("Failed to write output file: {message}")]
    OutputError { message: String },

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl KeyplanError {
    /// Process exit code used when this error terminates the binary
    pub fn exit_code(&self) -> u8 {
        match self {
            KeyplanError::InputMalformed { .. } => 3,
            KeyplanError::InvalidConfig { .. } => 2,
            _ => 1,
        }
    }
}

/// Result type alias for Keyplan operations
pub type KeyplanResult<T> = std::result::Result<T, KeyplanError>;
