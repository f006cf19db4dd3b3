//! Logging configuration for diagnostic output

use tracing_subscriber::EnvFilter;

/// How much diagnostic output is produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Warnings and errors only
    #[default]
    Off,
    /// Progress information
    Basic,
    /// Per-scene and per-subdivision trace
    Verbose,
}

impl Verbosity {
    /// Map a repeated `-v` count to a verbosity level
    pub fn from_occurrences(count: u8) -> Self {
        match count {
            0 => Verbosity::Off,
            1 => Verbosity::Basic,
            _ => Verbosity::Verbose,
        }
    }

    /// Default filter directive for this level
    pub fn filter(&self) -> &'static str {
        match self {
            Verbosity::Off => "warn",
            Verbosity::Basic => "info",
            Verbosity::Verbose => "debug",
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum LogFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON lines for structured logging
    Json,
}

/// Logging configuration options
#[derive(Debug, Clone, Default)]
pub struct LoggingConfig {
    pub verbosity: Verbosity,
    pub format: LogFormat,
}

/// Logging system manager
pub struct LoggingSystem {
    config: LoggingConfig,
}

impl LoggingSystem {
    /// Create a new logging system with configuration
    pub fn new(config: LoggingConfig) -> Self {
        Self { config }
    }

    /// Filter used when `RUST_LOG` is not set
    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.config.verbosity.filter()))
    }

    /// Install the global subscriber; diagnostics go to stderr
    pub fn initialize(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let builder = tracing_subscriber::fmt()
            .with_env_filter(self.env_filter())
            .with_writer(std::io::stderr)
            .with_target(false);

        match self.config.format {
            LogFormat::Text => builder.without_time().try_init()?,
            LogFormat::Json => builder.json().try_init()?,
        }

        tracing::debug!(
            "Logging system initialized with verbosity {:?}",
            self.config.verbosity
        );
        Ok(())
    }
}
