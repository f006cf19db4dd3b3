//! Keyplan CLI
//!
//! Scene-aware forced keyframe planner for GOP encoders.
//!
//! # Usage
//!
//! ```bash
//! keyplan episode01.json
//! keyplan episode01.json -g 240 --mixed --no-config
//! keyplan episode01.json --config keyplan.toml -vv --json
//! ```

use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use tracing::info;

use keyplan_cli::cli::{commands, Cli};
use keyplan_cli::error::KeyplanError;
use keyplan_cli::utils::logging::{LoggingConfig, LoggingSystem, Verbosity};

/// Exit code used when no input was given
const USAGE_EXIT_CODE: u8 = 2;

/// Main entry point for the Keyplan application
fn main() -> ExitCode {
    let cli = Cli::parse();

    let logging = LoggingSystem::new(LoggingConfig {
        verbosity: Verbosity::from_occurrences(cli.verbose),
        format: cli.log_format,
    });
    if let Err(e) = logging.initialize() {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let Some(input) = cli.input.clone() else {
        eprintln!("{}", Cli::command().render_help());
        return ExitCode::from(USAGE_EXIT_CODE);
    };

    info!("Starting Keyplan");

    match commands::plan(&input, &cli) {
        Ok(()) => {
            info!("Keyplan completed successfully");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error: {:#}", err);
            let code = err
                .downcast_ref::<KeyplanError>()
                .map_or(1, KeyplanError::exit_code);
            ExitCode::from(code)
        }
    }
}
