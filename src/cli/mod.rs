//! CLI module for Keyplan
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::utils::logging::LogFormat;

pub mod args;
pub mod commands;

/// Keyplan forced-keyframe planner
///
/// Reads a per-frame scene analysis and prints a `ForceKeyFrames` line whose GOPs
/// follow scene cuts while staying close to the target GOP size.
#[derive(Parser, Debug)]
#[command(name = "keyplan")]
#[command(about = "Keyplan - scene-aware forced keyframe planning for GOP encoders")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Scene analysis JSON with frame_count, scene_changes and scores
    pub input: Option<PathBuf>,

    /// Increase diagnostic output on stderr (-v basic, -vv verbose)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Diagnostic log format
    #[arg(long, value_enum, default_value_t = LogFormat::Text, env = "KEYPLAN_LOG_FORMAT")]
    pub log_format: LogFormat,

    #[command(flatten)]
    pub planner: args::PlannerArgs,

    #[command(flatten)]
    pub output: args::OutputArgs,
}
