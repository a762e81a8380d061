//! CLI definitions for armlink.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "armlink",
    version,
    about = "Robotic arm control client",
    infer_subcommands = true,
    after_help = "Examples:\n  armlink status\n  armlink acquire --name alice\n  armlink move wrist 120\n  armlink limit grip max 100\n  armlink release"
)]
pub struct Cli {
    /// Configuration file.
    #[arg(long, default_value = "client.toml", global = true)]
    pub config: PathBuf,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print position and bounds for every joint.
    Status,
    /// Take exclusive control of the arm.
    Acquire {
        /// Name to register as the holder (defaults to the configured
        /// operator).
        #[arg(long)]
        name: Option<String>,
    },
    /// Release exclusive control.
    Release,
    /// Move a joint to a position (requires control).
    Move {
        /// base, shoulder, wrist or grip.
        joint: String,
        /// Target position.
        pos: i32,
    },
    /// Set a joint bound (requires control).
    Limit {
        /// base, shoulder, wrist or grip.
        joint: String,
        /// min or max.
        limit: String,
        /// New bound value.
        value: i32,
    },
    /// Print the camera stream URL.
    CameraUrl,
}
