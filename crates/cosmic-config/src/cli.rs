//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Cosmic stage command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug)]
#[command(name = "cosmic-stage", about = "Headless meteor and orbital cluster simulation")]
pub struct CliArgs {
    /// Number of pooled meteors (0 disables the meteor pool).
    #[arg(long)]
    pub meteors: Option<usize>,

    /// Number of orbital clusters (0 disables the cluster field).
    #[arg(long)]
    pub clusters: Option<usize>,

    /// Number of frames to simulate.
    #[arg(long)]
    pub frames: Option<u32>,

    /// Simulated frame rate.
    #[arg(long)]
    pub fps: Option<u32>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(count) = args.meteors {
            self.meteors.count = count;
            self.meteors.enabled = count > 0;
        }
        if let Some(count) = args.clusters {
            self.clusters.count = count;
            self.clusters.enabled = count > 0;
        }
        if let Some(frames) = args.frames {
            self.simulation.frames = frames;
        }
        if let Some(fps) = args.fps {
            self.simulation.fps = fps;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
