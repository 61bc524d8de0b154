//! The binary entry point for the cosmic stage simulator.

use clap::Parser;
use cosmic_app::{AppDirs, run};
use cosmic_config::{CliArgs, Config};
use tracing::{error, info};

fn main() {
    let args = CliArgs::parse();

    let dirs = match AppDirs::resolve(args.config.as_deref()) {
        Ok(dirs) => dirs,
        Err(e) => {
            cosmic_log::init_logging(None, false, None);
            error!("Failed to resolve directories: {e}");
            std::process::exit(1);
        }
    };

    let mut config = match Config::load_or_create(&dirs.config_dir) {
        Ok(config) => config,
        Err(e) => {
            cosmic_log::init_logging(None, false, None);
            error!("Failed to load config from {}: {e}", dirs.config_dir.display());
            std::process::exit(1);
        }
    };
    config.apply_cli_overrides(&args);
    if let Err(e) = config.validate() {
        cosmic_log::init_logging(None, false, None);
        error!("Rejected command-line overrides: {e}");
        std::process::exit(1);
    }

    cosmic_log::init_logging(
        Some(&dirs.log_dir),
        cfg!(debug_assertions),
        Some(&config),
    );
    info!(
        config = %dirs.config_dir.display(),
        frames = config.simulation.frames,
        fps = config.simulation.fps,
        "Cosmic stage starting"
    );

    let summary = run(&config);
    info!(
        frames = summary.frames,
        updates = summary.updates,
        seconds = summary.simulated_seconds,
        nodes = summary.nodes,
        effects = summary.effects,
        "Simulation finished"
    );
}
