//! Headless simulation run: bootstrap the effects on an in-memory stage and
//! drive them for a fixed number of frames.

use cosmic_config::Config;
use cosmic_effects::{Bootstrap, FamilyStatus, FrameTime, HeadlessStage};
use tracing::{info, warn};

use crate::frame_clock::FrameClock;

/// What a run did, for the final log line and for tests.
#[derive(Clone, Debug, PartialEq)]
pub struct RunSummary {
    pub frames: u64,
    pub updates: u64,
    pub simulated_seconds: f64,
    pub meteors: FamilyStatus,
    pub clusters: FamilyStatus,
    pub nodes: usize,
    pub effects: usize,
}

/// Run with effects seeded from OS entropy.
pub fn run(config: &Config) -> RunSummary {
    run_with(config, Bootstrap::new(config.clone()))
}

/// Run with a caller-supplied bootstrap.
pub fn run_with(config: &Config, mut bootstrap: Bootstrap) -> RunSummary {
    let mut stage = HeadlessStage::new();

    // The host is not ready until the stage exists; mirror that ordering.
    bootstrap.start(None);
    let (meteors, clusters) = match bootstrap.on_ready(&mut stage) {
        Some(report) => (report.meteors.clone(), report.clusters.clone()),
        None => (FamilyStatus::Disabled, FamilyStatus::Disabled),
    };
    for (family, status) in [("meteors", &meteors), ("clusters", &clusters)] {
        match status {
            FamilyStatus::Started => info!(family, "effect started"),
            FamilyStatus::Disabled => info!(family, "effect disabled"),
            FamilyStatus::Unavailable(reason) => warn!(family, %reason, "effect unavailable"),
        }
    }

    let sim = &config.simulation;
    let mut clock = FrameClock::new(sim.frame_delta());
    let frame_time = clock.step();
    let interval = u64::from(sim.summary_interval);

    for _ in 0..sim.frames {
        clock.advance(frame_time, |delta, elapsed| {
            stage.advance(FrameTime::new(elapsed as f32, delta as f32));
        });

        if interval > 0 && clock.frame_count() % interval == 0 {
            info!(
                frame = clock.frame_count(),
                elapsed = clock.total_sim_time(),
                nodes = stage.node_count(),
                "frame summary"
            );
        }
    }

    RunSummary {
        frames: clock.frame_count(),
        updates: clock.update_count(),
        simulated_seconds: clock.total_sim_time(),
        meteors,
        clusters,
        nodes: stage.node_count(),
        effects: stage.effect_count(),
    }
}
