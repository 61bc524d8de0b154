//! Headless cosmic stage simulator.
//!
//! Loads the config, brings the effects up on an in-memory stage and drives
//! them with a fixed-step clock.

pub mod frame_clock;
pub mod paths;
pub mod simulation;

pub use frame_clock::FrameClock;
pub use paths::AppDirs;
pub use simulation::{RunSummary, run, run_with};
