//! Configuration for the cosmic stage effects.
//!
//! Settings for the meteor pool, the orbital cluster field and the headless
//! simulation host. Persists to disk as RON, accepts CLI overrides via clap
//! and can detect on-disk changes for hot reload.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{ClusterConfig, Config, DebugConfig, MeteorConfig, SimulationConfig};
pub use error::ConfigError;
