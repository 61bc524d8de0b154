//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const APP_NAME: &str = "cosmic-stage";
const CONFIG_FILE: &str = "config.ron";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Meteor pool settings.
    pub meteors: MeteorConfig,
    /// Orbital cluster field settings.
    pub clusters: ClusterConfig,
    /// Headless simulation host settings.
    pub simulation: SimulationConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Meteor pool configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MeteorConfig {
    /// Create the meteor pool at startup.
    pub enabled: bool,
    /// Fixed number of pooled meteors.
    pub count: usize,
    /// Horizontal spawn extent. Meteors spawn within `±0.7 * spawn_bounds`
    /// and are recycled beyond `2.2 * spawn_bounds` from the origin.
    pub spawn_bounds: f32,
    /// Meteors falling below this height are recycled.
    pub despawn_y: f32,
    /// Shortest lifetime in seconds.
    pub min_lifetime: f32,
    /// Longest lifetime in seconds.
    pub max_lifetime: f32,
    /// Slowest travel speed in units per second.
    pub min_speed: f32,
    /// Fastest travel speed in units per second.
    pub max_speed: f32,
    /// Edge length of the generated sprite texture in pixels.
    pub texture_size: u32,
}

/// Orbital cluster field configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClusterConfig {
    /// Create the cluster field at startup.
    pub enabled: bool,
    /// Number of clusters to scatter.
    pub count: usize,
    /// Minimum distance between two cluster origins.
    pub min_spacing: f32,
    /// Full edge length of the placement volume (the vertical extent is 35% of this).
    pub bounds: f32,
    /// Rejection sampling budget per cluster.
    pub max_attempts: u32,
    /// Number of points in each central body.
    pub core_particles: usize,
    /// Radius of the central body point cloud.
    pub core_radius: f32,
    /// Number of points in each orbit ring.
    pub orbit_segments: usize,
    /// Edge length of the generated sprite texture in pixels.
    pub texture_size: u32,
}

/// Headless simulation host configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of frames to simulate.
    pub frames: u32,
    /// Simulated frame rate.
    pub fps: u32,
    /// Log a summary every N frames (0 disables periodic summaries).
    pub summary_interval: u32,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for MeteorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            count: 120,
            spawn_bounds: 520.0,
            despawn_y: -120.0,
            min_lifetime: 2.4,
            max_lifetime: 5.2,
            min_speed: 67.5,
            max_speed: 232.5,
            texture_size: 128,
        }
    }
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            count: 128,
            min_spacing: 540.0,
            bounds: 4800.0,
            max_attempts: 6000,
            core_particles: 5200,
            core_radius: 90.0,
            orbit_segments: 2000,
            texture_size: 64,
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            frames: 600,
            fps: 60,
            summary_interval: 60,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl SimulationConfig {
    /// Seconds per simulated frame. A zero frame rate is treated as 1 Hz.
    pub fn frame_delta(&self) -> f64 {
        1.0 / f64::from(self.fps.max(1))
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Platform configuration directory for this application.
    pub fn default_dir() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|base| base.join(APP_NAME))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            config.validate()?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join(CONFIG_FILE);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Reject settings the effects cannot sample from.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let m = &self.meteors;
        ordered_range("meteors.lifetime", m.min_lifetime, m.max_lifetime)?;
        ordered_range("meteors.speed", m.min_speed, m.max_speed)?;
        if m.min_lifetime <= 0.0 {
            return Err(invalid("meteors.min_lifetime", "must be positive"));
        }
        if m.spawn_bounds <= 0.0 {
            return Err(invalid("meteors.spawn_bounds", "must be positive"));
        }

        let c = &self.clusters;
        if c.bounds <= 0.0 {
            return Err(invalid("clusters.bounds", "must be positive"));
        }
        if c.min_spacing < 0.0 {
            return Err(invalid("clusters.min_spacing", "must not be negative"));
        }
        if c.core_radius < 0.0 {
            return Err(invalid("clusters.core_radius", "must not be negative"));
        }
        if m.texture_size == 0 || c.texture_size == 0 {
            return Err(invalid("texture_size", "must be at least one pixel"));
        }
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
        new_config.validate()?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}

fn invalid(field: &'static str, reason: &'static str) -> ConfigError {
    ConfigError::Invalid { field, reason }
}

fn ordered_range(field: &'static str, min: f32, max: f32) -> Result<(), ConfigError> {
    if min <= max {
        Ok(())
    } else {
        Err(invalid(field, "minimum exceeds maximum"))
    }
}
