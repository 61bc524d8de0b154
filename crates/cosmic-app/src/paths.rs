//! Per-user paths for config and logs.

use std::path::{Path, PathBuf};

use cosmic_config::{Config, ConfigError};

const APP_NAME: &str = "cosmic-stage";

/// Where the simulator reads its config and writes its logs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppDirs {
    /// Holds `config.ron`.
    pub config_dir: PathBuf,
    pub log_dir: PathBuf,
}

impl AppDirs {
    /// Resolve OS directories. `config_override` replaces the config location
    /// and moves the logs next to it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoConfigDir`] if no override is given and the OS
    /// does not expose a configuration directory.
    pub fn resolve(config_override: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(dir) = config_override {
            return Ok(Self::resolve_with_root(dir));
        }

        let config_dir = Config::default_dir()?;
        let log_dir = dirs::data_local_dir()
            .map(|base| base.join(APP_NAME).join("logs"))
            .unwrap_or_else(|| config_dir.join("logs"));
        Ok(Self {
            config_dir,
            log_dir,
        })
    }

    /// Directories rooted at `root`, for tests and explicit `--config` paths.
    pub fn resolve_with_root(root: &Path) -> Self {
        Self {
            config_dir: root.to_path_buf(),
            log_dir: root.join("logs"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_keeps_logs_beside_config() {
        let dirs = AppDirs::resolve(Some(Path::new("/tmp/cosmic-test"))).unwrap();
        assert_eq!(dirs.config_dir, PathBuf::from("/tmp/cosmic-test"));
        assert_eq!(dirs.log_dir, PathBuf::from("/tmp/cosmic-test/logs"));
    }

    #[test]
    fn test_default_dirs_are_app_scoped() {
        // Some CI sandboxes have no home directory at all.
        if let Ok(dirs) = AppDirs::resolve(None) {
            assert!(dirs.config_dir.ends_with(APP_NAME));
            assert!(dirs.log_dir.ends_with("logs"));
        }
    }
}
