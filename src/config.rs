use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// How a mutation reaches disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersistMode {
    /// Update memory first, then save; a failed save is only logged
    #[default]
    Optimistic,
    /// Save first and keep the new document only if that worked
    Confirmed,
}

/// Settings from `<data dir>/config.toml`. Every key is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub tick_ms: u64,
    pub timer_poll_secs: u64,
    pub persist_mode: PersistMode,
    pub backup_retention: usize,
    pub default_timebox_minutes: u32,
    pub default_focus_minutes: u32,
    pub wake_threshold_secs: u64,
    pub notifications: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            tick_ms: 250,
            timer_poll_secs: 1,
            persist_mode: PersistMode::Optimistic,
            backup_retention: 7,
            default_timebox_minutes: 25,
            default_focus_minutes: 25,
            wake_threshold_secs: 30,
            notifications: true,
        }
    }
}

impl Config {
    /// Read the config from `dir`, falling back to defaults when there is no file
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        let path = dir.join(CONFIG_FILE);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Config::default()),
            Err(source) => return Err(ConfigError::Io { path, source }),
        };
        Self::parse(&text).map_err(|source| ConfigError::Parse { path, source })
    }

    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(10))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.timer_poll_secs.max(1))
    }

    pub fn wake_threshold(&self) -> Duration {
        Duration::from_secs(self.wake_threshold_secs)
    }
}
