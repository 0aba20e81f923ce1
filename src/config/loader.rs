//! Configuration loader for osprefs
//!
//! Handles loading configuration from TOML files and merging with defaults.

use super::defaults::{default_config, default_settings};
use super::ConfigResult;
use crate::core::types::{PrefsResult, RestartSet, Setting};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_apply")]
    pub apply: ApplyConfig,

    #[serde(default = "default_privilege")]
    pub privilege: PrivilegeConfig,

    #[serde(default = "default_restart")]
    pub restart: RestartConfig,

    #[serde(default = "default_logging")]
    pub logging: LoggingConfig,

    /// Extra settings; an entry with the same domain/key as a built-in replaces it
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub settings: Vec<Setting>,
}

/// Apply-phase configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyConfig {
    #[serde(default = "default_include_builtin")]
    pub include_builtin: bool,
    #[serde(default = "default_parallel")]
    pub parallel: bool,
    #[serde(default = "default_max_threads")]
    pub max_threads: usize,
}

/// Privilege keeper configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrivilegeConfig {
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
    #[serde(default = "default_shutdown_grace_ms")]
    pub shutdown_grace_ms: u64,
}

impl PrivilegeConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_millis(self.shutdown_grace_ms)
    }
}

/// Restart configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestartConfig {
    #[serde(default = "default_restart_apps")]
    pub apps: Vec<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Config {
    /// Resolves the full ordered settings list for this run
    pub fn resolve_settings(&self, home: &Path) -> PrefsResult<Vec<Setting>> {
        let mut settings = if self.apply.include_builtin {
            default_settings(home)?
        } else {
            Vec::new()
        };

        for extra in &self.settings {
            match settings
                .iter_mut()
                .find(|s| s.domain == extra.domain && s.key == extra.key)
            {
                Some(existing) => *existing = extra.clone(),
                None => settings.push(extra.clone()),
            }
        }
        Ok(settings)
    }

    pub fn restart_set(&self) -> RestartSet {
        RestartSet::new(self.restart.apps.iter().cloned())
    }
}

/// Configuration loader
pub struct ConfigLoader {
    config_path: PathBuf,
}

impl ConfigLoader {
    /// Creates a new configuration loader
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        ConfigLoader {
            config_path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Loads configuration from file
    pub fn load(&self) -> ConfigResult<Config> {
        if !self.config_path.exists() {
            return Err(ConfigError::FileNotFound(
                self.config_path.display().to_string(),
            ));
        }

        let contents = fs::read_to_string(&self.config_path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Loads configuration, falling back to defaults only when the file is absent.
    /// A file that exists but does not parse is still an error.
    pub fn load_or_default(&self) -> ConfigResult<Config> {
        match self.load() {
            Err(ConfigError::FileNotFound(_)) => Ok(Config::default()),
            other => other,
        }
    }

    /// Saves configuration to file
    pub fn save(&self, config: &Config) -> ConfigResult<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(config)?;
        fs::write(&self.config_path, contents)?;
        Ok(())
    }
}

/// Default config location: `~/.config/osprefs/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join("osprefs").join("config.toml"))
}

/// Loads configuration from the default location
pub fn load_config() -> ConfigResult<Config> {
    match default_config_path() {
        Some(path) => ConfigLoader::new(path).load_or_default(),
        None => Ok(Config::default()),
    }
}

// Default functions for serde
fn default_apply() -> ApplyConfig {
    let defaults = default_config();
    ApplyConfig {
        include_builtin: defaults.apply.include_builtin,
        parallel: defaults.apply.parallel,
        max_threads: defaults.apply.max_threads,
    }
}

fn default_privilege() -> PrivilegeConfig {
    let defaults = default_config();
    PrivilegeConfig {
        refresh_interval_secs: defaults.privilege.refresh_interval_secs,
        shutdown_grace_ms: defaults.privilege.shutdown_grace_ms,
    }
}

fn default_restart() -> RestartConfig {
    RestartConfig {
        apps: default_restart_apps(),
    }
}

fn default_logging() -> LoggingConfig {
    LoggingConfig {
        level: default_log_level(),
    }
}

// Individual field defaults
fn default_include_builtin() -> bool {
    default_config().apply.include_builtin
}

fn default_parallel() -> bool {
    default_config().apply.parallel
}

fn default_max_threads() -> usize {
    default_config().apply.max_threads
}

fn default_refresh_interval_secs() -> u64 {
    default_config().privilege.refresh_interval_secs
}

fn default_shutdown_grace_ms() -> u64 {
    default_config().privilege.shutdown_grace_ms
}

fn default_restart_apps() -> Vec<String> {
    default_config().restart.apps
}

fn default_log_level() -> String {
    default_config().logging.level
}

impl Default for Config {
    fn default() -> Self {
        Config {
            apply: default_apply(),
            privilege: default_privilege(),
            restart: default_restart(),
            logging: default_logging(),
            settings: Vec::new(),
        }
    }
}
