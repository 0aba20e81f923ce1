//! Configuration module for osprefs
//!
//! Provides configuration loading, validation, the default settings catalog
//! and the default restart set.

mod defaults;
mod loader;
mod validator;

pub use defaults::{default_config, default_restart_set, default_settings, ConfigDefaults};
pub use loader::{
    default_config_path, load_config, ApplyConfig, ConfigLoader, LoggingConfig, PrivilegeConfig,
    RestartConfig,
};
pub use validator::{validate_config, ConfigValidator};

// Re-export the main configuration structure
pub use loader::Config;

// Configuration-related error type
pub use loader::ConfigError;

// Configuration result type
pub type ConfigResult<T> = Result<T, ConfigError>;
