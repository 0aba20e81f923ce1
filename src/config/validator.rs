//! Configuration validator for osprefs
//!
//! Validates configuration values and user-supplied settings before a run.

use super::loader::{
    ApplyConfig, Config, ConfigError, LoggingConfig, PrivilegeConfig, RestartConfig,
};
use super::ConfigResult;
use crate::core::types::{PrefValue, PrefsError, PrefsResult, Setting, SYSTEMSETUP_DOMAIN};
use std::collections::HashSet;

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates the entire configuration.
    ///
    /// Section problems surface as `PrefsError::Config`, malformed settings as
    /// `PrefsError::InvalidSetting`.
    pub fn validate(config: &Config) -> PrefsResult<()> {
        Self::validate_apply(&config.apply)?;
        Self::validate_privilege(&config.privilege)?;
        Self::validate_restart(&config.restart)?;
        Self::validate_logging(&config.logging)?;
        Self::validate_settings(&config.settings)?;
        Ok(())
    }

    fn validate_apply(apply: &ApplyConfig) -> ConfigResult<()> {
        if apply.max_threads == 0 {
            return Err(ConfigError::Invalid(
                "Apply threads must be at least 1".to_string(),
            ));
        }

        if apply.max_threads > 128 {
            return Err(ConfigError::Invalid(
                "Apply threads cannot exceed 128".to_string(),
            ));
        }

        Ok(())
    }

    fn validate_privilege(privilege: &PrivilegeConfig) -> ConfigResult<()> {
        if privilege.refresh_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "Privilege refresh interval must be at least 1 second".to_string(),
            ));
        }

        // sudo's default timestamp_timeout is 5 minutes
        if privilege.refresh_interval_secs > 300 {
            return Err(ConfigError::Invalid(
                "Privilege refresh interval cannot exceed 300 seconds".to_string(),
            ));
        }

        if privilege.shutdown_grace_ms == 0 {
            return Err(ConfigError::Invalid(
                "Refresher shutdown grace must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    fn validate_restart(restart: &RestartConfig) -> ConfigResult<()> {
        if let Some(app) = restart.apps.iter().find(|app| app.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "Restart application name cannot be empty: {:?}",
                app
            )));
        }
        Ok(())
    }

    fn validate_logging(logging: &LoggingConfig) -> ConfigResult<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::Invalid(format!(
                "Invalid log level: {}. Must be one of: {:?}",
                logging.level, valid_levels
            )));
        }
        Ok(())
    }

    fn validate_settings(settings: &[Setting]) -> PrefsResult<()> {
        let mut seen = HashSet::new();
        for setting in settings {
            Self::validate_setting(setting)?;
            if !seen.insert(setting.id()) {
                return Err(PrefsError::InvalidSetting(format!(
                    "Duplicate setting: {}",
                    setting.id()
                )));
            }
        }
        Ok(())
    }

    /// Validates the shape of a single setting. Whether the store accepts the
    /// domain or key is only known when writing.
    pub fn validate_setting(setting: &Setting) -> PrefsResult<()> {
        if setting.domain.trim().is_empty() {
            return Err(PrefsError::InvalidSetting(format!(
                "Setting domain cannot be empty (key {:?})",
                setting.key
            )));
        }

        if setting.key.trim().is_empty() {
            return Err(PrefsError::InvalidSetting(format!(
                "Setting key cannot be empty (domain {:?})",
                setting.domain
            )));
        }

        if setting.domain.contains(char::is_whitespace) {
            return Err(PrefsError::InvalidSetting(format!(
                "Setting domain cannot contain whitespace: {:?}",
                setting.domain
            )));
        }

        if let PrefValue::Float(v) = setting.value {
            if !v.is_finite() {
                return Err(PrefsError::InvalidSetting(format!(
                    "Setting {} has a non-finite float value",
                    setting.id()
                )));
            }
        }

        if setting.domain == SYSTEMSETUP_DOMAIN {
            if !setting.requires_elevation {
                return Err(PrefsError::InvalidSetting(format!(
                    "Setting {} must be marked requires_elevation",
                    setting.id()
                )));
            }
            if setting.value.as_switch().is_none() {
                return Err(PrefsError::InvalidSetting(format!(
                    "Setting {} must have a bool value",
                    setting.id()
                )));
            }
        }

        Ok(())
    }
}

/// Validates a configuration
pub fn validate_config(config: &Config) -> PrefsResult<()> {
    ConfigValidator::validate(config)
}
