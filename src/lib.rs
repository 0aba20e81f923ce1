//! osprefs: declarative macOS preference applicator
//!
//! A run checks elevation once, applies an ordered list of independent
//! settings to the preference store, and then restarts the applications that
//! cache those preferences.

pub mod app;
pub mod cli;
pub mod config;
pub mod core;
pub mod prefs;
pub mod process;
pub mod runner;

// Re-export main types from core module
pub use crate::core::types::{
    ApplyResult, PrefValue, PrefsError, PrefsResult, PrivilegeState, RestartReport, RestartSet,
    RunOptions, RunReport, Setting, SettingId, TerminateOutcome, ValueType,
};

pub use runner::{RunPhase, Runner};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_module_accessible() {
        let _authors = crate::core::AUTHORS;
        assert_eq!(crate::core::VERSION, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_setting_reexport() {
        let setting = Setting::new("com.apple.dock", "autohide", true);
        assert_eq!(setting.value.value_type(), ValueType::Bool);
        assert_eq!(setting.id().to_string(), "com.apple.dock:autohide");
    }

    #[test]
    fn test_pref_value_reexport() {
        assert_eq!(PrefValue::Int(2).value_type(), ValueType::Int);
        assert_eq!(PrefValue::Float(0.5).value_type(), ValueType::Float);
        assert_eq!(PrefValue::from("png").value_type(), ValueType::String);
    }

    #[test]
    fn test_prefs_error_reexport() {
        let error = PrefsError::write_failed("com.apple.dock", "tilesize", "refused");
        assert!(error.to_string().contains("Failed to write"));

        let result: PrefsResult<u32> = Err(PrefsError::InvalidSetting("x".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_run_options_reexport() {
        let options = RunOptions {
            skip_restart: true,
            ..RunOptions::default()
        };
        assert!(options.skip_restart);
        assert!(!PrivilegeState::NotElevated.is_elevated());
    }
}
