//! Custom error types for osprefs

use crate::config::ConfigError;
use thiserror::Error;

/// Main error type for preference operations
#[derive(Error, Debug)]
pub enum PrefsError {
    #[error("Insufficient privileges: {0}")]
    PrivilegeInsufficient(String),

    #[error("Failed to write {domain}:{key}: {reason}")]
    PreferenceWriteFailure {
        domain: String,
        key: String,
        reason: String,
    },

    #[error("Unable to read execution environment: {0}")]
    StartupEnvironmentFailure(String),

    #[error("Failed to terminate {app}: {reason}")]
    ProcessTerminationFailure { app: String, reason: String },

    #[error("Invalid setting: {0}")]
    InvalidSetting(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for preference operations
pub type PrefsResult<T> = Result<T, PrefsError>;

impl PrefsError {
    /// Creates a write failure error
    pub fn write_failed(
        domain: impl Into<String>,
        key: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        PrefsError::PreferenceWriteFailure {
            domain: domain.into(),
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Creates a termination failure error
    pub fn termination_failed(app: impl Into<String>, reason: impl Into<String>) -> Self {
        PrefsError::ProcessTerminationFailure {
            app: app.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error ends the process with a non-zero status.
    /// Only startup problems qualify; everything else is reported and the run continues.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            PrefsError::StartupEnvironmentFailure(_)
                | PrefsError::Config(_)
                | PrefsError::InvalidSetting(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PrefsError::write_failed("com.apple.dock", "tilesize", "exit status 1");
        assert_eq!(
            err.to_string(),
            "Failed to write com.apple.dock:tilesize: exit status 1"
        );

        let err = PrefsError::termination_failed("Dock", "signal refused");
        assert_eq!(err.to_string(), "Failed to terminate Dock: signal refused");
    }

    #[test]
    fn test_all_error_variants() {
        let errors: Vec<(PrefsError, &str)> = vec![
            (
                PrefsError::PrivilegeInsufficient("root required".to_string()),
                "Insufficient privileges: root required",
            ),
            (
                PrefsError::StartupEnvironmentFailure("no home directory".to_string()),
                "Unable to read execution environment: no home directory",
            ),
            (
                PrefsError::InvalidSetting("empty key".to_string()),
                "Invalid setting: empty key",
            ),
        ];

        for (error, expected) in errors {
            assert_eq!(error.to_string(), expected);
        }
    }

    #[test]
    fn test_fatality() {
        assert!(PrefsError::StartupEnvironmentFailure("x".to_string()).is_fatal());
        assert!(PrefsError::Config(ConfigError::Invalid("x".to_string())).is_fatal());
        assert!(PrefsError::InvalidSetting("x".to_string()).is_fatal());
        assert!(!PrefsError::write_failed("d", "k", "r").is_fatal());
        assert!(!PrefsError::PrivilegeInsufficient("x".to_string()).is_fatal());
        assert!(!PrefsError::termination_failed("Dock", "r").is_fatal());
        assert!(!PrefsError::Io(std::io::Error::from(std::io::ErrorKind::BrokenPipe)).is_fatal());
    }

    #[test]
    fn test_from_implementations() {
        use std::io;

        let io_err = io::Error::new(io::ErrorKind::NotFound, "defaults");
        let err: PrefsError = io_err.into();
        assert!(matches!(err, PrefsError::Io(_)));

        let config_err = ConfigError::Invalid("bad".to_string());
        let err: PrefsError = config_err.into();
        assert!(matches!(err, PrefsError::Config(_)));
    }
}
