//! Preference store backed by the macOS `defaults` command

use super::PreferenceStore;
use crate::core::types::{PrefValue, PrefsError, PrefsResult, SYSTEMSETUP_DOMAIN};
use std::process::{Command, Output};
use tracing::debug;

const DEFAULTS_BIN: &str = "defaults";
const SYSTEMSETUP_BIN: &str = "systemsetup";

/// Writes settings with `defaults write`. The `systemsetup` pseudo-domain is
/// routed to `systemsetup -set<key> on|off`.
#[derive(Debug, Clone, Default)]
pub struct DefaultsStore;

impl DefaultsStore {
    pub fn new() -> Self {
        DefaultsStore
    }

    /// Builds the program and arguments for one write
    pub fn command_line(
        domain: &str,
        key: &str,
        value: &PrefValue,
    ) -> PrefsResult<(&'static str, Vec<String>)> {
        if domain == SYSTEMSETUP_DOMAIN {
            let switch = value.as_switch().ok_or_else(|| {
                PrefsError::write_failed(domain, key, "systemsetup only accepts bool values")
            })?;
            return Ok((
                SYSTEMSETUP_BIN,
                vec![format!("-set{}", key), switch.to_string()],
            ));
        }

        Ok((
            DEFAULTS_BIN,
            vec![
                "write".to_string(),
                domain.to_string(),
                key.to_string(),
                value.value_type().defaults_flag().to_string(),
                value.to_arg(),
            ],
        ))
    }
}

fn check_output(domain: &str, key: &str, output: Output) -> PrefsResult<()> {
    if output.status.success() {
        return Ok(());
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    let reason = match stderr.trim() {
        "" => format!("{}", output.status),
        msg => msg.to_string(),
    };
    Err(PrefsError::write_failed(domain, key, reason))
}

impl PreferenceStore for DefaultsStore {
    fn write(&self, domain: &str, key: &str, value: &PrefValue) -> PrefsResult<()> {
        let (program, args) = Self::command_line(domain, key, value)?;
        debug!(program, ?args, "writing preference");

        let output = Command::new(program)
            .args(&args)
            .output()
            .map_err(|e| PrefsError::write_failed(domain, key, format!("{}: {}", program, e)))?;

        check_output(domain, key, output)
    }

    fn name(&self) -> &'static str {
        "defaults"
    }
}
