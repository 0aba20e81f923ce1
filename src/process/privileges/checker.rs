//! Privilege checking utilities

use std::process::{Command, Stdio};
use tracing::debug;

/// Reads the effective privilege level of the running process
pub trait PrivilegeProbe: Send + Sync {
    fn is_elevated(&self) -> bool;
}

/// Re-validates cached elevation so later privileged calls do not prompt
pub trait ElevationRefresher: Send + Sync {
    /// Returns whether the cached elevation is still valid
    fn refresh(&self) -> bool;
}

/// Checks privileges for the current process
#[derive(Debug, Clone, Copy, Default)]
pub struct PrivilegeChecker;

impl PrivilegeChecker {
    /// Check if the current process is running as root
    #[cfg(unix)]
    pub fn is_elevated() -> bool {
        // SAFETY: geteuid has no preconditions and cannot fail
        unsafe { libc::geteuid() == 0 }
    }

    #[cfg(not(unix))]
    pub fn is_elevated() -> bool {
        false
    }
}

impl PrivilegeProbe for PrivilegeChecker {
    fn is_elevated(&self) -> bool {
        PrivilegeChecker::is_elevated()
    }
}

/// Refreshes the sudo timestamp with `sudo -n true`, never prompting
#[derive(Debug, Clone, Copy, Default)]
pub struct SudoRefresher;

impl ElevationRefresher for SudoRefresher {
    fn refresh(&self) -> bool {
        match Command::new("sudo")
            .args(["-n", "true"])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
        {
            Ok(status) => status.success(),
            Err(e) => {
                debug!("sudo refresh failed to start: {}", e);
                false
            }
        }
    }
}
