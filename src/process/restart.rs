//! Restart coordinator: terminates applications so they reload preferences

use crate::core::types::{
    PrefsError, PrefsResult, RestartReport, RestartSet, RunOptions, TerminateOutcome,
};
use std::process::{Command, Stdio};
use tracing::{debug, info, warn};

/// Terminates a running application by name
pub trait ProcessTerminator: Send + Sync {
    /// Returns `Ok(false)` when no process with that name is running
    fn terminate(&self, app: &str) -> PrefsResult<bool>;
}

/// Terminates applications with `killall`
#[derive(Debug, Clone, Copy, Default)]
pub struct KillallTerminator;

impl ProcessTerminator for KillallTerminator {
    fn terminate(&self, app: &str) -> PrefsResult<bool> {
        let output = Command::new("killall")
            .arg(app)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| PrefsError::termination_failed(app, format!("killall: {}", e)))?;

        if output.status.success() {
            return Ok(true);
        }

        // killall exits 1 when nothing matched
        let stderr = String::from_utf8_lossy(&output.stderr);
        let nothing_matched = stderr.trim().is_empty() || stderr.contains("No matching processes");
        if output.status.code() == Some(1) && nothing_matched {
            return Ok(false);
        }

        Err(PrefsError::termination_failed(app, stderr.trim().to_string()))
    }
}

/// Signals every application in a `RestartSet` unless restart is suppressed
pub struct RestartCoordinator<T: ProcessTerminator> {
    terminator: T,
}

impl<T: ProcessTerminator> RestartCoordinator<T> {
    pub fn new(terminator: T) -> Self {
        RestartCoordinator { terminator }
    }

    pub fn terminator(&self) -> &T {
        &self.terminator
    }

    /// Terminates each application once, in listed order. Returns `None` when
    /// `options.skip_restart` is set and nothing was signalled.
    pub fn restart_if_requested(
        &self,
        options: &RunOptions,
        restart_set: &RestartSet,
    ) -> Option<RestartReport> {
        if options.skip_restart {
            info!("Restart skipped");
            return None;
        }

        let mut report = RestartReport::default();
        for app in restart_set.iter() {
            let outcome = match self.terminator.terminate(app) {
                Ok(true) => {
                    debug!("Terminated {}", app);
                    TerminateOutcome::Terminated
                }
                Ok(false) => {
                    debug!("{} is not running", app);
                    TerminateOutcome::NotRunning
                }
                Err(e) => {
                    warn!("{}", e);
                    TerminateOutcome::Failed(e.to_string())
                }
            };
            report.record(app, outcome);
        }
        Some(report)
    }
}

impl Default for RestartCoordinator<KillallTerminator> {
    fn default() -> Self {
        Self::new(KillallTerminator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<String>>,
    }

    impl ProcessTerminator for Recorder {
        fn terminate(&self, app: &str) -> PrefsResult<bool> {
            self.calls.lock().unwrap().push(app.to_string());
            match app {
                "Ghost" => Ok(false),
                "Locked" => Err(PrefsError::termination_failed(app, "not permitted")),
                _ => Ok(true),
            }
        }
    }

    #[test]
    fn test_skip_restart_sends_nothing() {
        let coordinator = RestartCoordinator::new(Recorder::default());
        let options = RunOptions {
            skip_restart: true,
            ..RunOptions::default()
        };
        let set = RestartSet::new(["Dock", "Finder"]);
        let report = coordinator.restart_if_requested(&options, &set);

        assert!(report.is_none());
        assert!(coordinator.terminator().calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_each_app_signalled_once_in_order() {
        let coordinator = RestartCoordinator::new(Recorder::default());
        let set = RestartSet::new(["Dock", "Finder", "Dock", "SystemUIServer"]);
        let report = coordinator
            .restart_if_requested(&RunOptions::default(), &set)
            .unwrap();

        let calls = coordinator.terminator().calls.lock().unwrap().clone();
        assert_eq!(calls, vec!["Dock", "Finder", "SystemUIServer"]);
        assert_eq!(report.terminated(), 3);
    }

    #[test]
    fn test_not_running_and_failures_do_not_stop() {
        let coordinator = RestartCoordinator::new(Recorder::default());
        let set = RestartSet::new(["Ghost", "Locked", "Dock"]);
        let report = coordinator
            .restart_if_requested(&RunOptions::default(), &set)
            .unwrap();

        assert_eq!(report.not_running(), 1);
        assert_eq!(report.terminated(), 1);
        assert_eq!(report.failures().count(), 1);
        assert_eq!(coordinator.terminator().calls.lock().unwrap().len(), 3);
    }
}
