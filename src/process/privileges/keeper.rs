//! Privilege keeper: one-time elevation check plus a cancellable refresher
//!
//! When the process is elevated, a single background task re-validates the
//! cached elevation on a fixed interval so later privileged calls in the same
//! run never prompt. The task is owned by a [`RefreshHandle`]; shutting the
//! handle down or dropping it stops the task, and being an in-process task it
//! cannot outlive the process.

use super::checker::{ElevationRefresher, PrivilegeChecker, PrivilegeProbe, SudoRefresher};
use crate::core::types::PrivilegeState;
use std::io::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, trace, warn};

/// Printed once when the process is not elevated
pub const ADVISORY: &str = "Not running with elevated rights: settings that need them will be skipped. Re-run with sudo to apply everything.";

/// Options for the privilege keeper
#[derive(Debug, Clone)]
pub struct KeeperOptions {
    /// How often the refresher re-validates elevation
    pub refresh_interval: Duration,
    /// How long `RefreshHandle::shutdown` waits before aborting the task
    pub shutdown_grace: Duration,
    /// Start the refresher when elevated. Off for dry runs.
    pub keep_alive: bool,
}

impl Default for KeeperOptions {
    fn default() -> Self {
        KeeperOptions {
            refresh_interval: Duration::from_secs(60),
            shutdown_grace: Duration::from_millis(500),
            keep_alive: true,
        }
    }
}

/// Result of initializing the keeper
pub struct PrivilegeSession {
    pub state: PrivilegeState,
    /// Present only when elevated and a runtime was available
    pub refresher: Option<RefreshHandle>,
}

/// Determines elevation once and keeps it alive for the rest of the run
pub struct PrivilegeKeeper {
    probe: Arc<dyn PrivilegeProbe>,
    refresher: Arc<dyn ElevationRefresher>,
    options: KeeperOptions,
}

impl PrivilegeKeeper {
    /// Keeper backed by the effective uid and `sudo -n true`
    pub fn new(options: KeeperOptions) -> Self {
        PrivilegeKeeper {
            probe: Arc::new(PrivilegeChecker),
            refresher: Arc::new(SudoRefresher),
            options,
        }
    }

    /// Keeper with a custom probe and refresher
    pub fn with_parts(
        probe: Arc<dyn PrivilegeProbe>,
        refresher: Arc<dyn ElevationRefresher>,
        options: KeeperOptions,
    ) -> Self {
        PrivilegeKeeper {
            probe,
            refresher,
            options,
        }
    }

    pub fn options(&self) -> &KeeperOptions {
        &self.options
    }

    /// Check elevation, writing the advisory to `out` when not elevated.
    ///
    /// Never fails: a missing runtime or an unwritable `out` only loses the
    /// refresher or the advisory.
    pub fn initialize<W: Write>(&self, out: &mut W) -> PrivilegeSession {
        if !self.probe.is_elevated() {
            warn!("Not elevated; privileged settings will be skipped");
            if let Err(e) = writeln!(out, "{}", ADVISORY) {
                debug!("Could not print advisory: {}", e);
            }
            return PrivilegeSession {
                state: PrivilegeState::NotElevated,
                refresher: None,
            };
        }

        info!("Running elevated");
        let refresher = if !self.options.keep_alive {
            None
        } else {
            match tokio::runtime::Handle::try_current() {
                Ok(runtime) => Some(RefreshHandle::spawn(
                    &runtime,
                    Arc::clone(&self.refresher),
                    self.options.clone(),
                )),
                Err(_) => {
                    warn!("No async runtime available; elevation refresher not started");
                    None
                }
            }
        };

        PrivilegeSession {
            state: PrivilegeState::Elevated,
            refresher,
        }
    }
}

/// Owns the background refresher task
pub struct RefreshHandle {
    cancel: Option<watch::Sender<bool>>,
    task: Option<JoinHandle<()>>,
    refreshes: Arc<AtomicU64>,
    grace: Duration,
}

impl RefreshHandle {
    fn spawn(
        runtime: &tokio::runtime::Handle,
        refresher: Arc<dyn ElevationRefresher>,
        options: KeeperOptions,
    ) -> Self {
        let (cancel, cancelled) = watch::channel(false);
        let refreshes = Arc::new(AtomicU64::new(0));
        let task = runtime.spawn(run_refresher(
            refresher,
            options.refresh_interval,
            cancelled,
            Arc::clone(&refreshes),
        ));
        debug!(
            interval_ms = options.refresh_interval.as_millis() as u64,
            "elevation refresher started"
        );

        RefreshHandle {
            cancel: Some(cancel),
            task: Some(task),
            refreshes,
            grace: options.shutdown_grace,
        }
    }

    /// Number of refreshes performed so far
    pub fn refresh_count(&self) -> u64 {
        self.refreshes.load(Ordering::SeqCst)
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Stops the refresher, waiting at most the grace period before aborting.
    /// Returns the total number of refreshes performed.
    pub async fn shutdown(mut self) -> u64 {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(true);
        }

        if let Some(mut task) = self.task.take() {
            if tokio::time::timeout(self.grace, &mut task).await.is_err() {
                warn!("Elevation refresher did not stop within grace period; aborting");
                task.abort();
            }
        }

        let total = self.refresh_count();
        debug!(refreshes = total, "elevation refresher stopped");
        total
    }
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(true);
        }
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn run_refresher(
    refresher: Arc<dyn ElevationRefresher>,
    interval: Duration,
    mut cancelled: watch::Receiver<bool>,
    refreshes: Arc<AtomicU64>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately; elevation was just checked.
    ticker.tick().await;

    loop {
        tokio::select! {
            biased;
            changed = cancelled.changed() => {
                if changed.is_err() || *cancelled.borrow() {
                    break;
                }
            }
            _ = ticker.tick() => {
                let refresher = Arc::clone(&refresher);
                match tokio::task::spawn_blocking(move || refresher.refresh()).await {
                    Ok(true) => trace!("elevation refreshed"),
                    Ok(false) => debug!("elevation refresh was refused"),
                    Err(e) => debug!("elevation refresh task failed: {}", e),
                }
                refreshes.fetch_add(1, Ordering::SeqCst);
            }
        }
    }
}
