//! Run orchestration: INIT -> APPLY -> RESTART -> DONE
//!
//! Each phase runs exactly once and in order. There is no retry and no
//! rollback; per-setting and per-application failures are collected into the
//! returned `RunReport` instead of aborting the run.

use crate::core::types::{RestartSet, RunOptions, RunReport, Setting};
use crate::prefs::{PreferenceApplicator, PreferenceStore};
use crate::process::{PrivilegeKeeper, ProcessTerminator, RestartCoordinator};
use std::fmt;
use std::io::Write;
use tracing::{debug, info};

/// Phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RunPhase {
    Init,
    Apply,
    Restart,
    Done,
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunPhase::Init => "init",
            RunPhase::Apply => "apply",
            RunPhase::Restart => "restart",
            RunPhase::Done => "done",
        };
        f.write_str(name)
    }
}

/// Wires the privilege keeper, applicator and restart coordinator together
pub struct Runner<S: PreferenceStore, T: ProcessTerminator> {
    keeper: PrivilegeKeeper,
    applicator: PreferenceApplicator<S>,
    restarter: RestartCoordinator<T>,
    settings: Vec<Setting>,
    restart_set: RestartSet,
    phase: RunPhase,
}

impl<S: PreferenceStore, T: ProcessTerminator> Runner<S, T> {
    pub fn new(
        keeper: PrivilegeKeeper,
        applicator: PreferenceApplicator<S>,
        restarter: RestartCoordinator<T>,
        settings: Vec<Setting>,
        restart_set: RestartSet,
    ) -> Self {
        Runner {
            keeper,
            applicator,
            restarter,
            settings,
            restart_set,
            phase: RunPhase::Init,
        }
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn keeper(&self) -> &PrivilegeKeeper {
        &self.keeper
    }

    pub fn applicator(&self) -> &PreferenceApplicator<S> {
        &self.applicator
    }

    pub fn restarter(&self) -> &RestartCoordinator<T> {
        &self.restarter
    }

    /// Runs every phase once, writing the advisory and the closing summary to `out`
    pub async fn run<W: Write>(&mut self, options: &RunOptions, out: &mut W) -> RunReport {
        self.enter(RunPhase::Init);
        let session = self.keeper.initialize(out);

        self.enter(RunPhase::Apply);
        info!(
            settings = self.settings.len(),
            parallel = options.parallel,
            "Applying settings"
        );
        let apply = if options.parallel {
            self.applicator
                .apply_all_parallel(&self.settings, session.state)
        } else {
            self.applicator.apply_all(&self.settings, session.state)
        };

        self.enter(RunPhase::Restart);
        let restart_options = RunOptions {
            skip_restart: options.skip_restart || options.dry_run,
            ..*options
        };
        let restart = self
            .restarter
            .restart_if_requested(&restart_options, &self.restart_set);

        if let Some(refresher) = session.refresher {
            refresher.shutdown().await;
        }

        self.enter(RunPhase::Done);
        let report = RunReport {
            privilege: session.state,
            apply,
            restart,
        };
        if let Err(e) = write_summary(&report, out) {
            debug!("Could not print summary: {}", e);
        }
        report
    }

    fn enter(&mut self, phase: RunPhase) {
        debug_assert!(phase >= self.phase, "phases only move forward");
        debug!(from = %self.phase, to = %phase, "phase transition");
        self.phase = phase;
    }
}

fn write_summary<W: Write>(report: &RunReport, out: &mut W) -> std::io::Result<()> {
    writeln!(out, "{}", report.summary_line())?;
    for failure in &report.apply.failed {
        writeln!(out, "  failed: {}: {}", failure.id, failure.reason)?;
    }
    if let Some(restart) = &report.restart {
        for (app, reason) in restart.failures() {
            writeln!(out, "  could not restart {}: {}", app, reason)?;
        }
    }
    Ok(())
}
