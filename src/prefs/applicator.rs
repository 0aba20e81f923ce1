//! Applies an ordered list of settings to a preference store

use super::PreferenceStore;
use crate::core::types::{ApplyResult, PrefsError, PrefsResult, PrivilegeState, Setting};
use rayon::prelude::*;
use tracing::{debug, info, warn};

/// Outcome of one setting, before it is folded into an `ApplyResult`
enum Outcome {
    Applied,
    Skipped,
    Failed(String),
}

/// Applies settings one key at a time, recording failures and continuing
pub struct PreferenceApplicator<S: PreferenceStore> {
    store: S,
    max_threads: usize,
}

impl<S: PreferenceStore> PreferenceApplicator<S> {
    /// Create a new applicator over `store`
    pub fn new(store: S) -> Self {
        PreferenceApplicator {
            store,
            max_threads: num_cpus::get().min(8),
        }
    }

    /// Limit the worker count used by `apply_all_parallel`
    pub fn with_max_threads(mut self, max_threads: usize) -> Self {
        self.max_threads = max_threads.max(1);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Apply every setting in order.
    ///
    /// Elevation-gated settings are skipped without touching the store when
    /// `state` is not elevated. A store error is recorded and does not stop
    /// the remaining settings.
    pub fn apply_all(&self, settings: &[Setting], state: PrivilegeState) -> ApplyResult {
        let outcomes = settings.iter().map(|setting| self.apply_one(setting, state));
        Self::collect(settings, outcomes)
    }

    /// Same contract as `apply_all`, but writes run concurrently. Lists in the
    /// result keep the configured order.
    pub fn apply_all_parallel(&self, settings: &[Setting], state: PrivilegeState) -> ApplyResult {
        let pool = match rayon::ThreadPoolBuilder::new()
            .num_threads(self.max_threads)
            .build()
        {
            Ok(pool) => pool,
            Err(e) => {
                warn!("Could not build apply thread pool ({}), applying sequentially", e);
                return self.apply_all(settings, state);
            }
        };

        let outcomes: Vec<Outcome> = pool.install(|| {
            settings
                .par_iter()
                .map(|setting| self.apply_one(setting, state))
                .collect()
        });
        Self::collect(settings, outcomes)
    }

    /// Apply a single setting, honouring the privilege state.
    ///
    /// A gated setting under `NotElevated` yields
    /// `PrefsError::PrivilegeInsufficient` and never reaches the store.
    pub fn apply_setting(&self, setting: &Setting, state: PrivilegeState) -> PrefsResult<()> {
        if !state.permits(setting) {
            return Err(PrefsError::PrivilegeInsufficient(format!(
                "{} requires elevation",
                setting.id()
            )));
        }
        self.store.write(&setting.domain, &setting.key, &setting.value)
    }

    fn apply_one(&self, setting: &Setting, state: PrivilegeState) -> Outcome {
        match self.apply_setting(setting, state) {
            Ok(()) => {
                debug!(store = self.store.name(), "applied {}", setting);
                Outcome::Applied
            }
            Err(PrefsError::PrivilegeInsufficient(reason)) => {
                info!("Skipping: {}", reason);
                Outcome::Skipped
            }
            Err(e) => {
                warn!("{}", e);
                Outcome::Failed(e.to_string())
            }
        }
    }

    fn collect(settings: &[Setting], outcomes: impl IntoIterator<Item = Outcome>) -> ApplyResult {
        let mut result = ApplyResult::new();
        for (setting, outcome) in settings.iter().zip(outcomes) {
            match outcome {
                Outcome::Applied => result.record_applied(),
                Outcome::Skipped => result.record_skipped(setting.id()),
                Outcome::Failed(reason) => result.record_failed(setting.id(), reason),
            }
        }
        result
    }
}
