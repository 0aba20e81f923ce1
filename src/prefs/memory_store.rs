//! In-process preference store

use super::PreferenceStore;
use crate::core::types::{PrefValue, PrefsError, PrefsResult};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::io::Write;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

type EchoSink = Mutex<Box<dyn Write + Send>>;

/// Map-backed store used for dry runs and tests.
///
/// Domains listed in `rejected_domains` fail every write, standing in for the
/// OS store refusing an unknown domain.
#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<BTreeMap<(String, String), PrefValue>>,
    writes: Mutex<Vec<(String, String)>>,
    rejected_domains: HashSet<String>,
    echo: Option<EchoSink>,
}

impl fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryStore")
            .field("values", &self.values)
            .field("rejected_domains", &self.rejected_domains)
            .field("echo", &self.echo.is_some())
            .finish()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that prints each accepted write to `sink`, for `--dry-run`
    pub fn echoing_to(sink: impl Write + Send + 'static) -> Self {
        MemoryStore {
            echo: Some(Mutex::new(Box::new(sink))),
            ..Self::default()
        }
    }

    /// Makes every write into `domain` fail
    pub fn reject_domain(mut self, domain: impl Into<String>) -> Self {
        self.rejected_domains.insert(domain.into());
        self
    }

    pub fn read(&self, domain: &str, key: &str) -> Option<PrefValue> {
        self.lock_values()
            .get(&(domain.to_string(), key.to_string()))
            .cloned()
    }

    /// Current contents, ordered by domain then key
    pub fn snapshot(&self) -> BTreeMap<(String, String), PrefValue> {
        self.lock_values().clone()
    }

    /// Every accepted write, in the order it happened
    pub fn write_log(&self) -> Vec<(String, String)> {
        self.writes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn lock_values(&self) -> MutexGuard<'_, BTreeMap<(String, String), PrefValue>> {
        self.values
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Line printed for each write a dry run would make
pub fn echo_line(domain: &str, key: &str, value: &PrefValue) -> String {
    format!(
        "would write {} {} {} {}",
        domain,
        key,
        value.value_type().defaults_flag(),
        value
    )
}

impl PreferenceStore for MemoryStore {
    fn write(&self, domain: &str, key: &str, value: &PrefValue) -> PrefsResult<()> {
        if self.rejected_domains.contains(domain) {
            return Err(PrefsError::write_failed(domain, key, "domain rejected by store"));
        }

        if let Some(sink) = &self.echo {
            let mut sink = sink.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            if let Err(e) = writeln!(sink, "{}", echo_line(domain, key, value)) {
                debug!("Could not echo write: {}", e);
            }
        }

        self.lock_values()
            .insert((domain.to_string(), key.to_string()), value.clone());
        self.writes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((domain.to_string(), key.to_string()));
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
