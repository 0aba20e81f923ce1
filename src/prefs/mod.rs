//! Preference store access and the settings applicator
//!
//! This module provides:
//! - The `PreferenceStore` trait, the seam between settings and the OS store
//! - `DefaultsStore`, backed by the `defaults` and `systemsetup` tools
//! - `MemoryStore`, an in-process store used for dry runs and tests
//! - `PreferenceApplicator`, which applies an ordered list of settings

pub mod applicator;
pub mod defaults_store;
pub mod memory_store;

pub use applicator::PreferenceApplicator;
pub use defaults_store::DefaultsStore;
pub use memory_store::MemoryStore;

use crate::core::types::{PrefValue, PrefsResult};

/// Common trait for preference write operations.
///
/// A write overwrites any prior value unconditionally. Implementations must be
/// safe to call from several threads at once; each call targets one key.
pub trait PreferenceStore: Send + Sync {
    /// Writes one typed value into `domain`/`key`
    fn write(&self, domain: &str, key: &str, value: &PrefValue) -> PrefsResult<()>;

    /// Short name used in log lines
    fn name(&self) -> &'static str;
}

impl<S: PreferenceStore + ?Sized> PreferenceStore for &S {
    fn write(&self, domain: &str, key: &str, value: &PrefValue) -> PrefsResult<()> {
        (**self).write(domain, key, value)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

impl<S: PreferenceStore + ?Sized> PreferenceStore for Box<S> {
    fn write(&self, domain: &str, key: &str, value: &PrefValue) -> PrefsResult<()> {
        (**self).write(domain, key, value)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
