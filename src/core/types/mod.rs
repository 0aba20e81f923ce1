//! Core type definitions for osprefs
//!
//! This module contains the fundamental types used throughout the application:
//! typed preference values, settings, privilege state, run options, phase
//! reports and error types.

mod error;
mod report;
mod setting;
mod value;

// Re-export all public types
pub use error::{PrefsError, PrefsResult};
pub use report::{ApplyResult, RestartReport, RunReport, SettingFailure, TerminateOutcome};
pub use setting::{
    PrivilegeState, RestartSet, RunOptions, Setting, SettingId, GLOBAL_DOMAIN, SYSTEMSETUP_DOMAIN,
};
pub use value::{PrefValue, ValueType};
