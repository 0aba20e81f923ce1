//! Core module containing fundamental types for osprefs
//!
//! This module provides the foundational building blocks used throughout
//! the tool, including preference values, settings, privilege state,
//! phase reports, and error types.

pub mod types;

// Re-export commonly used types for convenience
pub use types::{
    ApplyResult, PrefValue, PrefsError, PrefsResult, PrivilegeState, RestartSet, RunOptions,
    RunReport, Setting,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const AUTHORS: &str = env!("CARGO_PKG_AUTHORS");
