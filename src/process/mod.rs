//! Process-level concerns: privilege detection and application restart
//!
//! This module provides the privilege keeper, which establishes the run's
//! `PrivilegeState` and keeps elevation alive, and the restart coordinator,
//! which terminates applications so they pick up new preferences.

pub mod privileges;
pub mod restart;

pub use privileges::{
    ElevationRefresher, KeeperOptions, PrivilegeChecker, PrivilegeKeeper, PrivilegeProbe,
    PrivilegeSession, RefreshHandle, SudoRefresher, ADVISORY,
};
pub use restart::{KillallTerminator, ProcessTerminator, RestartCoordinator};
