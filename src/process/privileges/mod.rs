//! Privilege detection and the background elevation refresher

pub mod checker;
pub mod keeper;

pub use checker::{ElevationRefresher, PrivilegeChecker, PrivilegeProbe, SudoRefresher};
pub use keeper::{KeeperOptions, PrivilegeKeeper, PrivilegeSession, RefreshHandle, ADVISORY};
