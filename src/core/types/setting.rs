//! Setting, privilege and run-option types

use super::PrefValue;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Shared global namespace of the preference store
pub const GLOBAL_DOMAIN: &str = "NSGlobalDomain";

/// Pseudo-domain routed to `systemsetup` instead of `defaults`
pub const SYSTEMSETUP_DOMAIN: &str = "systemsetup";

/// A single declarative preference write
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Setting {
    pub domain: String,
    pub key: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub requires_elevation: bool,
    pub value: PrefValue,
}

impl Setting {
    /// Creates a setting that any user may apply
    pub fn new(
        domain: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<PrefValue>,
    ) -> Self {
        Setting {
            domain: domain.into(),
            key: key.into(),
            value: value.into(),
            requires_elevation: false,
        }
    }

    /// Creates a setting that is only applied when running elevated
    pub fn elevated(
        domain: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<PrefValue>,
    ) -> Self {
        Setting {
            requires_elevation: true,
            ..Setting::new(domain, key, value)
        }
    }

    /// Identifies the setting by domain and key
    pub fn id(&self) -> SettingId {
        SettingId {
            domain: self.domain.clone(),
            key: self.key.clone(),
        }
    }
}

impl fmt::Display for Setting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.domain,
            self.key,
            self.value.value_type().defaults_flag(),
            self.value
        )?;
        if self.requires_elevation {
            write!(f, " (elevated)")?;
        }
        Ok(())
    }
}

/// Domain/key pair identifying a setting in reports
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SettingId {
    pub domain: String,
    pub key: String,
}

impl fmt::Display for SettingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.domain, self.key)
    }
}

/// Process-wide elevation, established once at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrivilegeState {
    Elevated,
    NotElevated,
}

impl PrivilegeState {
    pub fn is_elevated(&self) -> bool {
        matches!(self, PrivilegeState::Elevated)
    }

    /// Whether a setting may be attempted under this state
    pub fn permits(&self, setting: &Setting) -> bool {
        !setting.requires_elevation || self.is_elevated()
    }
}

/// Ordered, duplicate-free list of applications restarted after applying
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct RestartSet {
    apps: Vec<String>,
}

impl RestartSet {
    pub fn new<I, S>(apps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = RestartSet::default();
        for app in apps {
            set.insert(app);
        }
        set
    }

    /// Appends an application, ignoring duplicates. Returns whether it was added.
    pub fn insert(&mut self, app: impl Into<String>) -> bool {
        let app = app.into();
        if self.apps.contains(&app) {
            return false;
        }
        self.apps.push(app);
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.apps.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.apps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }
}

impl From<Vec<String>> for RestartSet {
    fn from(apps: Vec<String>) -> Self {
        RestartSet::new(apps)
    }
}

impl From<RestartSet> for Vec<String> {
    fn from(set: RestartSet) -> Self {
        set.apps
    }
}

/// Options controlling a single run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Skip the restart phase entirely
    pub skip_restart: bool,
    /// Write into an in-memory store and never touch the system
    pub dry_run: bool,
    /// Apply settings concurrently
    pub parallel: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setting_constructors() {
        let s = Setting::new("com.apple.dock", "tilesize", 36i64);
        assert!(!s.requires_elevation);
        assert_eq!(s.value, PrefValue::Int(36));

        let s = Setting::elevated(SYSTEMSETUP_DOMAIN, "restartfreeze", true);
        assert!(s.requires_elevation);
    }

    #[test]
    fn test_setting_display() {
        let s = Setting::new("com.apple.finder", "ShowPathbar", true);
        assert_eq!(s.to_string(), "com.apple.finder ShowPathbar -bool true");

        let s = Setting::elevated(SYSTEMSETUP_DOMAIN, "restartfreeze", true);
        assert!(s.to_string().ends_with("(elevated)"));
    }

    #[test]
    fn test_setting_id() {
        let s = Setting::new(GLOBAL_DOMAIN, "KeyRepeat", 2i64);
        assert_eq!(s.id().to_string(), "NSGlobalDomain:KeyRepeat");
    }

    #[test]
    fn test_privilege_permits() {
        let plain = Setting::new("com.apple.dock", "autohide", true);
        let gated = Setting::elevated(SYSTEMSETUP_DOMAIN, "restartfreeze", true);

        assert!(PrivilegeState::Elevated.permits(&plain));
        assert!(PrivilegeState::Elevated.permits(&gated));
        assert!(PrivilegeState::NotElevated.permits(&plain));
        assert!(!PrivilegeState::NotElevated.permits(&gated));
    }

    #[test]
    fn test_restart_set_dedup_and_order() {
        let set = RestartSet::new(["Finder", "Dock", "Finder", "SystemUIServer"]);
        let apps: Vec<&str> = set.iter().collect();
        assert_eq!(apps, vec!["Finder", "Dock", "SystemUIServer"]);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_setting_toml_roundtrip_skips_default_flag() {
        let s = Setting::new("com.apple.dock", "tilesize", 36i64);
        let serialized = toml::to_string(&s).unwrap();
        assert!(!serialized.contains("requires_elevation"));

        let parsed: Setting = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed, s);
    }

    #[test]
    fn test_run_options_default() {
        let options = RunOptions::default();
        assert!(!options.skip_restart);
        assert!(!options.dry_run);
        assert!(!options.parallel);
    }
}
