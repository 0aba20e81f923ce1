//! Default configuration values and the built-in settings catalog

use crate::core::types::{
    PrefsError, PrefsResult, RestartSet, Setting, GLOBAL_DOMAIN, SYSTEMSETUP_DOMAIN,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigDefaults {
    pub apply: ApplyDefaults,
    pub privilege: PrivilegeDefaults,
    pub restart: RestartDefaults,
    pub logging: LoggingDefaults,
}

/// Default apply-phase configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyDefaults {
    pub include_builtin: bool,
    pub parallel: bool,
    pub max_threads: usize,
}

/// Default privilege keeper configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrivilegeDefaults {
    pub refresh_interval_secs: u64,
    pub shutdown_grace_ms: u64,
}

/// Default restart configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestartDefaults {
    pub apps: Vec<String>,
}

/// Default logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingDefaults {
    pub level: String,
}

/// Returns the default configuration
pub fn default_config() -> ConfigDefaults {
    ConfigDefaults {
        apply: ApplyDefaults {
            include_builtin: true,
            parallel: false,
            max_threads: num_cpus::get().min(8),
        },
        privilege: PrivilegeDefaults {
            refresh_interval_secs: 60,
            shutdown_grace_ms: 500,
        },
        restart: RestartDefaults {
            apps: default_restart_apps(),
        },
        logging: LoggingDefaults {
            level: "warn".to_string(),
        },
    }
}

fn default_restart_apps() -> Vec<String> {
    ["cfprefsd", "Dock", "Finder", "Safari", "SystemUIServer"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Applications terminated after applying, unless restart is skipped
pub fn default_restart_set() -> RestartSet {
    RestartSet::new(default_restart_apps())
}

/// The built-in settings catalog.
///
/// `home` is the user's home directory; Finder's new-window target and the
/// screenshot location are derived from it, so it must be valid UTF-8.
pub fn default_settings(home: &Path) -> PrefsResult<Vec<Setting>> {
    let home = home.to_str().ok_or_else(|| {
        PrefsError::StartupEnvironmentFailure(format!(
            "home directory is not valid UTF-8: {}",
            home.display()
        ))
    })?;
    let home = home.trim_end_matches('/');

    Ok(vec![
        // General UI
        Setting::new(GLOBAL_DOMAIN, "NSNavPanelExpandedStateForSaveMode", true),
        Setting::new(GLOBAL_DOMAIN, "NSNavPanelExpandedStateForSaveMode2", true),
        Setting::new(GLOBAL_DOMAIN, "PMPrintingExpandedStateForPrint", true),
        Setting::new(GLOBAL_DOMAIN, "PMPrintingExpandedStateForPrint2", true),
        Setting::new(GLOBAL_DOMAIN, "NSDocumentSaveNewDocumentsToCloud", false),
        Setting::new(GLOBAL_DOMAIN, "NSTextShowsControlCharacters", true),
        Setting::new(GLOBAL_DOMAIN, "NSAutomaticSpellingCorrectionEnabled", false),
        Setting::new(GLOBAL_DOMAIN, "NSAutomaticQuoteSubstitutionEnabled", false),
        Setting::new(GLOBAL_DOMAIN, "NSAutomaticDashSubstitutionEnabled", false),
        Setting::new("com.apple.LaunchServices", "LSQuarantine", false),
        // Restart automatically if the computer freezes
        Setting::elevated(SYSTEMSETUP_DOMAIN, "restartfreeze", true),
        // Trackpad, mouse, keyboard
        Setting::new("com.apple.driver.AppleBluetoothMultitouch.trackpad", "Clicking", true),
        Setting::new(GLOBAL_DOMAIN, "com.apple.mouse.tapBehavior", 1i64),
        Setting::new(GLOBAL_DOMAIN, "AppleKeyboardUIMode", 3i64),
        Setting::new(GLOBAL_DOMAIN, "ApplePressAndHoldEnabled", false),
        Setting::new(GLOBAL_DOMAIN, "KeyRepeat", 2i64),
        Setting::new(GLOBAL_DOMAIN, "InitialKeyRepeat", 15i64),
        // Screen
        Setting::new("com.apple.screensaver", "askForPassword", 1i64),
        Setting::new("com.apple.screensaver", "askForPasswordDelay", 0i64),
        Setting::new("com.apple.screencapture", "location", format!("{home}/Desktop")),
        Setting::new("com.apple.screencapture", "type", "png"),
        Setting::new("com.apple.screencapture", "disable-shadow", true),
        // Finder
        Setting::new("com.apple.finder", "NewWindowTarget", "PfLo"),
        Setting::new("com.apple.finder", "NewWindowTargetPath", format!("file://{home}/")),
        Setting::new("com.apple.finder", "AppleShowAllFiles", true),
        Setting::new(GLOBAL_DOMAIN, "AppleShowAllExtensions", true),
        Setting::new("com.apple.finder", "ShowStatusBar", true),
        Setting::new("com.apple.finder", "ShowPathbar", true),
        Setting::new("com.apple.finder", "_FXShowPosixPathInTitle", true),
        Setting::new("com.apple.finder", "FXDefaultSearchScope", "SCcf"),
        Setting::new("com.apple.finder", "FXEnableExtensionChangeWarning", false),
        Setting::new("com.apple.finder", "FXPreferredViewStyle", "Nlsv"),
        Setting::new("com.apple.desktopservices", "DSDontWriteNetworkStores", true),
        Setting::new("com.apple.desktopservices", "DSDontWriteUSBStores", true),
        // Dock
        Setting::new("com.apple.dock", "tilesize", 36i64),
        Setting::new("com.apple.dock", "minimize-to-application", true),
        Setting::new("com.apple.dock", "show-process-indicators", true),
        Setting::new("com.apple.dock", "autohide", true),
        Setting::new("com.apple.dock", "autohide-delay", 0.0f64),
        Setting::new("com.apple.dock", "autohide-time-modifier", 0.5f64),
        Setting::new("com.apple.dock", "show-recents", false),
        // Safari developer tools
        Setting::new("com.apple.Safari", "IncludeDevelopMenu", true),
        Setting::new("com.apple.Safari", "WebKitDeveloperExtrasEnabledPreferenceKey", true),
        Setting::new(
            "com.apple.Safari",
            "com.apple.Safari.ContentPageGroupIdentifier.WebKit2DeveloperExtrasEnabled",
            true,
        ),
        Setting::new(GLOBAL_DOMAIN, "WebKitDeveloperExtras", true),
        // App Store and software update
        Setting::new("com.apple.appstore", "WebKitDeveloperExtras", true),
        Setting::new("com.apple.appstore", "ShowDebugMenu", true),
        Setting::new("com.apple.SoftwareUpdate", "AutomaticCheckEnabled", true),
        Setting::new("com.apple.SoftwareUpdate", "ScheduleFrequency", 1i64),
        Setting::new("com.apple.SoftwareUpdate", "AutomaticDownload", 1i64),
        Setting::new("com.apple.commerce", "AutoUpdate", true),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::PrefValue;
    use std::collections::HashSet;
    use std::path::PathBuf;

    #[test]
    fn test_default_config() {
        let config = default_config();
        assert_eq!(config.privilege.refresh_interval_secs, 60);
        assert!(config.apply.include_builtin);
        assert!(!config.apply.parallel);
    }

    #[test]
    fn test_apply_defaults() {
        let config = default_config();
        assert!(config.apply.max_threads > 0);
        assert!(config.apply.max_threads <= 8);
    }

    #[test]
    fn test_restart_defaults() {
        let set = default_restart_set();
        let apps: Vec<&str> = set.iter().collect();
        assert!(apps.contains(&"Finder"));
        assert!(apps.contains(&"Dock"));
        assert_eq!(apps.len(), default_config().restart.apps.len());
    }

    #[test]
    fn test_exactly_one_elevated_setting() {
        let settings = default_settings(&PathBuf::from("/Users/test")).unwrap();
        let elevated: Vec<_> = settings.iter().filter(|s| s.requires_elevation).collect();
        assert_eq!(elevated.len(), 1);
        assert_eq!(elevated[0].domain, SYSTEMSETUP_DOMAIN);
        assert_eq!(elevated[0].key, "restartfreeze");
    }

    #[test]
    fn test_catalog_keys_unique() {
        let settings = default_settings(&PathBuf::from("/Users/test")).unwrap();
        let ids: HashSet<_> = settings.iter().map(|s| s.id()).collect();
        assert_eq!(ids.len(), settings.len());
    }

    #[test]
    fn test_home_derived_values() {
        let settings = default_settings(&PathBuf::from("/Users/test/")).unwrap();
        let target = settings
            .iter()
            .find(|s| s.key == "NewWindowTargetPath")
            .unwrap();
        assert_eq!(target.value, PrefValue::from("file:///Users/test/"));

        let location = settings.iter().find(|s| s.key == "location").unwrap();
        assert_eq!(location.value, PrefValue::from("/Users/test/Desktop"));
    }

    #[test]
    fn test_serialization() {
        let config = default_config();
        let serialized = toml::to_string(&config).unwrap();
        assert!(serialized.contains("refresh_interval_secs"));

        let deserialized: ConfigDefaults = toml::from_str(&serialized).unwrap();
        assert_eq!(deserialized.restart.apps, config.restart.apps);
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_home_rejected() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let home = Path::new(OsStr::from_bytes(b"/Users/t\xffst"));
        let err = default_settings(home).unwrap_err();
        assert!(matches!(err, PrefsError::StartupEnvironmentFailure(_)));
        assert!(err.is_fatal());
    }
}
