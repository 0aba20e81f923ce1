//! Command-line surface

use crate::config::Config;
use crate::core::types::RunOptions;
use clap::Parser;
use std::path::PathBuf;

/// Apply a fixed set of macOS preferences and restart the affected apps
#[derive(Debug, Parser)]
#[command(name = "osprefs", version, about)]
pub struct Cli {
    /// Do not restart Dock, Finder and the other affected applications
    #[arg(long)]
    pub no_restart: bool,

    /// Print the writes that would be made without touching the system
    #[arg(long)]
    pub dry_run: bool,

    /// Apply settings concurrently
    #[arg(long)]
    pub parallel: bool,

    /// Configuration file (default: ~/.config/osprefs/config.toml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// List the configured settings and restart set, then exit
    #[arg(long)]
    pub list: bool,

    /// Print the run report as JSON on stdout; messages go to stderr
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Run options from the flags, with config-file fallbacks
    pub fn run_options(&self, config: &Config) -> RunOptions {
        RunOptions {
            skip_restart: self.no_restart,
            dry_run: self.dry_run,
            parallel: self.parallel || config.apply.parallel,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_flags() {
        let cli = Cli::try_parse_from(["osprefs"]).unwrap();
        let options = cli.run_options(&Config::default());
        assert_eq!(options, RunOptions::default());
    }

    #[test]
    fn test_no_restart() {
        let cli = Cli::try_parse_from(["osprefs", "--no-restart"]).unwrap();
        assert!(cli.run_options(&Config::default()).skip_restart);
    }

    #[test]
    fn test_parallel_from_config() {
        let cli = Cli::try_parse_from(["osprefs"]).unwrap();
        let mut config = Config::default();
        config.apply.parallel = true;
        assert!(cli.run_options(&config).parallel);
    }

    #[test]
    fn test_unknown_flag_rejected() {
        assert!(Cli::try_parse_from(["osprefs", "--frobnicate"]).is_err());
    }

    #[test]
    fn test_config_path() {
        let cli = Cli::try_parse_from(["osprefs", "--config", "/tmp/prefs.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/prefs.toml")));
    }
}
