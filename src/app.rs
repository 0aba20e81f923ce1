//! Binary wiring: turns flags, configuration and the host into a run

use crate::cli::Cli;
use crate::config::{load_config, validate_config, Config, ConfigLoader};
use crate::core::types::{PrefsError, PrefsResult, RunOptions, RunReport};
use crate::prefs::{DefaultsStore, MemoryStore, PreferenceApplicator, PreferenceStore};
use crate::process::{
    ElevationRefresher, KeeperOptions, KillallTerminator, PrivilegeChecker, PrivilegeKeeper,
    PrivilegeProbe, ProcessTerminator, RestartCoordinator, SudoRefresher,
};
use crate::runner::Runner;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Runner over whichever store the flags selected
pub type AppRunner<T> = Runner<Box<dyn PreferenceStore>, T>;

/// Everything a run reads from or acts on outside the process
pub struct Host<T: ProcessTerminator> {
    pub home: Option<PathBuf>,
    pub probe: Arc<dyn PrivilegeProbe>,
    pub refresher: Arc<dyn ElevationRefresher>,
    pub terminator: T,
    /// Receives the would-write lines of a dry run
    pub echo: Box<dyn Write + Send>,
}

impl Host<KillallTerminator> {
    /// The real machine: effective uid, `sudo`, `killall`, stdout
    pub fn system() -> Self {
        Host {
            home: dirs::home_dir(),
            probe: Arc::new(PrivilegeChecker),
            refresher: Arc::new(SudoRefresher),
            terminator: KillallTerminator,
            echo: Box::new(io::stdout()),
        }
    }
}

/// Loads the configuration named by `--config`, or the default one, and
/// validates it
pub fn load(cli: &Cli) -> PrefsResult<Config> {
    let config = match &cli.config {
        Some(path) => ConfigLoader::new(path).load()?,
        None => load_config()?,
    };
    validate_config(&config)?;
    Ok(config)
}

/// Keeper options for a run. Dry runs never keep elevation alive.
pub fn keeper_options(config: &Config, options: &RunOptions) -> KeeperOptions {
    KeeperOptions {
        refresh_interval: config.privilege.refresh_interval(),
        shutdown_grace: config.privilege.shutdown_grace(),
        keep_alive: !options.dry_run,
    }
}

/// Builds the runner: the real store normally, an in-memory one for dry runs.
/// `--json` keeps stdout for the report, so a JSON dry run does not echo.
pub fn build_runner<T: ProcessTerminator>(
    cli: &Cli,
    config: &Config,
    host: Host<T>,
) -> PrefsResult<AppRunner<T>> {
    let home = host.home.ok_or_else(|| {
        PrefsError::StartupEnvironmentFailure("home directory is not available".to_string())
    })?;
    let settings = config.resolve_settings(&home)?;
    let options = cli.run_options(config);

    let keeper = PrivilegeKeeper::with_parts(
        host.probe,
        host.refresher,
        keeper_options(config, &options),
    );
    let store: Box<dyn PreferenceStore> = match (options.dry_run, cli.json) {
        (false, _) => Box::new(DefaultsStore::new()),
        (true, true) => Box::new(MemoryStore::new()),
        (true, false) => Box::new(MemoryStore::echoing_to(host.echo)),
    };
    let applicator = PreferenceApplicator::new(store).with_max_threads(config.apply.max_threads);

    Ok(Runner::new(
        keeper,
        applicator,
        RestartCoordinator::new(host.terminator),
        settings,
        config.restart_set(),
    ))
}

/// Runs the command described by `cli`. Returns `None` for `--list`.
///
/// With `--json` the advisory and summary go to `stderr` and `stdout` carries
/// only the report.
pub async fn execute<T, O, E>(
    cli: &Cli,
    config: &Config,
    host: Host<T>,
    stdout: &mut O,
    stderr: &mut E,
) -> PrefsResult<Option<RunReport>>
where
    T: ProcessTerminator,
    O: Write,
    E: Write,
{
    if cli.list {
        let home = host.home.as_deref().ok_or_else(|| {
            PrefsError::StartupEnvironmentFailure("home directory is not available".to_string())
        })?;
        for setting in config.resolve_settings(home)? {
            writeln!(stdout, "{}", setting)?;
        }
        let restart_set = config.restart_set();
        writeln!(stdout, "restart: {}", restart_set.iter().collect::<Vec<_>>().join(", "))?;
        return Ok(None);
    }

    let options = cli.run_options(config);
    let mut runner = build_runner(cli, config, host)?;

    let report = if cli.json {
        let report = runner.run(&options, stderr).await;
        let json = serde_json::to_string_pretty(&report).map_err(io::Error::from)?;
        writeln!(stdout, "{}", json)?;
        report
    } else {
        runner.run(&options, stdout).await
    };
    Ok(Some(report))
}

/// Process exit status for a finished command: non-zero only for startup
/// failures, never for per-setting or per-application failures
pub fn exit_status<T>(result: &PrefsResult<T>) -> u8 {
    match result {
        Ok(_) => 0,
        Err(e) if e.is_fatal() => 1,
        Err(e) => {
            debug!("Non-fatal error at exit: {}", e);
            0
        }
    }
}
