use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::io::{self, Write};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use osprefs::app::{self, Host};
use osprefs::cli::Cli;
use osprefs::config::Config;
use osprefs::core::VERSION;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let result = match app::load(&cli) {
        Ok(config) => {
            init_logging(&config)?;
            info!("Starting osprefs v{}", VERSION);

            // Unlocked handles: dry-run echo and log lines share them
            app::execute(
                &cli,
                &config,
                Host::system(),
                &mut io::stdout(),
                &mut io::stderr(),
            )
            .await
        }
        Err(e) => Err(e),
    };

    if let Err(e) = &result {
        if e.is_fatal() {
            // Logging may not be set up yet
            if writeln!(io::stderr(), "osprefs: {}", e).is_err() {
                error!("{}", e);
            }
        }
    }
    Ok(ExitCode::from(app::exit_status(&result)))
}

fn init_logging(config: &Config) -> Result<()> {
    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .context("Invalid log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logging: {}", e))
}
