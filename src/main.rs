//! NW Gatherer CLI
//!
//! Locates the New World window, then either performs one debug action
//! and exits or runs the gathering strategy until Ctrl-C.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use clap::Parser;

use nw_gatherer::config::{Settings, Strategy};
use nw_gatherer::platform::{DesktopInput, DesktopScreen, DesktopWindows};
use nw_gatherer::{DebugAction, Gatherer};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Perform one debug action and exit
    #[arg(short = 't', long = "test", value_enum)]
    test: Option<DebugAction>,

    /// JSON file overriding the built-in settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Gathering strategy (overrides the settings file)
    #[arg(short, long, value_enum)]
    strategy: Option<Strategy>,

    /// Seed for reproducible randomized decisions
    #[arg(long)]
    seed: Option<u64>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    let mut settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    if let Some(strategy) = args.strategy {
        settings.strategy = strategy;
    }
    if args.seed.is_some() {
        settings.seed = args.seed;
    }

    let input = Arc::new(DesktopInput::new().context("failed to open input device")?);
    let mut gatherer = Gatherer::attach(settings, &DesktopWindows, input, Arc::new(DesktopScreen))?;

    if let Some(action) = args.test {
        log::info!("running debug action {:?}", action);
        gatherer.run_debug(action).await?;
        return Ok(());
    }

    let stop = gatherer.stop_signal();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                log::info!("shutdown signal received");
                stop.stop();
            }
            Err(e) => log::error!("failed to listen for Ctrl-C, run until killed: {}", e),
        }
    });

    gatherer.run().await?;
    log::info!("stopped");
    Ok(())
}
