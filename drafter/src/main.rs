//! Drafter - Monte Carlo Tree Search draft assistant
//!
//! A command-line tool that:
//! 1. Loads the league shape from config.toml and candidate projections from CSV
//! 2. Replays a saved pick history to restore the live draft
//! 3. Recommends picks with a time-boxed MCTS, or records picks as they happen

use std::io::Write;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

mod config;
mod drafter;

use crate::config::{central_config, Command, Config};
use crate::drafter::Drafter;

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    Ok(())
}

fn run(config: &Config, out: &mut impl Write) -> Result<()> {
    let central = central_config()?;
    let mut drafter = Drafter::new(config, central)?;

    match &config.command {
        Command::Think => drafter.think(out),
        Command::Sim => drafter.sim(out),
        Command::Pick { name } => drafter.pick(name, out),
        Command::Undo => drafter.undo(out),
        Command::Pool { slot, limit } => drafter.pool(slot, *limit, out),
        Command::Roster { team } => drafter.roster(*team, out),
    }
}

fn main() -> Result<()> {
    // Parse configuration
    let config = Config::parse();

    // Validate configuration
    config.validate()?;

    // Initialize tracing
    init_tracing(&config.log_level)?;
    info!(log_level = %config.log_level, "Tracing initialized");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match run(&config, &mut out) {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("Drafter failed: {:#}", e);
            Err(e)
        }
    }
}
