//! Command-line configuration for the drafter.
//!
//! Configuration is loaded from config.toml with environment variable overrides.
//! CLI arguments take highest priority, followed by env vars, then config.toml.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use draft_config::{load_config, ConfigError, DraftConfig};
use mcts::MctsConfig;
use once_cell::sync::Lazy;
use tracing::level_filters::LevelFilter;

// Load central config once at startup
pub static CENTRAL_CONFIG: Lazy<Result<DraftConfig, ConfigError>> = Lazy::new(load_config);

/// The loaded configuration, or an error if config.toml was unusable.
pub fn central_config() -> Result<&'static DraftConfig> {
    CENTRAL_CONFIG
        .as_ref()
        .map_err(|e| anyhow!("invalid configuration: {e}"))
}

// Default value functions that read from central config. A broken config
// file falls back to built-in defaults here and is reported by main.
fn default_players_csv() -> String {
    central_config()
        .map(|c| c.common.players_csv.clone())
        .unwrap_or_else(|_| draft_config::players_csv().into())
}

fn default_log_level() -> String {
    central_config()
        .map(|c| c.common.log_level.clone())
        .unwrap_or_else(|_| draft_config::log_level().into())
}

fn default_think_time() -> f64 {
    central_config()
        .map(|c| c.search.think_time_secs)
        .unwrap_or_else(|_| draft_config::think_time_secs())
}

fn default_exploration() -> f64 {
    central_config()
        .map(|c| c.search.exploration)
        .unwrap_or_else(|_| draft_config::exploration())
}

#[derive(Parser, Debug, Clone)]
#[command(name = "drafter")]
#[command(about = "Draft pick recommender using Monte Carlo Tree Search")]
#[command(
    long_about = "Recommends picks for a slot-constrained snake draft by running a
time-boxed Monte Carlo Tree Search over the remaining picks.

Configuration is loaded from config.toml with environment variable overrides.
CLI arguments take highest priority."
)]
pub struct Config {
    /// Candidate projections file (name,position,score rows)
    #[arg(long, global = true, default_value_t = default_players_csv())]
    pub players: String,

    /// Pick history file, one candidate id per line
    #[arg(long, global = true)]
    pub history: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value_t = default_log_level())]
    pub log_level: String,

    /// Search time per recommendation in seconds
    #[arg(long, global = true, default_value_t = default_think_time())]
    pub think_time_secs: f64,

    /// UCB1 exploration constant
    #[arg(long, global = true, default_value_t = default_exploration())]
    pub exploration: f64,

    /// Rollout seed for reproducible searches
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Recommend the next pick for the team on the clock
    Think,
    /// Let the engine make every remaining pick
    Sim,
    /// Commit a pick by candidate name and save the history
    Pick { name: String },
    /// Remove the most recent pick and save the history
    Undo,
    /// List the best available candidates for a slot
    Pool {
        /// Slot name, e.g. RB or FLEX
        slot: String,
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Show a team's roster (defaults to the team on the clock)
    Roster { team: Option<usize> },
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.players.is_empty() {
            return Err(anyhow!("players cannot be empty"));
        }

        if !self.think_time_secs.is_finite() || self.think_time_secs < 0.0 {
            return Err(anyhow!(
                "think_time_secs must be a non-negative number of seconds"
            ));
        }

        if !self.exploration.is_finite() || self.exploration < 0.0 {
            return Err(anyhow!("exploration must be a non-negative number"));
        }

        if self.log_level.parse::<LevelFilter>().is_err() {
            return Err(anyhow!(
                "invalid log level '{}', expected one of trace, debug, info, warn, error",
                self.log_level
            ));
        }

        if matches!(self.command, Command::Pick { .. } | Command::Undo) && self.history.is_none()
        {
            return Err(anyhow!("--history is required to record picks"));
        }

        Ok(())
    }

    pub fn think_time(&self) -> Duration {
        draft_config::think_time_from_secs(self.think_time_secs)
    }

    /// Search settings; the seed falls back to `[search] seed`.
    pub fn mcts_config(&self, fallback_seed: Option<u64>) -> MctsConfig {
        let config = MctsConfig::default()
            .with_think_time(self.think_time())
            .with_exploration(self.exploration);
        match self.seed.or(fallback_seed) {
            Some(seed) => config.with_seed(seed),
            None => config,
        }
    }
}
