//! Centralized configuration loading from config.toml.
//!
//! This crate provides the configuration structs and loading logic used by
//! the drafter binary, and turns the league section into a validated
//! [`draft_core::SlotModel`] and [`draft_core::PickOrder`].
//!
//! # Configuration Priority
//!
//! Settings are loaded with the following priority (highest to lowest):
//! 1. Environment variables (`DRAFTER_<SECTION>_<KEY>`)
//! 2. config.toml file
//! 3. Built-in defaults (config.defaults.toml, compiled in)
//!
//! # Environment Variable Override Pattern
//!
//! ```text
//! DRAFTER_<SECTION>_<KEY>=value
//!
//! Examples:
//!     DRAFTER_COMMON_PLAYERS_CSV=projections_2024.csv
//!     DRAFTER_DRAFT_TEAMS=12
//!     DRAFTER_SEARCH_THINK_TIME_SECS=30
//!     DRAFTER_SEARCH_SEED=7
//! ```

mod defaults;
mod loader;
mod structs;

pub use defaults::*;
pub use loader::{
    apply_env_overrides, load_config, load_from_path, parse_config, ConfigError,
    CONFIG_SEARCH_PATHS,
};
pub use structs::*;

#[cfg(test)]
mod tests;
