//! Configuration loading logic.
//!
//! Handles loading config from files and applying environment variable overrides.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::DraftConfig;

/// Standard locations to search for config.toml
pub const CONFIG_SEARCH_PATHS: &[&str] = &[
    "config.toml",    // Current directory
    "../config.toml", // Parent directory (when running from subdirectory)
];

/// Errors that can occur while loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Load the drafter configuration.
///
/// Searches for config.toml in the following order:
/// 1. Path specified by DRAFTER_CONFIG environment variable
/// 2. Current directory (config.toml)
/// 3. Parent directory (../config.toml)
///
/// When no file exists the built-in defaults are used. A file that exists
/// but cannot be read or parsed is an error. Environment variable overrides
/// are applied last.
pub fn load_config() -> Result<DraftConfig, ConfigError> {
    // Check for explicit config path
    if let Ok(path) = std::env::var("DRAFTER_CONFIG") {
        let path = PathBuf::from(&path);
        if path.exists() {
            info!("Loading config from DRAFTER_CONFIG: {}", path.display());
            return load_from_path(&path);
        }
        warn!(
            "DRAFTER_CONFIG={} not found, searching defaults",
            path.display()
        );
    }

    // Search default locations
    for path_str in CONFIG_SEARCH_PATHS {
        let path = PathBuf::from(path_str);
        if path.exists() {
            info!("Loading config from {}", path.display());
            return load_from_path(&path);
        }
    }

    // Fall back to defaults
    debug!("No config.toml found, using built-in defaults");
    Ok(apply_env_overrides(DraftConfig::default()))
}

/// Load configuration from a specific path.
pub fn load_from_path(path: &Path) -> Result<DraftConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_config(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(
        teams = config.draft.teams,
        slots = config.draft.slots.len(),
        trades = config.draft.trades.len(),
        "Configuration parsed"
    );
    Ok(apply_env_overrides(config))
}

/// Parse configuration text without applying overrides.
pub fn parse_config(content: &str) -> Result<DraftConfig, toml::de::Error> {
    toml::from_str(content)
}

/// Macro to reduce env override boilerplate
macro_rules! env_override {
    // String field
    ($config:expr, $section:ident . $field:ident, $key:expr) => {
        if let Ok(v) = std::env::var($key) {
            $config.$section.$field = v;
        }
    };
    // Parseable field (usize, f64, etc.)
    ($config:expr, $section:ident . $field:ident, $key:expr, parse) => {
        if let Ok(v) =
            std::env::var($key).and_then(|s| s.parse().map_err(|_| std::env::VarError::NotPresent))
        {
            $config.$section.$field = v;
        }
    };
    // Optional parseable field (Option<u64>, etc.)
    ($config:expr, $section:ident . $field:ident, $key:expr, optional_parse) => {
        if let Ok(v) =
            std::env::var($key).and_then(|s| s.parse().map_err(|_| std::env::VarError::NotPresent))
        {
            $config.$section.$field = Some(v);
        }
    };
}

/// Apply environment variable overrides to a configuration.
///
/// Environment variables follow the pattern: DRAFTER_<SECTION>_<KEY>.
/// Slots and trades are structured and can only be set in config.toml.
pub fn apply_env_overrides(mut config: DraftConfig) -> DraftConfig {
    // Common
    env_override!(config, common.log_level, "DRAFTER_COMMON_LOG_LEVEL");
    env_override!(config, common.players_csv, "DRAFTER_COMMON_PLAYERS_CSV");

    // Draft
    env_override!(config, draft.teams, "DRAFTER_DRAFT_TEAMS", parse);

    // Search
    env_override!(
        config,
        search.think_time_secs,
        "DRAFTER_SEARCH_THINK_TIME_SECS",
        parse
    );
    env_override!(
        config,
        search.exploration,
        "DRAFTER_SEARCH_EXPLORATION",
        parse
    );
    env_override!(config, search.seed, "DRAFTER_SEARCH_SEED", optional_parse);

    config
}
