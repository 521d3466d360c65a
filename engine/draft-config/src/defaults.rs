//! Default configuration values loaded from config.defaults.toml.
//!
//! The defaults file is embedded at compile time, so a binary always has a
//! complete configuration even when no config.toml is present.

use draft_core::SlotSpec;
use once_cell::sync::Lazy;
use serde::Deserialize;

/// The embedded defaults TOML file (loaded at compile time)
const DEFAULTS_TOML: &str = include_str!("../../../config.defaults.toml");

/// Parsed defaults structure (parsed once at first use)
static DEFAULTS: Lazy<DefaultsConfig> = Lazy::new(|| {
    toml::from_str(DEFAULTS_TOML).expect("config.defaults.toml should be valid TOML")
});

// ============================================================================
// Internal structs for parsing config.defaults.toml
// ============================================================================

#[derive(Debug, Deserialize)]
struct DefaultsConfig {
    common: CommonDefaults,
    draft: DraftDefaults,
    search: SearchDefaults,
}

#[derive(Debug, Deserialize)]
struct CommonDefaults {
    log_level: String,
    players_csv: String,
}

#[derive(Debug, Deserialize)]
struct DraftDefaults {
    teams: usize,
    slots: Vec<SlotSpec>,
}

#[derive(Debug, Deserialize)]
struct SearchDefaults {
    think_time_secs: f64,
    exploration: f64,
}

// ============================================================================
// Public accessor functions
// ============================================================================

// Common
pub fn log_level() -> &'static str {
    &DEFAULTS.common.log_level
}
pub fn players_csv() -> &'static str {
    &DEFAULTS.common.players_csv
}

// Draft
pub fn teams() -> usize {
    DEFAULTS.draft.teams
}
pub fn slots() -> &'static [SlotSpec] {
    &DEFAULTS.draft.slots
}

// Search
pub fn think_time_secs() -> f64 {
    DEFAULTS.search.think_time_secs
}
pub fn exploration() -> f64 {
    DEFAULTS.search.exploration
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_parse() {
        // Just accessing these will verify the TOML parses correctly
        assert_eq!(log_level(), "info");
        assert_eq!(players_csv(), "players.csv");
    }

    #[test]
    fn test_draft_defaults() {
        assert_eq!(teams(), 10);
        let names: Vec<&str> = slots().iter().filter_map(|s| s.name.as_deref()).collect();
        assert_eq!(names, vec!["QB", "RB", "WR", "TE", "FLEX", "K", "DST"]);
        assert_eq!(slots()[4].flex, vec!["RB", "WR", "TE"]);
    }

    #[test]
    fn test_search_defaults() {
        assert!((think_time_secs() - 10.0).abs() < f64::EPSILON);
        assert!((exploration() - std::f64::consts::SQRT_2).abs() < 1e-12);
    }
}
