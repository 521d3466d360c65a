//! Configuration struct definitions.
//!
//! All config structs with serde deserialization support and default values.

use std::time::Duration;

use draft_core::{OrderError, PickOrder, SlotConfigError, SlotModel, SlotSpec};
use serde::Deserialize;

use crate::defaults;

// ============================================================================
// Serde default functions (required for #[serde(default = "...")])
// These call the accessor functions from defaults module
// ============================================================================

fn d_log_level() -> String {
    defaults::log_level().into()
}
fn d_players_csv() -> String {
    defaults::players_csv().into()
}
fn d_teams() -> usize {
    defaults::teams()
}
fn d_slots() -> Vec<SlotSpec> {
    defaults::slots().to_vec()
}
fn d_think_time_secs() -> f64 {
    defaults::think_time_secs()
}
fn d_exploration() -> f64 {
    defaults::exploration()
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Root configuration structure matching config.toml
#[derive(Debug, Deserialize, Default, Clone)]
pub struct DraftConfig {
    #[serde(default)]
    pub common: CommonConfig,
    #[serde(default)]
    pub draft: LeagueConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

/// Settings shared by every command
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CommonConfig {
    #[serde(default = "d_log_level")]
    pub log_level: String,
    /// Candidate projections: `name,position,score` rows
    #[serde(default = "d_players_csv")]
    pub players_csv: String,
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            log_level: defaults::log_level().into(),
            players_csv: defaults::players_csv().into(),
        }
    }
}

/// League shape: team count, roster slots, and pre-arranged trades
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LeagueConfig {
    #[serde(default = "d_teams")]
    pub teams: usize,
    #[serde(default = "d_slots")]
    pub slots: Vec<SlotSpec>,
    #[serde(default)]
    pub trades: Vec<TradeConfig>,
}

impl Default for LeagueConfig {
    fn default() -> Self {
        Self {
            teams: defaults::teams(),
            slots: defaults::slots().to_vec(),
            trades: Vec::new(),
        }
    }
}

/// A pick that belongs to a team other than its snake-order owner
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct TradeConfig {
    pub pick: usize,
    pub team: usize,
}

impl LeagueConfig {
    /// Validate the slot list into a [`SlotModel`].
    pub fn slot_model(&self) -> Result<SlotModel, SlotConfigError> {
        SlotModel::new(self.teams, &self.slots)
    }

    /// Snake order for `model` with every configured trade applied.
    pub fn pick_order(&self, model: &SlotModel) -> Result<PickOrder, OrderError> {
        let mut order = PickOrder::for_model(model);
        for trade in &self.trades {
            order.assign(trade.pick, trade.team)?;
        }
        Ok(order)
    }
}

/// Recommendation search settings
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SearchConfig {
    #[serde(default = "d_think_time_secs")]
    pub think_time_secs: f64,
    #[serde(default = "d_exploration")]
    pub exploration: f64,
    /// Fixed rollout seed; unset means a fresh seed per search
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            think_time_secs: defaults::think_time_secs(),
            exploration: defaults::exploration(),
            seed: None,
        }
    }
}

impl SearchConfig {
    pub fn think_time(&self) -> Duration {
        think_time_from_secs(self.think_time_secs)
    }
}

/// Seconds to a search budget. Negative or NaN values become zero and
/// values too large for a `Duration` saturate.
pub fn think_time_from_secs(secs: f64) -> Duration {
    if secs > 0.0 {
        Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
    } else {
        Duration::ZERO
    }
}
