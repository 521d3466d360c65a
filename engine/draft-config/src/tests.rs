//! Tests for the configuration module.

use super::*;
use draft_core::{OrderError, SlotProblem};
use std::time::Duration;
use tempfile::tempdir;

#[test]
fn test_default_config() {
    let config = DraftConfig::default();
    assert_eq!(config.common.log_level, "info");
    assert_eq!(config.common.players_csv, "players.csv");
    assert_eq!(config.draft.teams, 10);
    assert_eq!(config.draft.slots.len(), 7);
    assert!(config.draft.trades.is_empty());
    assert!((config.search.think_time_secs - 10.0).abs() < f64::EPSILON);
    assert!(config.search.seed.is_none());
}

#[test]
fn test_default_league_builds() {
    let config = DraftConfig::default();
    let model = config.draft.slot_model().unwrap();
    assert_eq!(model.picks_per_team(), 10);
    assert_eq!(model.total_picks(), 100);

    let flex = model.slot_by_name("FLEX").unwrap();
    assert_eq!(flex.flex.len(), 3);

    let order = config.draft.pick_order(&model).unwrap();
    assert_eq!(order.len(), 100);
    assert_eq!(order.team_for_pick(10), 9);
}

#[test]
fn test_parse_config_toml() {
    let toml_content = r#"
[common]
players_csv = "projections_2024.csv"

[draft]
teams = 2

[[draft.slots]]
name = "QB"
number_required = 1

[[draft.slots]]
name = "RB"
required = 2

[[draft.slots]]
name = "FLEX"
number_required = 1
flex_slots = ["RB"]

[[draft.trades]]
pick = 0
team = 1

[search]
think_time_secs = 2.5
seed = 7
"#;
    let config = parse_config(toml_content).unwrap();
    assert_eq!(config.common.players_csv, "projections_2024.csv");
    assert_eq!(config.common.log_level, "info"); // Default
    assert_eq!(config.draft.teams, 2);
    assert_eq!(config.draft.trades, vec![TradeConfig { pick: 0, team: 1 }]);
    assert_eq!(config.search.think_time(), Duration::from_millis(2500));
    assert_eq!(config.search.seed, Some(7));

    let model = config.draft.slot_model().unwrap();
    assert_eq!(model.total_picks(), 8);
    let order = config.draft.pick_order(&model).unwrap();
    assert_eq!(order.team_for_pick(0), 1);
    assert_eq!(order.team_for_pick(1), 1);
}

#[test]
fn test_partial_config() {
    let toml_content = r#"
[search]
exploration = 0.5
"#;
    let config = parse_config(toml_content).unwrap();
    assert!((config.search.exploration - 0.5).abs() < f64::EPSILON);
    assert!((config.search.think_time_secs - 10.0).abs() < f64::EPSILON); // Default
    assert_eq!(config.draft.teams, 10); // Default
    assert_eq!(config.draft.slots.len(), 7); // Default
}

#[test]
fn test_slot_problems_are_all_reported() {
    let toml_content = r#"
[draft]
teams = 4

[[draft.slots]]
number_required = 1

[[draft.slots]]
name = "RB"

[[draft.slots]]
name = "FLEX"
number_required = 1
flex = ["WR"]
"#;
    let config = parse_config(toml_content).unwrap();
    let err = config.draft.slot_model().unwrap_err();
    assert_eq!(err.problems.len(), 3);
    assert!(matches!(err.problems[0], SlotProblem::MissingName { index: 0 }));
    assert!(matches!(err.problems[1], SlotProblem::MissingRequired { index: 1, .. }));
    assert!(matches!(err.problems[2], SlotProblem::UnknownFlexSlot { .. }));
}

#[test]
fn test_invalid_trade_is_rejected() {
    let toml_content = r#"
[draft]
teams = 2

[[draft.slots]]
name = "QB"
number_required = 1

[[draft.trades]]
pick = 5
team = 0
"#;
    let config = parse_config(toml_content).unwrap();
    let model = config.draft.slot_model().unwrap();
    let err = config.draft.pick_order(&model).unwrap_err();
    assert_eq!(err, OrderError::PickOutOfRange { pick: 5, total: 2 });
}

#[test]
fn test_think_time_clamps_negative() {
    let search = SearchConfig {
        think_time_secs: -1.0,
        ..SearchConfig::default()
    };
    assert_eq!(search.think_time(), Duration::ZERO);
    assert_eq!(think_time_from_secs(f64::NAN), Duration::ZERO);
    assert_eq!(think_time_from_secs(f64::INFINITY), Duration::MAX);
}

#[test]
fn test_load_from_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[common]\nplayers_csv = \"week1.csv\"\n").unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.common.players_csv, "week1.csv");
}

#[test]
fn test_unparsable_file_is_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[draft\nteams = = 6\n").unwrap();

    let err = load_from_path(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));

    let missing = dir.path().join("missing.toml");
    assert!(matches!(
        load_from_path(&missing),
        Err(ConfigError::Read { .. })
    ));
}

#[test]
fn test_drafter_env_overrides() {
    std::env::set_var("DRAFTER_DRAFT_TEAMS", "14");
    std::env::set_var("DRAFTER_SEARCH_SEED", "99");
    std::env::set_var("DRAFTER_SEARCH_EXPLORATION", "not-a-number");

    let config = apply_env_overrides(DraftConfig::default());
    assert_eq!(config.draft.teams, 14);
    assert_eq!(config.search.seed, Some(99));
    // Unparsable values are ignored
    assert!((config.search.exploration - std::f64::consts::SQRT_2).abs() < 1e-12);

    std::env::remove_var("DRAFTER_DRAFT_TEAMS");
    std::env::remove_var("DRAFTER_SEARCH_SEED");
    std::env::remove_var("DRAFTER_SEARCH_EXPLORATION");
}
