//! MCTS configuration parameters.

use std::time::Duration;

/// Configuration for a time-boxed draft search.
#[derive(Debug, Clone)]
pub struct MctsConfig {
    /// Wall-clock budget for one search. Polled once per iteration, so a
    /// search overshoots by at most one iteration.
    pub think_time: Duration,

    /// Exploration constant C in UCB1 = mean + C * sqrt(ln(N_parent) / N).
    /// Higher values spread visits more evenly across siblings.
    pub exploration: f64,

    /// Seed for rollout randomness. `None` seeds from entropy, so repeated
    /// searches over the same state may disagree.
    pub seed: Option<u64>,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            think_time: Duration::from_secs(10),
            exploration: std::f64::consts::SQRT_2,
            seed: None,
        }
    }
}

impl MctsConfig {
    /// Create a fast, reproducible config for testing.
    pub fn for_testing() -> Self {
        Self {
            think_time: Duration::from_millis(50),
            exploration: std::f64::consts::SQRT_2,
            seed: Some(42),
        }
    }

    /// Builder pattern: set think time.
    pub fn with_think_time(mut self, think_time: Duration) -> Self {
        self.think_time = think_time;
        self
    }

    /// Builder pattern: set the UCB1 exploration constant.
    pub fn with_exploration(mut self, c: f64) -> Self {
        self.exploration = c;
        self
    }

    /// Builder pattern: set the rollout seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
