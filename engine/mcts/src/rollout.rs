//! Rollout policies for simulated picks.
//!
//! A rollout completes the draft from a hypothetical position. At every
//! simulated pick the policy is offered the best available candidate of each
//! slot the team on the clock can still fill, and chooses one of them.
//!
//! Implementations:
//! - [`ValuePolicy`]: highest position-relative value
//! - [`GreedyPolicy`]: highest raw score
//! - [`RandomPolicy`]: uniform over the offered options
//! - [`MixedPolicy`]: one of the three above, chosen uniformly per pick

use draft_core::Candidate;
use rand::Rng;
use rand_chacha::ChaCha20Rng;

use crate::value::ValueTable;

/// Trait for simulated-pick policies.
pub trait RolloutPolicy: Send + Sync {
    /// Choose one of `options`. Returns `None` only when `options` is empty.
    fn select<'c>(
        &self,
        options: &[&'c Candidate],
        values: &ValueTable,
        rng: &mut ChaCha20Rng,
    ) -> Option<&'c Candidate>;
}

/// Picks the option with the highest standard score. Ties keep the first.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValuePolicy;

impl RolloutPolicy for ValuePolicy {
    fn select<'c>(
        &self,
        options: &[&'c Candidate],
        values: &ValueTable,
        _rng: &mut ChaCha20Rng,
    ) -> Option<&'c Candidate> {
        first_max_by(options, |c| values.value(c.id))
    }
}

/// Picks the option with the highest projected score. Ties keep the first.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyPolicy;

impl RolloutPolicy for GreedyPolicy {
    fn select<'c>(
        &self,
        options: &[&'c Candidate],
        _values: &ValueTable,
        _rng: &mut ChaCha20Rng,
    ) -> Option<&'c Candidate> {
        first_max_by(options, |c| c.score)
    }
}

/// Uniform choice among the options.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomPolicy;

impl RolloutPolicy for RandomPolicy {
    fn select<'c>(
        &self,
        options: &[&'c Candidate],
        _values: &ValueTable,
        rng: &mut ChaCha20Rng,
    ) -> Option<&'c Candidate> {
        if options.is_empty() {
            return None;
        }
        Some(options[rng.gen_range(0..options.len())])
    }
}

/// Default rollout policy: value, greedy, or random with equal probability,
/// drawn independently for every simulated pick.
#[derive(Debug, Clone, Copy, Default)]
pub struct MixedPolicy;

impl RolloutPolicy for MixedPolicy {
    fn select<'c>(
        &self,
        options: &[&'c Candidate],
        values: &ValueTable,
        rng: &mut ChaCha20Rng,
    ) -> Option<&'c Candidate> {
        match rng.gen_range(0..3u8) {
            0 => ValuePolicy.select(options, values, rng),
            1 => GreedyPolicy.select(options, values, rng),
            _ => RandomPolicy.select(options, values, rng),
        }
    }
}

fn first_max_by<'c>(
    options: &[&'c Candidate],
    key: impl Fn(&Candidate) -> f64,
) -> Option<&'c Candidate> {
    let mut best: Option<(&'c Candidate, f64)> = None;
    for &candidate in options {
        let k = key(candidate);
        if best.map_or(true, |(_, b)| k > b) {
            best = Some((candidate, k));
        }
    }
    best.map(|(c, _)| c)
}
