//! MCTS search implementation.
//!
//! Implements the time-boxed draft search:
//! 1. Selection: descend with UCB1 from the root, applying each node's pick
//!    to the working snapshot
//! 2. Expansion: add one child per slot the team on the clock can still fill
//! 3. Simulation: complete the draft with the rollout policy and score each
//!    team's share of the points drafted since the real current pick
//! 4. Backpropagation: fold the shares into the running averages on the path
//!
//! The working snapshot is reset from the master snapshot between iterations.

use std::time::{Duration, Instant};

use draft_core::{
    Candidate, CandidatePool, DraftSnapshot, Pick, PickOrder, SlotIndex, SlotModel, SnapshotError,
};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use thiserror::Error;
use tracing::{debug, info, trace};

use crate::config::MctsConfig;
use crate::node::NodeId;
use crate::rollout::{MixedPolicy, RolloutPolicy};
use crate::tree::MctsTree;
use crate::value::ValueTable;

/// Point totals this close to zero yield the neutral reward.
const MIN_TOTAL_POINTS: f64 = 1e-9;

/// Errors that can occur during MCTS search.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("no recommendation: the search expanded no candidates")]
    NoRecommendation,

    #[error("could not rebuild draft state: {0}")]
    Snapshot(#[from] SnapshotError),

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

/// How a single rollout ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RolloutOutcome {
    /// The draft was completed and rewards hold every team's share.
    Completed,
    /// Some team on the clock had no eligible candidate.
    DeadEnd,
}

/// Counters collected over one search.
#[derive(Debug, Clone, Default)]
pub struct SearchStats {
    pub iterations: u64,
    pub dead_ends: u64,
    pub nodes: usize,
    pub max_depth: u32,
    pub elapsed: Duration,
}

/// Result of an MCTS search.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Recommended candidate, owned so it outlives the tree
    pub candidate: Candidate,

    /// Mean score share of the recommended pick for the team on the clock
    pub share: f64,

    /// Visits to the recommended root child
    pub visits: u32,

    pub stats: SearchStats,
}

/// MCTS search state for one recommendation.
///
/// Owns the tree, the value table, and three snapshots: the real (master)
/// position, the working copy walked during selection, and the rollout copy.
pub struct MctsSearch<'a, P: RolloutPolicy> {
    tree: MctsTree,
    model: &'a SlotModel,
    pool: &'a CandidatePool,
    order: &'a PickOrder,
    policy: &'a P,
    config: MctsConfig,
    values: ValueTable,
    master: DraftSnapshot,
    working: DraftSnapshot,
    rollout: DraftSnapshot,
    /// Per-team reward of the current iteration
    rewards: Vec<f64>,
    /// Per-team points scratch buffer
    points: Vec<f64>,
    stats: SearchStats,
}

impl<'a, P: RolloutPolicy> MctsSearch<'a, P> {
    /// Create a search from the real draft position `history[..pick_index]`.
    pub fn new(
        model: &'a SlotModel,
        pool: &'a CandidatePool,
        order: &'a PickOrder,
        policy: &'a P,
        config: MctsConfig,
        pick_index: usize,
        history: &[Pick],
    ) -> Result<Self, SearchError> {
        let master = DraftSnapshot::build(pick_index, history, model, pool)?;
        let values = ValueTable::compute(pool, model);
        let num_teams = model.num_teams();
        debug!(
            pick = pick_index,
            candidates = pool.len(),
            teams = num_teams,
            "Search state built"
        );

        Ok(Self {
            tree: MctsTree::new(num_teams, model.num_slots()),
            model,
            pool,
            order,
            policy,
            config,
            values,
            working: master.clone(),
            rollout: master.clone(),
            master,
            rewards: vec![0.0; num_teams],
            points: vec![0.0; num_teams],
            stats: SearchStats::default(),
        })
    }

    /// Run iterations until the think time is spent.
    ///
    /// At least one iteration always runs, so the root is always expanded.
    pub fn run(&mut self, rng: &mut ChaCha20Rng) -> Result<SearchResult, SearchError> {
        if self.master.is_complete(self.model) {
            return Err(SearchError::NoRecommendation);
        }
        let pick = self.master.pick_index();
        let team = self.order.team_for_pick(pick);
        info!(
            pick,
            team,
            think_time_ms = self.config.think_time.as_millis() as u64,
            "Search started"
        );

        let start = Instant::now();
        loop {
            self.iterate(rng)?;
            self.stats.iterations += 1;
            if start.elapsed() >= self.config.think_time {
                break;
            }
        }

        let tree_stats = self.tree.stats();
        self.stats.elapsed = start.elapsed();
        self.stats.nodes = tree_stats.total_nodes;
        self.stats.max_depth = tree_stats.max_depth;

        let best_id = self
            .tree
            .best_root_child(team)
            .ok_or(SearchError::NoRecommendation)?;
        let best = self.tree.get(best_id);
        let candidate = best
            .candidate
            .and_then(|id| self.pool.get(id))
            .cloned()
            .ok_or_else(|| SearchError::InvalidState("root child has no candidate".into()))?;

        info!(
            candidate = %candidate.name,
            share = best.mean_score(team),
            visits = best.visit_count,
            iterations = self.stats.iterations,
            dead_ends = self.stats.dead_ends,
            nodes = self.stats.nodes,
            max_depth = self.stats.max_depth,
            elapsed_ms = self.stats.elapsed.as_millis() as u64,
            "Search finished"
        );

        Ok(SearchResult {
            share: best.mean_score(team),
            visits: best.visit_count,
            candidate,
            stats: self.stats.clone(),
        })
    }

    /// One select -> expand -> simulate -> backpropagate pass.
    fn iterate(&mut self, rng: &mut ChaCha20Rng) -> Result<(), SearchError> {
        self.working.overwrite(&self.master);

        let leaf_id = self.select()?;
        self.expand(leaf_id);

        if leaf_id == self.tree.root() {
            // Nothing to simulate from yet; the root only counts the visit.
            self.tree.backpropagate(leaf_id, &self.rewards);
            return Ok(());
        }

        if self.simulate(rng) == RolloutOutcome::DeadEnd {
            self.stats.dead_ends += 1;
            let neutral = 1.0 / self.rewards.len() as f64;
            self.rewards.fill(neutral);
        }
        self.tree.backpropagate(leaf_id, &self.rewards);

        trace!(
            leaf = leaf_id.0,
            pick = self.working.pick_index(),
            rewards = ?self.rewards,
            "MCTS iteration complete"
        );
        Ok(())
    }

    /// Descend to a leaf, applying each chosen pick to the working snapshot.
    fn select(&mut self) -> Result<NodeId, SearchError> {
        let pool = self.pool;
        let mut current = self.tree.root();
        while !self.tree.get(current).is_leaf() {
            let team = self.order.team_for_pick(self.working.pick_index());
            let Some(child_id) = self
                .tree
                .select_child(current, team, self.config.exploration)
            else {
                break;
            };

            let candidate = self
                .tree
                .get(child_id)
                .candidate
                .and_then(|id| pool.get(id))
                .ok_or_else(|| SearchError::InvalidState("tree node has no candidate".into()))?;
            self.working
                .apply_pick(candidate, self.model, self.order)
                .map_err(|e| SearchError::InvalidState(e.to_string()))?;
            current = child_id;
        }
        Ok(current)
    }

    /// Add one child per slot the team on the clock can fill.
    fn expand(&mut self, node_id: NodeId) {
        if self.working.is_complete(self.model) {
            return;
        }
        let team = self.order.team_for_pick(self.working.pick_index());
        let mut options = Vec::with_capacity(self.model.num_slots());
        best_per_open_slot(self.model, self.pool, &self.working, team, &mut options);
        for (slot, candidate) in options {
            self.tree.add_child(node_id, slot, candidate.id, team);
        }
    }

    /// Complete the draft from the working snapshot and fill `rewards`.
    fn simulate(&mut self, rng: &mut ChaCha20Rng) -> RolloutOutcome {
        self.rollout.overwrite(&self.working);

        let (model, pool, order) = (self.model, self.pool, self.order);
        let mut options = Vec::with_capacity(model.num_slots());
        let mut candidates: Vec<&Candidate> = Vec::with_capacity(model.num_slots());

        // Every step advances the pick index, so this runs at most
        // total_picks - pick_index times.
        while !self.rollout.is_complete(model) {
            let team = order.team_for_pick(self.rollout.pick_index());
            options.clear();
            best_per_open_slot(model, pool, &self.rollout, team, &mut options);
            candidates.clear();
            candidates.extend(options.iter().map(|&(_, c)| c));

            let Some(choice) = self.policy.select(&candidates, &self.values, rng) else {
                return RolloutOutcome::DeadEnd;
            };
            if self.rollout.apply_pick(choice, model, order).is_err() {
                return RolloutOutcome::DeadEnd;
            }
        }

        // Points drafted since the real position: tree path plus rollout.
        self.points.fill(0.0);
        for pick in &self.rollout.history()[self.master.pick_index()..] {
            if let Some(candidate) = pool.get(pick.candidate) {
                self.points[pick.team] += candidate.score;
            }
        }
        let total: f64 = self.points.iter().sum();
        if total.abs() < MIN_TOTAL_POINTS {
            let neutral = 1.0 / self.rewards.len() as f64;
            self.rewards.fill(neutral);
        } else {
            for (reward, points) in self.rewards.iter_mut().zip(&self.points) {
                *reward = points / total;
            }
        }
        RolloutOutcome::Completed
    }

    /// Get the search tree (for inspection/debugging).
    pub fn tree(&self) -> &MctsTree {
        &self.tree
    }

    /// The value table computed for this search.
    pub fn values(&self) -> &ValueTable {
        &self.values
    }
}

/// Best available candidate for each slot `team` still needs, in slot order.
///
/// A candidate is offered only if `team` can actually roster it, so applying
/// any offered pick cannot fail.
fn best_per_open_slot<'p>(
    model: &SlotModel,
    pool: &'p CandidatePool,
    snapshot: &DraftSnapshot,
    team: usize,
    out: &mut Vec<(SlotIndex, &'p Candidate)>,
) {
    let remaining = snapshot.requirements().team(team);
    for slot in snapshot.open_slots(team) {
        let Some(candidate) = pool.highest_available(slot, snapshot.taken()) else {
            continue;
        };
        if model.open_slot_for(candidate.slot, remaining).is_some() {
            out.push((slot, candidate));
        }
    }
}

/// Recommend the next pick at `history[..pick_index]`.
///
/// Uses the mixed rollout policy. Seeds the rollout RNG from
/// `config.seed`, or from entropy when unset.
pub fn recommend(
    model: &SlotModel,
    pool: &CandidatePool,
    order: &PickOrder,
    pick_index: usize,
    history: &[Pick],
    config: MctsConfig,
) -> Result<SearchResult, SearchError> {
    let mut rng = match config.seed {
        Some(seed) => ChaCha20Rng::seed_from_u64(seed),
        None => ChaCha20Rng::from_entropy(),
    };
    run_mcts(model, pool, order, &MixedPolicy, config, pick_index, history, &mut rng)
}

/// Convenience function to run a single MCTS search with a given policy.
#[allow(clippy::too_many_arguments)]
pub fn run_mcts<P: RolloutPolicy>(
    model: &SlotModel,
    pool: &CandidatePool,
    order: &PickOrder,
    policy: &P,
    config: MctsConfig,
    pick_index: usize,
    history: &[Pick],
    rng: &mut ChaCha20Rng,
) -> Result<SearchResult, SearchError> {
    let mut search = MctsSearch::new(model, pool, order, policy, config, pick_index, history)?;
    search.run(rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rollout::GreedyPolicy;
    use draft_core::SlotSpec;

    struct Fixture {
        model: SlotModel,
        pool: CandidatePool,
        order: PickOrder,
    }

    fn fixture(teams: usize, slots: &[SlotSpec], entries: &[(&str, SlotIndex, f64)]) -> Fixture {
        let model = SlotModel::new(teams, slots).unwrap();
        let pool = CandidatePool::new(
            &model,
            entries.iter().map(|&(n, s, p)| (n.to_string(), s, p)),
        );
        let order = PickOrder::for_model(&model);
        Fixture { model, pool, order }
    }

    fn qb_fixture() -> Fixture {
        fixture(2, &[SlotSpec::new("QB", 1)], &[("A", 0, 30.0), ("B", 0, 20.0)])
    }

    #[test]
    fn test_single_iteration_expands_root() {
        let f = qb_fixture();
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        let config = MctsConfig::for_testing().with_think_time(Duration::ZERO);
        let mut search =
            MctsSearch::new(&f.model, &f.pool, &f.order, &MixedPolicy, config, 0, &[]).unwrap();
        let result = search.run(&mut rng).unwrap();

        assert_eq!(result.candidate.name, "A");
        assert_eq!(result.stats.iterations, 1);
        assert_eq!(search.tree().stats().root_children, 1);
        assert_eq!(search.tree().get(search.tree().root()).visit_count, 1);
    }

    #[test]
    fn test_rewards_are_score_shares() {
        let f = qb_fixture();
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        let config = MctsConfig::for_testing();
        let mut search =
            MctsSearch::new(&f.model, &f.pool, &f.order, &GreedyPolicy, config, 0, &[]).unwrap();
        let result = search.run(&mut rng).unwrap();

        // Team 0 takes A (30), team 1 is left with B (20)
        assert_eq!(result.candidate.name, "A");
        assert!((result.share - 0.6).abs() < 1e-9);
        assert!(result.visits > 0);
        assert!(result.stats.iterations > 1);
        assert_eq!(result.stats.dead_ends, 0);
    }

    #[test]
    fn test_dead_end_rollouts_are_absorbed() {
        // Only one QB for two teams: team 1 can never fill its slot.
        let f = fixture(2, &[SlotSpec::new("QB", 1)], &[("A", 0, 30.0)]);
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        let result = run_mcts(
            &f.model,
            &f.pool,
            &f.order,
            &MixedPolicy,
            MctsConfig::for_testing(),
            0,
            &[],
            &mut rng,
        )
        .unwrap();

        assert_eq!(result.candidate.name, "A");
        assert!(result.stats.dead_ends > 0);
        assert!((result.share - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_complete_draft_has_no_recommendation() {
        let f = qb_fixture();
        let history = [Pick { candidate: 0, team: 0 }, Pick { candidate: 1, team: 1 }];
        let err = recommend(
            &f.model,
            &f.pool,
            &f.order,
            2,
            &history,
            MctsConfig::for_testing(),
        )
        .unwrap_err();
        assert!(matches!(err, SearchError::NoRecommendation));
    }

    #[test]
    fn test_empty_pool_has_no_recommendation() {
        let f = fixture(2, &[SlotSpec::new("QB", 1)], &[]);
        let err = recommend(&f.model, &f.pool, &f.order, 0, &[], MctsConfig::for_testing())
            .unwrap_err();
        assert!(matches!(err, SearchError::NoRecommendation));
    }

    #[test]
    fn test_bad_history_is_rejected() {
        let f = qb_fixture();
        let err = recommend(&f.model, &f.pool, &f.order, 1, &[], MctsConfig::for_testing())
            .unwrap_err();
        assert!(matches!(err, SearchError::Snapshot(_)));
    }

    #[test]
    fn test_search_leaves_master_untouched() {
        let f = fixture(
            2,
            &[SlotSpec::new("QB", 1), SlotSpec::new("RB", 1)],
            &[("Q1", 0, 30.0), ("Q2", 0, 29.0), ("R1", 1, 25.0), ("R2", 1, 5.0)],
        );
        let history = [Pick { candidate: f.pool.by_name("Q1").unwrap().id, team: 0 }];
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let mut search = MctsSearch::new(
            &f.model,
            &f.pool,
            &f.order,
            &MixedPolicy,
            MctsConfig::for_testing(),
            1,
            &history,
        )
        .unwrap();
        let before = search.master.clone();
        search.run(&mut rng).unwrap();
        assert_eq!(search.master, before);
        assert_eq!(search.values().len(), f.pool.len());
    }

    #[test]
    fn test_best_per_open_slot_skips_full_and_empty_slots() {
        let f = fixture(
            1,
            &[
                SlotSpec::new("QB", 1),
                SlotSpec::new("RB", 1),
                SlotSpec::new("K", 1),
            ],
            &[("Q1", 0, 30.0), ("R1", 1, 20.0)],
        );
        let mut snapshot = DraftSnapshot::new(&f.model, &f.pool);
        snapshot
            .apply_pick(f.pool.by_name("Q1").unwrap(), &f.model, &f.order)
            .unwrap();

        let mut out = Vec::new();
        best_per_open_slot(&f.model, &f.pool, &snapshot, 0, &mut out);
        let offered: Vec<(SlotIndex, &str)> =
            out.iter().map(|(s, c)| (*s, c.name.as_str())).collect();
        assert_eq!(offered, vec![(1, "R1")]);
    }
}
