//! MCTS tree node representation.
//!
//! Each node hypothesizes one pick made from its parent's draft position.
//! Nodes keep a per-team running-average score share used for UCB1
//! selection and for the final recommendation.

use draft_core::{CandidateId, SlotIndex};

/// Index into the node arena. Using a newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const NONE: NodeId = NodeId(u32::MAX);

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    pub fn is_some(self) -> bool {
        !self.is_none()
    }
}

/// A node in the MCTS tree.
#[derive(Debug, Clone)]
pub struct MctsNode {
    /// Parent node index (NONE for root)
    pub parent: NodeId,

    /// Candidate picked to reach this node (None for root)
    pub candidate: Option<CandidateId>,

    /// Team that made this node's pick (None for root)
    pub team: Option<usize>,

    /// Number of times this node has been visited
    pub visit_count: u32,

    /// Running-average score share, one entry per team
    pub scores: Vec<f64>,

    /// Children indexed by slot. NONE where the slot produced no child.
    pub children: Vec<NodeId>,
}

impl MctsNode {
    /// Create a new root node.
    pub fn new_root(num_teams: usize, num_slots: usize) -> Self {
        Self {
            parent: NodeId::NONE,
            candidate: None,
            team: None,
            visit_count: 0,
            scores: vec![0.0; num_teams],
            children: vec![NodeId::NONE; num_slots],
        }
    }

    /// Create a new child node.
    pub fn new_child(
        parent: NodeId,
        candidate: CandidateId,
        team: usize,
        num_teams: usize,
        num_slots: usize,
    ) -> Self {
        Self {
            parent,
            candidate: Some(candidate),
            team: Some(team),
            visit_count: 0,
            scores: vec![0.0; num_teams],
            children: vec![NodeId::NONE; num_slots],
        }
    }

    /// Mean score share recorded for `team`. 0.0 if never updated.
    #[inline]
    pub fn mean_score(&self, team: usize) -> f64 {
        self.scores[team]
    }

    /// UCB1 score of this node as seen by `team` choosing among siblings.
    /// UCB1 = mean + c * sqrt(ln(N_parent) / N)
    ///
    /// Unvisited nodes score +inf so they are always tried first.
    ///
    /// Takes pre-computed ln(parent_visits) to avoid redundant ln calls when
    /// comparing siblings.
    #[inline]
    pub fn ucb_score(&self, team: usize, ln_parent_visits: f64, exploration: f64) -> f64 {
        if self.visit_count == 0 {
            return f64::INFINITY;
        }
        let n = self.visit_count as f64;
        self.mean_score(team) + exploration * (ln_parent_visits / n).sqrt()
    }

    /// A node is a leaf iff it has no children.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.iter().all(|id| id.is_none())
    }

    /// Existing children as (slot, id) pairs, in slot order.
    pub fn child_ids(&self) -> impl Iterator<Item = (SlotIndex, NodeId)> + '_ {
        self.children
            .iter()
            .enumerate()
            .filter(|(_, id)| id.is_some())
            .map(|(slot, id)| (slot, *id))
    }

    /// Count a visit and fold `reward` into the running average of the team
    /// that made this node's pick. The root only counts the visit.
    pub fn record_visit(&mut self, rewards: &[f64]) {
        self.visit_count += 1;
        if let Some(team) = self.team {
            let visits = self.visit_count as f64;
            let old = self.scores[team];
            self.scores[team] = rewards[team] / visits + old * (visits - 1.0) / visits;
        }
    }
}
