//! MCTS tree structure with arena allocation.
//!
//! The tree uses arena allocation for efficient node storage and
//! cache-friendly traversal. Nodes are stored in a contiguous Vec and
//! referenced by NodeId indices; parents are plain indices, so dropping the
//! tree frees every node at once without recursion.

use draft_core::{CandidateId, SlotIndex};

use crate::node::{MctsNode, NodeId};

/// MCTS tree with arena-based node storage.
#[derive(Debug)]
pub struct MctsTree {
    /// Arena storing all nodes
    nodes: Vec<MctsNode>,

    /// Root node index (always 0 after initialization)
    root: NodeId,

    num_teams: usize,
    num_slots: usize,
}

impl MctsTree {
    /// Create a new tree holding only the root.
    pub fn new(num_teams: usize, num_slots: usize) -> Self {
        Self {
            nodes: vec![MctsNode::new_root(num_teams, num_slots)],
            root: NodeId(0),
            num_teams,
            num_slots,
        }
    }

    /// Get the root node ID.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Get a reference to a node by ID.
    #[inline]
    pub fn get(&self, id: NodeId) -> &MctsNode {
        &self.nodes[id.0 as usize]
    }

    /// Get a mutable reference to a node by ID.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut MctsNode {
        &mut self.nodes[id.0 as usize]
    }

    /// Get the total number of nodes in the tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty (should never be true after construction).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Add a child under `parent_id` in the given slot position.
    /// Returns the new child's NodeId.
    pub fn add_child(
        &mut self,
        parent_id: NodeId,
        slot: SlotIndex,
        candidate: CandidateId,
        team: usize,
    ) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(MctsNode::new_child(
            parent_id,
            candidate,
            team,
            self.num_teams,
            self.num_slots,
        ));
        self.get_mut(parent_id).children[slot] = id;
        id
    }

    /// Select the child of `node_id` maximizing UCB1 for `team`.
    ///
    /// The first never-visited child (in slot order) is returned outright.
    pub fn select_child(&self, node_id: NodeId, team: usize, exploration: f64) -> Option<NodeId> {
        let node = self.get(node_id);
        // Pre-compute ln once instead of per-child comparison
        let ln_parent_visits = (node.visit_count.max(1) as f64).ln();

        let mut best: Option<(NodeId, f64)> = None;
        for (_, child_id) in node.child_ids() {
            let child = self.get(child_id);
            if child.visit_count == 0 {
                return Some(child_id);
            }
            let score = child.ucb_score(team, ln_parent_visits, exploration);
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((child_id, score));
            }
        }
        best.map(|(id, _)| id)
    }

    /// Backpropagate rollout rewards from a leaf to the root.
    ///
    /// Every node on the path counts the visit; each non-root node folds in
    /// the reward of the team that made its pick.
    pub fn backpropagate(&mut self, leaf_id: NodeId, rewards: &[f64]) {
        let mut current_id = leaf_id;
        while current_id.is_some() {
            let node = self.get_mut(current_id);
            node.record_visit(rewards);
            current_id = node.parent;
        }
    }

    /// Root child with the highest mean share for `team`.
    ///
    /// Ties go to the more visited child, then to the lower slot index.
    pub fn best_root_child(&self, team: usize) -> Option<NodeId> {
        let mut best: Option<NodeId> = None;
        for (_, child_id) in self.get(self.root).child_ids() {
            let child = self.get(child_id);
            let better = match best {
                None => true,
                Some(current) => {
                    let current = self.get(current);
                    let (a, b) = (child.mean_score(team), current.mean_score(team));
                    a > b || (a == b && child.visit_count > current.visit_count)
                }
            };
            if better {
                best = Some(child_id);
            }
        }
        best
    }

    /// Depth of `node_id` below the root.
    pub fn depth(&self, node_id: NodeId) -> u32 {
        let mut depth = 0;
        let mut current = self.get(node_id).parent;
        while current.is_some() {
            depth += 1;
            current = self.get(current).parent;
        }
        depth
    }

    /// Get statistics about the tree for debugging.
    pub fn stats(&self) -> TreeStats {
        let root = self.get(self.root);
        TreeStats {
            total_nodes: self.nodes.len(),
            root_visits: root.visit_count,
            root_children: root.child_ids().count(),
            max_depth: self.compute_max_depth(),
        }
    }

    fn compute_max_depth(&self) -> u32 {
        // Children are always allocated after their parent, so one forward
        // pass over the arena sees every parent depth before its children.
        let mut depths = vec![0u32; self.nodes.len()];
        let mut max_depth = 0;
        for (i, node) in self.nodes.iter().enumerate() {
            if node.parent.is_some() {
                depths[i] = depths[node.parent.0 as usize] + 1;
                max_depth = max_depth.max(depths[i]);
            }
        }
        max_depth
    }
}

/// Statistics about an MCTS tree.
#[derive(Debug, Clone)]
pub struct TreeStats {
    pub total_nodes: usize,
    pub root_visits: u32,
    pub root_children: usize,
    pub max_depth: u32,
}
