//! Monte Carlo Tree Search (MCTS) for slot-constrained snake drafts.
//!
//! Given the real state of a draft, the search recommends the next pick for
//! the team on the clock. It builds a tree of hypothetical picks within a
//! wall-clock budget and completes the draft with fast heuristic rollouts.
//!
//! # Overview
//!
//! Each iteration consists of four phases:
//!
//! 1. **Selection**: Traverse the tree using UCB1, scoring each child by the
//!    mean score share of the team choosing at that point
//! 2. **Expansion**: At a leaf, add one child per roster slot the team on the
//!    clock can still fill, holding that slot's best available candidate
//! 3. **Simulation**: Complete the draft with a [`RolloutPolicy`] and compute
//!    every team's share of the points drafted
//! 4. **Backpropagation**: Update visit counts and running-average shares
//!    along the path from leaf to root
//!
//! # Usage
//!
//! ```rust,ignore
//! use draft_core::{CandidatePool, PickOrder, SlotModel, SlotSpec};
//! use mcts::{recommend, MctsConfig};
//!
//! let model = SlotModel::new(2, &[SlotSpec::new("QB", 1)])?;
//! let pool = CandidatePool::new(&model, vec![
//!     ("A".to_string(), 0, 30.0),
//!     ("B".to_string(), 0, 20.0),
//! ]);
//! let order = PickOrder::for_model(&model);
//!
//! let result = recommend(&model, &pool, &order, 0, &[], MctsConfig::default())?;
//! println!("Take {} ({} iterations)", result.candidate.name, result.stats.iterations);
//! ```
//!
//! # Configuration
//!
//! The [`MctsConfig`] struct controls search behavior:
//!
//! - `think_time`: Wall-clock budget per search (default: 10s)
//! - `exploration`: UCB1 exploration constant (default: sqrt 2)
//! - `seed`: Optional rollout seed for reproducible searches
//!
//! # Rollout policies
//!
//! - [`MixedPolicy`]: value, greedy, or random per pick (the default)
//! - [`ValuePolicy`], [`GreedyPolicy`], [`RandomPolicy`]: the single strategies

pub mod config;
pub mod node;
pub mod rollout;
pub mod search;
pub mod tree;
pub mod value;

// Re-export main types
pub use config::MctsConfig;
pub use node::{MctsNode, NodeId};
pub use rollout::{GreedyPolicy, MixedPolicy, RandomPolicy, RolloutPolicy, ValuePolicy};
pub use search::{recommend, run_mcts, MctsSearch, SearchError, SearchResult, SearchStats};
pub use tree::{MctsTree, TreeStats};
pub use value::ValueTable;
