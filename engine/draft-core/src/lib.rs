//! Draft domain model for the drafter engine.
//!
//! This crate holds everything the search needs to reason about a
//! slot-constrained snake draft, independent of how the next pick is chosen:
//!
//! - [`SlotModel`]: roster slots, required counts, flex relationships, and
//!   the first-fit [`SlotModel::fill_slot`] policy
//! - [`CandidatePool`]: candidates pre-sorted and segmented by slot, answering
//!   best-available queries
//! - [`PickOrder`]: snake order with per-pick trades
//! - [`DraftSnapshot`]: deep-copyable draft progress rebuilt by replay
//! - [`DraftSession`]: the committed draft, validating each pick
//!
//! # Example
//!
//! ```rust,ignore
//! use draft_core::{CandidatePool, DraftSession, PickOrder, SlotModel, SlotSpec};
//!
//! let model = SlotModel::new(2, &[SlotSpec::new("QB", 1)])?;
//! let pool = CandidatePool::from_path(&model, "projections.csv")?;
//! let order = PickOrder::for_model(&model);
//!
//! let mut session = DraftSession::new(model, pool, order);
//! session.commit("Josh Allen")?;
//! ```

pub mod candidates;
pub mod order;
pub mod session;
pub mod slots;
pub mod snapshot;

pub use candidates::{Candidate, CandidateId, CandidatePool, IngestError, TakenSet};
pub use order::{OrderError, PickOrder};
pub use session::{DraftSession, RosterEntry, SessionError};
pub use slots::{
    Requirements, RosterFull, Slot, SlotConfigError, SlotIndex, SlotModel, SlotProblem, SlotSpec,
};
pub use snapshot::{DraftSnapshot, Pick, SnapshotError};
