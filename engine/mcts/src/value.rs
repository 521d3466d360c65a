//! Position-relative candidate values.
//!
//! A candidate's value is its score in standard deviations from the mean of
//! its slot's realistically draftable pool: the top `required * teams`
//! candidates of that slot. The table is computed once per search and looked
//! up by candidate id during rollouts.

use draft_core::{CandidateId, CandidatePool, SlotModel};

/// Pools whose spread is below this are treated as flat.
const MIN_STDEV: f64 = 1e-9;

/// Standard-score cache indexed by candidate id.
#[derive(Debug, Clone, Default)]
pub struct ValueTable {
    values: Vec<f64>,
}

impl ValueTable {
    /// Compute the value of every candidate in `pool`.
    pub fn compute(pool: &CandidatePool, model: &SlotModel) -> Self {
        let mut values = vec![0.0; pool.len()];
        for slot in model.slots() {
            let segment = pool.segment(slot.index);
            let depth = slot.required as usize * model.num_teams();
            let draftable = &segment[..depth.min(segment.len())];
            if draftable.is_empty() {
                continue;
            }

            let n = draftable.len() as f64;
            let mean = draftable.iter().map(|c| c.score).sum::<f64>() / n;
            let variance = draftable
                .iter()
                .map(|c| (c.score - mean).powi(2))
                .sum::<f64>()
                / n;
            let stdev = variance.sqrt();
            if stdev < MIN_STDEV {
                continue;
            }

            for candidate in segment {
                values[candidate.id] = (candidate.score - mean) / stdev;
            }
        }
        Self { values }
    }

    /// Value of `id`; 0.0 for ids outside the table.
    #[inline]
    pub fn value(&self, id: CandidateId) -> f64 {
        self.values.get(id).copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
