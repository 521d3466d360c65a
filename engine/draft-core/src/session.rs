//! Live draft session.
//!
//! Owns the real state of a draft and validates every pick before it is
//! committed. Searches read the session's history but never mutate it.

use std::io::{BufRead, Write};

use thiserror::Error;
use tracing::{debug, info};

use crate::candidates::{Candidate, CandidateId, CandidatePool};
use crate::order::{OrderError, PickOrder};
use crate::slots::{Requirements, RosterFull, SlotIndex, SlotModel};
use crate::snapshot::{DraftSnapshot, Pick, SnapshotError};

/// Errors that can occur while driving a draft session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no candidate named '{0}'")]
    UnknownCandidate(String),

    #[error("no candidate with id {0}")]
    UnknownCandidateId(CandidateId),

    #[error("'{0}' has already been picked")]
    AlreadyTaken(String),

    #[error("no more picks available, the draft is complete")]
    DraftComplete,

    #[error(transparent)]
    RosterFull(#[from] RosterFull),

    #[error(transparent)]
    Order(#[from] OrderError),

    #[error("pick {pick} has already been made and cannot be traded")]
    PickAlreadyMade { pick: usize },

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error("history I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed history line {line}: '{content}'")]
    MalformedHistory { line: usize, content: String },
}

/// One rostered pick: the slot it filled and the candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RosterEntry {
    pub pick: usize,
    pub slot: SlotIndex,
    pub candidate: CandidateId,
}

/// The real, committed state of a draft.
#[derive(Debug, Clone)]
pub struct DraftSession {
    model: SlotModel,
    pool: CandidatePool,
    order: PickOrder,
    state: DraftSnapshot,
}

impl DraftSession {
    pub fn new(model: SlotModel, pool: CandidatePool, order: PickOrder) -> Self {
        let state = DraftSnapshot::new(&model, &pool);
        Self {
            model,
            pool,
            order,
            state,
        }
    }

    #[inline]
    pub fn model(&self) -> &SlotModel {
        &self.model
    }

    #[inline]
    pub fn pool(&self) -> &CandidatePool {
        &self.pool
    }

    #[inline]
    pub fn order(&self) -> &PickOrder {
        &self.order
    }

    #[inline]
    pub fn snapshot(&self) -> &DraftSnapshot {
        &self.state
    }

    #[inline]
    pub fn pick_index(&self) -> usize {
        self.state.pick_index()
    }

    #[inline]
    pub fn history(&self) -> &[Pick] {
        self.state.history()
    }

    pub fn is_complete(&self) -> bool {
        self.state.is_complete(&self.model)
    }

    /// Team on the clock, or `None` once the draft is complete.
    pub fn team_on_clock(&self) -> Option<usize> {
        if self.is_complete() {
            None
        } else {
            Some(self.order.team_for_pick(self.pick_index()))
        }
    }

    /// Commit the next pick by candidate name.
    pub fn commit(&mut self, name: &str) -> Result<Pick, SessionError> {
        let id = self
            .pool
            .by_name(name)
            .map(|c| c.id)
            .ok_or_else(|| SessionError::UnknownCandidate(name.to_string()))?;
        self.commit_id(id)
    }

    /// Commit the next pick by candidate id.
    pub fn commit_id(&mut self, id: CandidateId) -> Result<Pick, SessionError> {
        if self.is_complete() {
            return Err(SessionError::DraftComplete);
        }
        let candidate = self
            .pool
            .get(id)
            .ok_or(SessionError::UnknownCandidateId(id))?;
        if self.state.taken().contains(id) {
            return Err(SessionError::AlreadyTaken(candidate.name.clone()));
        }

        let team = self.state.apply_pick(candidate, &self.model, &self.order)?;
        info!(
            pick = self.state.pick_index() - 1,
            team,
            candidate = %candidate.name,
            "Pick committed"
        );
        Ok(Pick {
            candidate: id,
            team,
        })
    }

    /// Remove the most recent pick. Requirements are rebuilt by replay.
    pub fn undo(&mut self) -> Result<Option<Pick>, SessionError> {
        let Some(&last) = self.state.history().last() else {
            return Ok(None);
        };
        let rebuilt = DraftSnapshot::build(
            self.state.pick_index() - 1,
            self.state.history(),
            &self.model,
            &self.pool,
        )?;
        self.state = rebuilt;
        debug!(pick = self.state.pick_index(), "Pick undone");
        Ok(Some(last))
    }

    /// Trade a future pick to another team.
    pub fn give_pick(&mut self, pick: usize, team: usize) -> Result<(), SessionError> {
        if pick < self.pick_index() {
            return Err(SessionError::PickAlreadyMade { pick });
        }
        self.order.assign(pick, team)?;
        info!(pick, team, "Pick traded");
        Ok(())
    }

    /// Picks made by `team` and the slot each one filled.
    pub fn roster(&self, team: usize) -> Vec<RosterEntry> {
        let mut requirements = Requirements::new(&self.model);
        let mut roster = Vec::new();
        for (pick, made) in self.history().iter().enumerate() {
            let Some(candidate) = self.pool.get(made.candidate) else {
                continue;
            };
            if let Ok(slot) = self
                .model
                .fill_slot(candidate.slot, made.team, &mut requirements)
            {
                if made.team == team {
                    roster.push(RosterEntry {
                        pick,
                        slot,
                        candidate: made.candidate,
                    });
                }
            }
        }
        roster
    }

    /// Total projected score of everything `team` has drafted.
    pub fn team_score(&self, team: usize) -> f64 {
        self.history()
            .iter()
            .filter(|p| p.team == team)
            .filter_map(|p| self.pool.get(p.candidate))
            .map(|c| c.score)
            .sum()
    }

    /// Best untaken candidates for `slot`.
    pub fn available(&self, slot: SlotIndex, limit: usize) -> Vec<&Candidate> {
        self.pool.available(slot, self.state.taken(), limit)
    }

    /// Write the pick history as one candidate id per line.
    pub fn save_history<W: Write>(&self, mut writer: W) -> Result<(), SessionError> {
        for pick in self.history() {
            writeln!(writer, "{}", pick.candidate)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Reset the draft and replay a saved history, validating every pick.
    ///
    /// On error the session keeps the state it had before the call.
    pub fn load_history<R: BufRead>(&mut self, reader: R) -> Result<(), SessionError> {
        let fresh = DraftSnapshot::new(&self.model, &self.pool);
        let previous = std::mem::replace(&mut self.state, fresh);
        if let Err(e) = self.replay(reader) {
            self.state = previous;
            return Err(e);
        }
        debug!(picks = self.pick_index(), "History loaded");
        Ok(())
    }

    fn replay<R: BufRead>(&mut self, reader: R) -> Result<(), SessionError> {
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let id: CandidateId =
                trimmed
                    .parse()
                    .map_err(|_| SessionError::MalformedHistory {
                        line: index + 1,
                        content: line.clone(),
                    })?;
            self.commit_id(id)?;
        }
        Ok(())
    }
}
