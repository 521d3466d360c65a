//! Draft snapshots.
//!
//! A [`DraftSnapshot`] is a self-contained record of draft progress: the
//! current pick index, the ordered pick history, the taken set, and every
//! team's remaining requirements. Snapshots own all of their buffers, so a
//! search can keep a master copy, a working copy, and a rollout copy side by
//! side and reset one from another with [`DraftSnapshot::overwrite`].

use thiserror::Error;

use crate::candidates::{Candidate, CandidateId, CandidatePool, TakenSet};
use crate::order::PickOrder;
use crate::slots::{Requirements, RosterFull, SlotIndex, SlotModel};

/// One made pick. Its position in the history is the overall pick number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pick {
    pub candidate: CandidateId,
    pub team: usize,
}

/// Errors that can occur while rebuilding a snapshot from history.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    #[error("pick index {pick} is past the end of a {history}-pick history")]
    HistoryTooShort { pick: usize, history: usize },

    #[error("pick {pick} references unknown candidate {candidate}")]
    UnknownCandidate { pick: usize, candidate: CandidateId },

    #[error("pick {pick} takes candidate {candidate}, who was already taken")]
    AlreadyTaken { pick: usize, candidate: CandidateId },

    #[error("pick {pick} references team {team}, but the draft has {num_teams} teams")]
    UnknownTeam {
        pick: usize,
        team: usize,
        num_teams: usize,
    },

    #[error("pick {pick} cannot be rostered: {source}")]
    Roster {
        pick: usize,
        #[source]
        source: RosterFull,
    },
}

/// Deep-copyable draft progress.
#[derive(Debug, PartialEq, Eq)]
pub struct DraftSnapshot {
    pick: usize,
    history: Vec<Pick>,
    taken: TakenSet,
    requirements: Requirements,
}

impl DraftSnapshot {
    /// Snapshot at the start of a draft.
    pub fn new(model: &SlotModel, pool: &CandidatePool) -> Self {
        Self {
            pick: 0,
            history: Vec::with_capacity(model.total_picks()),
            taken: TakenSet::new(pool.len()),
            requirements: Requirements::new(model),
        }
    }

    /// Rebuild the snapshot at `pick` by replaying `history[..pick]`.
    ///
    /// Requirements start from the configured defaults and every prior pick
    /// is re-rostered in order, so the result is consistent with the history
    /// by construction.
    pub fn build(
        pick: usize,
        history: &[Pick],
        model: &SlotModel,
        pool: &CandidatePool,
    ) -> Result<Self, SnapshotError> {
        if pick > history.len() {
            return Err(SnapshotError::HistoryTooShort {
                pick,
                history: history.len(),
            });
        }

        let mut snapshot = Self::new(model, pool);
        for (index, made) in history[..pick].iter().enumerate() {
            let candidate = pool
                .get(made.candidate)
                .ok_or(SnapshotError::UnknownCandidate {
                    pick: index,
                    candidate: made.candidate,
                })?;
            if made.team >= model.num_teams() {
                return Err(SnapshotError::UnknownTeam {
                    pick: index,
                    team: made.team,
                    num_teams: model.num_teams(),
                });
            }
            if snapshot.taken.contains(candidate.id) {
                return Err(SnapshotError::AlreadyTaken {
                    pick: index,
                    candidate: candidate.id,
                });
            }
            snapshot
                .record(candidate, made.team, model)
                .map_err(|source| SnapshotError::Roster {
                    pick: index,
                    source,
                })?;
        }
        Ok(snapshot)
    }

    /// Make the next pick for whichever team is on the clock.
    ///
    /// Does not check availability; callers only propose untaken candidates
    /// the team can roster. Returns the team that picked.
    pub fn apply_pick(
        &mut self,
        candidate: &Candidate,
        model: &SlotModel,
        order: &PickOrder,
    ) -> Result<usize, RosterFull> {
        let team = order.team_for_pick(self.pick);
        self.record(candidate, team, model)?;
        Ok(team)
    }

    fn record(
        &mut self,
        candidate: &Candidate,
        team: usize,
        model: &SlotModel,
    ) -> Result<SlotIndex, RosterFull> {
        let filled = model.fill_slot(candidate.slot, team, &mut self.requirements)?;
        self.history.push(Pick {
            candidate: candidate.id,
            team,
        });
        self.taken.insert(candidate.id);
        self.pick += 1;
        Ok(filled)
    }

    /// Deep-copy `src` into `self`, reusing this snapshot's allocations.
    pub fn overwrite(&mut self, src: &Self) {
        self.clone_from(src);
    }

    #[inline]
    pub fn pick_index(&self) -> usize {
        self.pick
    }

    #[inline]
    pub fn history(&self) -> &[Pick] {
        &self.history
    }

    #[inline]
    pub fn taken(&self) -> &TakenSet {
        &self.taken
    }

    #[inline]
    pub fn requirements(&self) -> &Requirements {
        &self.requirements
    }

    #[inline]
    pub fn is_complete(&self, model: &SlotModel) -> bool {
        self.pick >= model.total_picks()
    }

    /// Slots `team` still needs to fill.
    pub fn open_slots(&self, team: usize) -> impl Iterator<Item = SlotIndex> + '_ {
        self.requirements
            .team(team)
            .iter()
            .enumerate()
            .filter(|(_, &n)| n > 0)
            .map(|(slot, _)| slot)
    }
}

impl Clone for DraftSnapshot {
    fn clone(&self) -> Self {
        Self {
            pick: self.pick,
            history: self.history.clone(),
            taken: self.taken.clone(),
            requirements: self.requirements.clone(),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.pick = source.pick;
        self.history.clone_from(&source.history);
        self.taken.clone_from(&source.taken);
        self.requirements.clone_from(&source.requirements);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slots::SlotSpec;

    struct Fixture {
        model: SlotModel,
        pool: CandidatePool,
        order: PickOrder,
    }

    fn fixture() -> Fixture {
        let model = SlotModel::new(
            2,
            &[
                SlotSpec::new("QB", 1),
                SlotSpec::new("RB", 1),
                SlotSpec::flex("FLEX", 1, &["RB"]),
            ],
        )
        .unwrap();
        let pool = CandidatePool::new(
            &model,
            vec![
                ("Q1".to_string(), 0, 30.0),
                ("Q2".to_string(), 0, 25.0),
                ("R1".to_string(), 1, 20.0),
                ("R2".to_string(), 1, 18.0),
                ("R3".to_string(), 1, 12.0),
                ("R4".to_string(), 1, 8.0),
            ],
        );
        let order = PickOrder::for_model(&model);
        Fixture { model, pool, order }
    }

    fn id(f: &Fixture, name: &str) -> CandidateId {
        f.pool.by_name(name).unwrap().id
    }

    #[test]
    fn test_apply_pick_advances_and_records() {
        let f = fixture();
        let mut snap = DraftSnapshot::new(&f.model, &f.pool);
        let r1 = f.pool.by_name("R1").unwrap();

        let team = snap.apply_pick(r1, &f.model, &f.order).unwrap();
        assert_eq!(team, 0);
        assert_eq!(snap.pick_index(), 1);
        assert_eq!(snap.history(), &[Pick { candidate: r1.id, team: 0 }]);
        assert!(snap.taken().contains(r1.id));
        assert_eq!(snap.requirements().team(0), &[1, 0, 1]);
        assert_eq!(snap.history().len(), snap.pick_index());
    }

    #[test]
    fn test_build_replays_history() {
        let f = fixture();
        let mut live = DraftSnapshot::new(&f.model, &f.pool);
        for name in ["R1", "R2", "R3", "Q1"] {
            let c = f.pool.by_name(name).unwrap();
            live.apply_pick(c, &f.model, &f.order).unwrap();
        }

        let rebuilt = DraftSnapshot::build(4, live.history(), &f.model, &f.pool).unwrap();
        assert_eq!(rebuilt, live);
        // Team 1 picked R2 and R3: RB then FLEX
        assert_eq!(rebuilt.requirements().team(1), &[1, 0, 0]);

        let partial = DraftSnapshot::build(2, live.history(), &f.model, &f.pool).unwrap();
        assert_eq!(partial.pick_index(), 2);
        assert!(!partial.taken().contains(id(&f, "R3")));
    }

    #[test]
    fn test_build_rejects_inconsistent_history() {
        let f = fixture();
        let q1 = id(&f, "Q1");
        let q2 = id(&f, "Q2");

        let err = DraftSnapshot::build(1, &[], &f.model, &f.pool).unwrap_err();
        assert_eq!(err, SnapshotError::HistoryTooShort { pick: 1, history: 0 });

        let dup = [Pick { candidate: q1, team: 0 }, Pick { candidate: q1, team: 1 }];
        assert!(matches!(
            DraftSnapshot::build(2, &dup, &f.model, &f.pool),
            Err(SnapshotError::AlreadyTaken { pick: 1, .. })
        ));

        let full = [Pick { candidate: q1, team: 0 }, Pick { candidate: q2, team: 0 }];
        assert!(matches!(
            DraftSnapshot::build(2, &full, &f.model, &f.pool),
            Err(SnapshotError::Roster { pick: 1, .. })
        ));

        let ghost = [Pick { candidate: 99, team: 0 }];
        assert!(matches!(
            DraftSnapshot::build(1, &ghost, &f.model, &f.pool),
            Err(SnapshotError::UnknownCandidate { pick: 0, candidate: 99 })
        ));
    }

    #[test]
    fn test_overwrite_after_build_is_identical() {
        let f = fixture();
        let history = [Pick { candidate: id(&f, "Q1"), team: 0 }];
        let src = DraftSnapshot::build(1, &history, &f.model, &f.pool).unwrap();
        let mut dst = DraftSnapshot::build(1, &history, &f.model, &f.pool).unwrap();
        dst.apply_pick(f.pool.by_name("R1").unwrap(), &f.model, &f.order)
            .unwrap();

        dst.overwrite(&src);
        assert_eq!(dst, src);
    }

    #[test]
    fn test_snapshots_never_alias() {
        let f = fixture();
        let master = DraftSnapshot::new(&f.model, &f.pool);
        let mut branch_a = master.clone();
        let mut branch_b = DraftSnapshot::new(&f.model, &f.pool);
        branch_b.overwrite(&master);

        branch_a
            .apply_pick(f.pool.by_name("Q1").unwrap(), &f.model, &f.order)
            .unwrap();
        let frozen_a = branch_a.clone();

        branch_b
            .apply_pick(f.pool.by_name("R1").unwrap(), &f.model, &f.order)
            .unwrap();
        branch_b
            .apply_pick(f.pool.by_name("R2").unwrap(), &f.model, &f.order)
            .unwrap();

        assert_eq!(master.pick_index(), 0);
        assert!(master.history().is_empty());
        assert_eq!(master.requirements().team(0), &[1, 1, 1]);
        assert_eq!(branch_a, frozen_a);
        assert!(!branch_a.taken().contains(id(&f, "R1")));
    }

    #[test]
    fn test_open_slots_tracks_requirements() {
        let f = fixture();
        let mut snap = DraftSnapshot::new(&f.model, &f.pool);
        assert_eq!(snap.open_slots(0).collect::<Vec<_>>(), vec![0, 1, 2]);
        snap.apply_pick(f.pool.by_name("Q1").unwrap(), &f.model, &f.order)
            .unwrap();
        assert_eq!(snap.open_slots(0).collect::<Vec<_>>(), vec![1, 2]);
        assert!(!snap.is_complete(&f.model));
    }
}
