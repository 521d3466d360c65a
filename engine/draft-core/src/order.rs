//! Pick-order oracle.
//!
//! Snake order: team order reverses every round. Individual picks can be
//! reassigned to another team (trades) before they are made.

use thiserror::Error;

use crate::slots::SlotModel;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    #[error("pick {pick} is out of range (draft has {total} picks)")]
    PickOutOfRange { pick: usize, total: usize },

    #[error("team {team} does not exist (draft has {num_teams} teams)")]
    UnknownTeam { team: usize, num_teams: usize },
}

/// Team on the clock for every pick of the draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickOrder {
    num_teams: usize,
    teams: Vec<usize>,
}

impl PickOrder {
    /// Snake order for `total_picks` picks among `num_teams` teams.
    pub fn snake(num_teams: usize, total_picks: usize) -> Self {
        let teams = (0..total_picks)
            .map(|pick| {
                let round = pick / num_teams;
                let offset = pick % num_teams;
                if round % 2 == 0 {
                    offset
                } else {
                    num_teams - 1 - offset
                }
            })
            .collect();
        Self { num_teams, teams }
    }

    /// Snake order covering a full draft of `model`.
    pub fn for_model(model: &SlotModel) -> Self {
        Self::snake(model.num_teams(), model.total_picks())
    }

    /// Team that makes pick `pick`.
    #[inline]
    pub fn team_for_pick(&self, pick: usize) -> usize {
        self.teams[pick]
    }

    /// Reassign a single pick to another team.
    pub fn assign(&mut self, pick: usize, team: usize) -> Result<(), OrderError> {
        if pick >= self.teams.len() {
            return Err(OrderError::PickOutOfRange {
                pick,
                total: self.teams.len(),
            });
        }
        if team >= self.num_teams {
            return Err(OrderError::UnknownTeam {
                team,
                num_teams: self.num_teams,
            });
        }
        self.teams[pick] = team;
        Ok(())
    }

    #[inline]
    pub fn num_teams(&self) -> usize {
        self.num_teams
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.teams.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    /// Picks owned by `team`, in draft order.
    pub fn picks_for_team(&self, team: usize) -> impl Iterator<Item = usize> + '_ {
        self.teams
            .iter()
            .enumerate()
            .filter(move |(_, &t)| t == team)
            .map(|(pick, _)| pick)
    }
}
