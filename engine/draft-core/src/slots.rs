//! Roster slot model.
//!
//! A roster is a fixed list of slots, each requiring some number of
//! candidates. Flex slots can additionally be filled by candidates of any of
//! their constituent slots. Constituents must be defined before the flex slot
//! that references them, which keeps flex resolution acyclic.

use serde::Deserialize;
use thiserror::Error;

/// Dense, 0-based index of a slot in the [`SlotModel`].
pub type SlotIndex = usize;

/// Raw slot definition as it appears in configuration.
///
/// Fields are optional so that every slot can be validated and all problems
/// reported together rather than failing on the first missing field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SlotSpec {
    pub name: Option<String>,
    #[serde(alias = "required")]
    pub number_required: Option<u32>,
    #[serde(default, alias = "flex_slots")]
    pub flex: Vec<String>,
}

impl SlotSpec {
    pub fn new(name: &str, number_required: u32) -> Self {
        Self {
            name: Some(name.to_string()),
            number_required: Some(number_required),
            flex: Vec::new(),
        }
    }

    pub fn flex(name: &str, number_required: u32, constituents: &[&str]) -> Self {
        Self {
            name: Some(name.to_string()),
            number_required: Some(number_required),
            flex: constituents.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// A single problem found while validating slot definitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlotProblem {
    #[error("draft must have at least one team")]
    NoTeams,

    #[error("draft must define at least one slot")]
    NoSlots,

    #[error("slot {index} is missing 'name'")]
    MissingName { index: usize },

    #[error("slot {index} ('{name}') is missing 'number_required'")]
    MissingRequired { index: usize, name: String },

    #[error("slot {index}: name '{name}' is already used by an earlier slot")]
    DuplicateName { index: usize, name: String },

    #[error("flex slot '{slot}': could not find slot '{reference}'")]
    UnknownFlexSlot { slot: String, reference: String },

    #[error("flex slot '{slot}': '{reference}' must be defined before the flex slot")]
    ForwardFlexReference { slot: String, reference: String },
}

/// Slot configuration failed validation. Carries every problem found.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid slot configuration: {}", join_problems(.problems))]
pub struct SlotConfigError {
    pub problems: Vec<SlotProblem>,
}

fn join_problems(problems: &[SlotProblem]) -> String {
    problems
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// No exact or flex slot has capacity for the candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("team {team} has no open roster slot for a slot {slot} candidate")]
pub struct RosterFull {
    pub team: usize,
    pub slot: SlotIndex,
}

/// A validated roster slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub index: SlotIndex,
    pub name: String,
    pub required: u32,
    /// Constituent slots this flex slot also accepts (empty for plain slots).
    /// Resolved transitively, so a flex of a flex lists the inner constituents.
    pub flex: Vec<SlotIndex>,
}

impl Slot {
    #[inline]
    pub fn is_flex(&self) -> bool {
        !self.flex.is_empty()
    }

    #[inline]
    pub fn accepts(&self, slot: SlotIndex) -> bool {
        self.flex.contains(&slot)
    }
}

/// Team count plus the ordered roster slots. Read-only during a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotModel {
    num_teams: usize,
    slots: Vec<Slot>,
}

impl SlotModel {
    /// Validate raw slot definitions and build the model.
    pub fn new(num_teams: usize, specs: &[SlotSpec]) -> Result<Self, SlotConfigError> {
        let mut problems = Vec::new();
        if num_teams == 0 {
            problems.push(SlotProblem::NoTeams);
        }
        if specs.is_empty() {
            problems.push(SlotProblem::NoSlots);
        }

        let mut slots: Vec<Slot> = Vec::with_capacity(specs.len());
        for (index, spec) in specs.iter().enumerate() {
            let name = match spec.name.as_deref().map(str::trim) {
                Some(name) if !name.is_empty() => name.to_string(),
                _ => {
                    problems.push(SlotProblem::MissingName { index });
                    format!("#{index}")
                }
            };

            let required = match spec.number_required {
                Some(n) => n,
                None => {
                    problems.push(SlotProblem::MissingRequired {
                        index,
                        name: name.clone(),
                    });
                    0
                }
            };

            if slots.iter().any(|s| s.name == name) {
                problems.push(SlotProblem::DuplicateName {
                    index,
                    name: name.clone(),
                });
            }

            let mut flex = Vec::with_capacity(spec.flex.len());
            for reference in &spec.flex {
                let reference = reference.trim();
                if let Some(earlier) = slots.iter().find(|s| s.name == reference) {
                    // Nested flex: the earlier slot's constituents are accepted too
                    let nested = std::iter::once(earlier.index).chain(earlier.flex.iter().copied());
                    for index in nested {
                        if !flex.contains(&index) {
                            flex.push(index);
                        }
                    }
                } else if specs[index..]
                    .iter()
                    .any(|s| s.name.as_deref().map(str::trim) == Some(reference))
                {
                    problems.push(SlotProblem::ForwardFlexReference {
                        slot: name.clone(),
                        reference: reference.to_string(),
                    });
                } else {
                    problems.push(SlotProblem::UnknownFlexSlot {
                        slot: name.clone(),
                        reference: reference.to_string(),
                    });
                }
            }

            slots.push(Slot {
                index,
                name,
                required,
                flex,
            });
        }

        if problems.is_empty() {
            Ok(Self { num_teams, slots })
        } else {
            Err(SlotConfigError { problems })
        }
    }

    #[inline]
    pub fn num_teams(&self) -> usize {
        self.num_teams
    }

    #[inline]
    pub fn num_slots(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    #[inline]
    pub fn slot(&self, index: SlotIndex) -> &Slot {
        &self.slots[index]
    }

    pub fn slot_by_name(&self, name: &str) -> Option<&Slot> {
        self.slots.iter().find(|s| s.name == name)
    }

    /// Map a free-form position label (e.g. "RB2", "WR/KR") to a slot.
    ///
    /// The first slot, in index order, whose name occurs in the label wins.
    pub fn slot_for_label(&self, label: &str) -> Option<SlotIndex> {
        let label = label.trim();
        self.slots
            .iter()
            .find(|s| label.contains(s.name.as_str()))
            .map(|s| s.index)
    }

    /// Roster size of a single team.
    pub fn picks_per_team(&self) -> usize {
        self.slots.iter().map(|s| s.required as usize).sum()
    }

    /// Total number of picks in a full draft.
    pub fn total_picks(&self) -> usize {
        self.picks_per_team() * self.num_teams
    }

    /// Fill one roster spot of `team` with a candidate belonging to `slot`.
    ///
    /// The candidate's own slot is used first; otherwise the first flex slot
    /// (in index order) that accepts it and still has room. Returns the slot
    /// that was decremented. On failure the requirements are unchanged.
    pub fn fill_slot(
        &self,
        slot: SlotIndex,
        team: usize,
        requirements: &mut Requirements,
    ) -> Result<SlotIndex, RosterFull> {
        let target = self.open_slot_for(slot, requirements.team(team));
        match target {
            Some(target) => {
                requirements.decrement(team, target);
                Ok(target)
            }
            None => Err(RosterFull { team, slot }),
        }
    }

    /// Slot that [`fill_slot`](Self::fill_slot) would decrement, if any.
    pub fn open_slot_for(&self, slot: SlotIndex, remaining: &[u32]) -> Option<SlotIndex> {
        if remaining[slot] > 0 {
            return Some(slot);
        }
        self.slots
            .iter()
            .find(|s| s.is_flex() && remaining[s.index] > 0 && s.accepts(slot))
            .map(|s| s.index)
    }
}

/// Per-team remaining requirement counts, one entry per slot.
#[derive(Debug, PartialEq, Eq)]
pub struct Requirements {
    num_slots: usize,
    remaining: Vec<u32>,
}

impl Requirements {
    /// Fresh requirements: every team needs the configured counts.
    pub fn new(model: &SlotModel) -> Self {
        let defaults: Vec<u32> = model.slots().iter().map(|s| s.required).collect();
        let mut remaining = Vec::with_capacity(defaults.len() * model.num_teams());
        for _ in 0..model.num_teams() {
            remaining.extend_from_slice(&defaults);
        }
        Self {
            num_slots: defaults.len(),
            remaining,
        }
    }

    #[inline]
    pub fn remaining(&self, team: usize, slot: SlotIndex) -> u32 {
        self.remaining[team * self.num_slots + slot]
    }

    #[inline]
    pub fn team(&self, team: usize) -> &[u32] {
        let start = team * self.num_slots;
        &self.remaining[start..start + self.num_slots]
    }

    pub fn num_teams(&self) -> usize {
        if self.num_slots == 0 {
            0
        } else {
            self.remaining.len() / self.num_slots
        }
    }

    /// Total open roster spots left for a team.
    pub fn open_spots(&self, team: usize) -> u32 {
        self.team(team).iter().sum()
    }

    fn decrement(&mut self, team: usize, slot: SlotIndex) {
        let entry = &mut self.remaining[team * self.num_slots + slot];
        debug_assert!(*entry > 0);
        *entry -= 1;
    }
}

impl Clone for Requirements {
    fn clone(&self) -> Self {
        Self {
            num_slots: self.num_slots,
            remaining: self.remaining.clone(),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.num_slots = source.num_slots;
        self.remaining.clone_from(&source.remaining);
    }
}
