//! Greedy squad construction.
//!
//! Positions are filled one at a time in [`Position::ALL`] order. Within a position the
//! candidates are walked best score first and a candidate is taken when the position still has
//! room, its group is under the cap and its cost fits the remaining budget. There is no
//! backtracking: money spent on early positions is never reconsidered, so the result can miss a
//! feasible squad with a higher total score. It never breaks the budget, the group cap or the
//! per-position counts, but it can come up short, which is reported through
//! [`SquadSelection::shortfalls`].

use super::domain::{CandidateId, GroupId, Position, PositionTable};
use super::scoring::{by_score_desc, ScoredCandidate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

/// Hard constraints on a squad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SquadRules {
    /// Spending ceiling in tenths.
    pub budget: u32,
    pub group_cap: u8,
    pub shape: PositionTable<u8>,
}

impl SquadRules {
    pub fn size(&self) -> usize {
        self.shape.total()
    }
}

impl Default for SquadRules {
    fn default() -> Self {
        Self {
            budget: 1000,
            group_cap: 3,
            shape: PositionTable::new(2, 5, 5, 3),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SquadMember {
    pub id: CandidateId,
    pub name: String,
    pub position: Position,
    pub group: GroupId,
    pub cost: u32,
    pub score: f64,
}

impl From<&ScoredCandidate> for SquadMember {
    fn from(entry: &ScoredCandidate) -> Self {
        Self {
            id: entry.candidate.id,
            name: entry.candidate.name.clone(),
            position: entry.candidate.position,
            group: entry.candidate.group,
            cost: entry.candidate.cost,
            score: entry.score(),
        }
    }
}

/// A position that could not be filled to its required count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionShortfall {
    pub position: Position,
    pub required: u8,
    pub selected: u8,
}

/// A group holding more members than the cap allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupBreach {
    pub group: GroupId,
    pub cap: u8,
    pub count: usize,
}

/// A position whose count differs from the squad shape, in either direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeDeviation {
    pub position: Position,
    pub required: u8,
    pub actual: usize,
}

/// Constraint check of an existing roster against [`SquadRules`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SquadAudit {
    /// Ordered by group id.
    pub group_breaches: Vec<GroupBreach>,
    /// Ordered by [`Position::ALL`].
    pub shape_deviations: Vec<ShapeDeviation>,
}

impl SquadAudit {
    pub fn is_clean(&self) -> bool {
        self.group_breaches.is_empty() && self.shape_deviations.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SquadSelection {
    /// Selection order: position by position, best score first within each.
    pub members: Vec<SquadMember>,
    pub total_cost: u32,
    pub remaining_budget: u32,
    pub required: usize,
    pub shortfalls: Vec<PositionShortfall>,
}

impl SquadSelection {
    pub fn ids(&self) -> Vec<CandidateId> {
        self.members.iter().map(|member| member.id).collect()
    }

    /// Member ids best score first; equal scores keep selection order.
    pub fn ranked_ids(&self) -> Vec<CandidateId> {
        let mut ranked: Vec<&SquadMember> = self.members.iter().collect();
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranked.into_iter().map(|member| member.id).collect()
    }

    pub fn is_complete(&self) -> bool {
        self.shortfalls.is_empty() && self.members.len() == self.required
    }
}

#[derive(Debug, Clone, Default)]
pub struct SquadSelector {
    rules: SquadRules,
}

impl SquadSelector {
    pub fn new(rules: SquadRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &SquadRules {
        &self.rules
    }

    /// Counts `members` per group and per position. Transfers swap ids without regard to
    /// either, so a roster reached through them can break rules a fresh selection never does.
    pub fn audit(&self, members: &[SquadMember]) -> SquadAudit {
        let mut per_group: BTreeMap<GroupId, usize> = BTreeMap::new();
        let mut per_position: PositionTable<usize> = PositionTable::default();
        for member in members {
            *per_group.entry(member.group).or_insert(0) += 1;
            *per_position.get_mut(member.position) += 1;
        }

        let cap = self.rules.group_cap;
        let group_breaches: Vec<GroupBreach> = per_group
            .into_iter()
            .filter(|(_, count)| *count > usize::from(cap))
            .map(|(group, count)| GroupBreach { group, cap, count })
            .collect();

        let shape_deviations: Vec<ShapeDeviation> = Position::ALL
            .iter()
            .filter_map(|position| {
                let required = *self.rules.shape.get(*position);
                let actual = *per_position.get(*position);
                (actual != usize::from(required)).then_some(ShapeDeviation {
                    position: *position,
                    required,
                    actual,
                })
            })
            .collect();

        if !group_breaches.is_empty() || !shape_deviations.is_empty() {
            warn!(
                group_breaches = group_breaches.len(),
                shape_deviations = shape_deviations.len(),
                "roster breaks the squad rules"
            );
        }

        SquadAudit {
            group_breaches,
            shape_deviations,
        }
    }

    /// `pool` order is the tie-break order for equal scores.
    pub fn select(&self, pool: &[ScoredCandidate]) -> SquadSelection {
        let mut remaining = self.rules.budget;
        let mut group_counts: HashMap<GroupId, u8> = HashMap::new();
        let mut members = Vec::with_capacity(self.rules.size());
        let mut shortfalls = Vec::new();

        for position in Position::ALL {
            let required = *self.rules.shape.get(position);
            let mut need = required;

            let mut candidates: Vec<&ScoredCandidate> = pool
                .iter()
                .filter(|entry| entry.candidate.position == position)
                .collect();
            candidates.sort_by(|a, b| by_score_desc(a, b));

            for entry in candidates {
                if need == 0 {
                    break;
                }
                if members
                    .iter()
                    .any(|member: &SquadMember| member.id == entry.id())
                {
                    continue;
                }

                let group_count = group_counts.entry(entry.candidate.group).or_insert(0);
                if *group_count >= self.rules.group_cap {
                    continue;
                }
                if entry.candidate.cost > remaining {
                    continue;
                }

                *group_count += 1;
                remaining -= entry.candidate.cost;
                need -= 1;
                members.push(SquadMember::from(entry));
            }

            if need > 0 {
                warn!(
                    %position,
                    required,
                    selected = required - need,
                    remaining_budget = remaining,
                    "position pool exhausted before squad shape was met"
                );
                shortfalls.push(PositionShortfall {
                    position,
                    required,
                    selected: required - need,
                });
            }
        }

        let total_cost = self.rules.budget - remaining;
        debug!(
            members = members.len(),
            total_cost,
            remaining_budget = remaining,
            "squad selected"
        );

        SquadSelection {
            members,
            total_cost,
            remaining_budget: remaining,
            required: self.rules.size(),
            shortfalls,
        }
    }
}
