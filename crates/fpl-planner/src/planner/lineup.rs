use super::domain::{CandidateId, Position, PositionTable};
use super::squad::SquadMember;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Formation constraints for the starting lineup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineupRules {
    pub size: u8,
    pub minima: PositionTable<u8>,
    /// `None` leaves a position uncapped.
    pub maxima: PositionTable<Option<u8>>,
}

impl Default for LineupRules {
    fn default() -> Self {
        Self {
            size: 11,
            minima: PositionTable::new(1, 3, 2, 1),
            maxima: PositionTable::new(Some(1), None, None, Some(3)),
        }
    }
}

/// A formation minimum the squad could not satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormationGap {
    pub position: Position,
    pub required: u8,
    pub selected: u8,
}

/// One entry of the picks payload. Slots 1-11 start, the rest are the bench in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pick {
    pub element: CandidateId,
    pub position: u8,
    pub is_captain: bool,
    pub is_vice_captain: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lineup {
    /// Formation minima first, then the fill, in the order they were chosen.
    pub starters: Vec<CandidateId>,
    pub captain: Option<CandidateId>,
    pub vice: Option<CandidateId>,
    /// Reserve goalkeepers first, then everyone else best score first.
    pub bench: Vec<CandidateId>,
    pub required: usize,
    pub gaps: Vec<FormationGap>,
}

impl Lineup {
    pub fn is_complete(&self) -> bool {
        self.starters.len() == self.required && self.gaps.is_empty()
    }

    pub fn picks(&self) -> Vec<Pick> {
        self.starters
            .iter()
            .chain(self.bench.iter())
            .enumerate()
            .map(|(slot, id)| Pick {
                element: *id,
                position: u8::try_from(slot + 1).unwrap_or(u8::MAX),
                is_captain: Some(*id) == self.captain,
                is_vice_captain: Some(*id) == self.vice,
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct LineupSelector {
    rules: LineupRules,
}

impl LineupSelector {
    pub fn new(rules: LineupRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &LineupRules {
        &self.rules
    }

    pub fn select(&self, squad: &[SquadMember]) -> Lineup {
        let size = usize::from(self.rules.size);
        let mut ranked: Vec<&SquadMember> = Vec::with_capacity(squad.len());
        for member in squad {
            if !ranked.iter().any(|seen| seen.id == member.id) {
                ranked.push(member);
            }
        }
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));

        let mut starters: Vec<&SquadMember> = Vec::with_capacity(size);
        let mut taken: HashSet<CandidateId> = HashSet::new();
        let mut counts: PositionTable<u8> = PositionTable::default();

        for position in Position::ALL {
            let minimum = usize::from(*self.rules.minima.get(position));
            for member in ranked
                .iter()
                .filter(|member| member.position == position)
                .take(minimum)
            {
                if starters.len() == size {
                    break;
                }
                starters.push(*member);
                taken.insert(member.id);
                *counts.get_mut(position) += 1;
            }
        }

        for member in &ranked {
            if starters.len() >= size {
                break;
            }
            if taken.contains(&member.id) {
                continue;
            }
            if let Some(max) = self.rules.maxima.get(member.position) {
                if *counts.get(member.position) >= *max {
                    continue;
                }
            }
            starters.push(*member);
            taken.insert(member.id);
            *counts.get_mut(member.position) += 1;
        }

        let gaps: Vec<FormationGap> = Position::ALL
            .iter()
            .filter_map(|position| {
                let required = *self.rules.minima.get(*position);
                let selected = *counts.get(*position);
                (selected < required).then_some(FormationGap {
                    position: *position,
                    required,
                    selected,
                })
            })
            .collect();

        let mut by_score: Vec<&SquadMember> = starters.clone();
        by_score.sort_by(|a, b| b.score.total_cmp(&a.score));
        let captain = by_score.first().map(|member| member.id);
        let vice = by_score.get(1).map(|member| member.id);

        let mut bench: Vec<&SquadMember> = ranked
            .iter()
            .copied()
            .filter(|member| !taken.contains(&member.id))
            .collect();
        bench.sort_by_key(|member| member.position != Position::Goalkeeper);

        if starters.len() < size || !gaps.is_empty() {
            warn!(
                selected = starters.len(),
                required = size,
                unmet = gaps.len(),
                "lineup could not satisfy the formation"
            );
        }
        debug!(
            starters = starters.len(),
            bench = bench.len(),
            captain = ?captain,
            vice = ?vice,
            "lineup selected"
        );

        Lineup {
            starters: starters.iter().map(|member| member.id).collect(),
            captain,
            vice,
            bench: bench.iter().map(|member| member.id).collect(),
            required: size,
            gaps,
        }
    }
}
