use crate::planner::catalog::Catalog;
use crate::planner::domain::{AvailabilityState, Candidate, CandidateId, GroupId, Position};
use crate::planner::scoring::{ScoreBreakdown, ScoredCandidate};
use crate::planner::squad::SquadMember;

pub(super) fn candidate(id: u32, position: Position, group: u32, cost: u32) -> Candidate {
    Candidate {
        id: CandidateId(id),
        name: format!("Player {id}"),
        name_key: format!("player {id}"),
        position,
        group: GroupId(group),
        group_name: format!("group-{group}"),
        cost,
        projected_value: 0.0,
        recent_form: 0.0,
        influence_index: 0.0,
        availability: AvailabilityState::Available,
    }
}

pub(super) fn scored(
    id: u32,
    position: Position,
    group: u32,
    cost: u32,
    score: f64,
) -> ScoredCandidate {
    ScoredCandidate {
        candidate: candidate(id, position, group, cost),
        breakdown: ScoreBreakdown {
            base: score,
            availability_multiplier: 1.0,
            position_multiplier: 1.0,
            signal: 0.0,
            total: score,
        },
    }
}

pub(super) fn member(id: u32, position: Position, score: f64) -> SquadMember {
    SquadMember {
        id: CandidateId(id),
        name: format!("Player {id}"),
        position,
        group: GroupId(id),
        cost: 50,
        score,
    }
}

pub(super) fn ids(raw: &[u32]) -> Vec<CandidateId> {
    raw.iter().copied().map(CandidateId).collect()
}

/// 2/5/5/3 squad; scores descend with the id inside each position.
pub(super) fn full_squad() -> Vec<SquadMember> {
    vec![
        member(1, Position::Goalkeeper, 40.0),
        member(2, Position::Goalkeeper, 38.0),
        member(3, Position::Defender, 55.0),
        member(4, Position::Defender, 50.0),
        member(5, Position::Defender, 45.0),
        member(6, Position::Defender, 30.0),
        member(7, Position::Defender, 20.0),
        member(8, Position::Midfielder, 90.0),
        member(9, Position::Midfielder, 70.0),
        member(10, Position::Midfielder, 60.0),
        member(11, Position::Midfielder, 35.0),
        member(12, Position::Midfielder, 25.0),
        member(13, Position::Forward, 85.0),
        member(14, Position::Forward, 65.0),
        member(15, Position::Forward, 42.0),
    ]
}

/// A 30-player market: 4 GK, 10 DEF, 10 MID, 6 FWD spread over 10 clubs. Cheap enough that a
/// full squad fits the default budget.
pub(super) fn market() -> Catalog {
    let layout: [(Position, u32, u32); 4] = [
        (Position::Goalkeeper, 4, 45),
        (Position::Defender, 10, 50),
        (Position::Midfielder, 10, 70),
        (Position::Forward, 6, 75),
    ];

    let mut candidates = Vec::new();
    let mut next_id = 100;
    for (position, count, cost) in layout {
        for rank in 0..count {
            let mut entry = candidate(next_id, position, (next_id % 10) + 1, cost);
            entry.projected_value = 8.0 - f64::from(rank) * 0.5;
            entry.recent_form = 4.0 + f64::from(rank % 3);
            entry.influence_index = 20.0 - f64::from(rank);
            candidates.push(entry);
            next_id += 1;
        }
    }

    Catalog::from_candidates(candidates).expect("market ids are unique")
}
