use super::common::*;
use crate::config::EngineConfig;
use crate::planner::cycle::{CycleInput, DecisionEngine, DecisionKind, Gameweek};
use crate::planner::catalog::Catalog;
use crate::planner::domain::{CandidateId, GroupId, Position};
use crate::planner::squad::{GroupBreach, ShapeDeviation};
use crate::planner::scoring::SignalMap;
use crate::planner::transfers::PlanStatus;

fn fresh_input() -> CycleInput {
    CycleInput {
        catalog: market(),
        gameweek: Some(Gameweek {
            id: 1,
            deadline: None,
        }),
        ..CycleInput::default()
    }
}

#[test]
fn empty_roster_builds_a_fresh_squad() {
    let engine = DecisionEngine::default();
    let decision = engine.decide(&fresh_input());

    assert_eq!(decision.kind, DecisionKind::FreshSquad);
    assert!(decision.plan.is_none());
    assert_eq!(decision.roster.len(), 15);
    assert_eq!(decision.roster, decision.target.ids());
    assert!(decision.lineup.is_complete());
    assert!(!decision.report.is_degraded());
    assert!(decision
        .lineup
        .starters
        .iter()
        .all(|id| decision.roster.contains(id)));
    assert!(decision.transfer_requests().is_empty());
    assert_eq!(decision.picks().len(), 15);
    assert_eq!(decision.gameweek.map(|gameweek| gameweek.id), Some(1));
}

#[test]
fn owned_target_squad_only_refreshes_the_lineup() {
    let engine = DecisionEngine::default();
    let fresh = engine.decide(&fresh_input());

    let input = CycleInput {
        current_roster: fresh.roster.clone(),
        free_transfers_left: 2,
        ..fresh_input()
    };
    let decision = engine.decide(&input);

    assert_eq!(decision.kind, DecisionKind::Hold);
    let plan = decision.plan.as_ref().expect("incremental cycles plan");
    assert_eq!(plan.status, PlanStatus::AlreadyAligned);
    assert_eq!(decision.roster, fresh.roster);
    assert_eq!(decision.lineup.captain, fresh.lineup.captain);
    assert!(!decision.report.is_degraded());
}

#[test]
fn weak_owned_player_is_swapped_and_lineup_uses_the_new_roster() {
    let engine = DecisionEngine::default();
    let fresh = engine.decide(&fresh_input());

    // Replace the best midfielder with the weakest one in the market.
    let best_mid = fresh
        .target
        .members
        .iter()
        .find(|member| member.position == Position::Midfielder)
        .map(|member| member.id)
        .expect("target has midfielders");
    let mut owned = fresh.roster.clone();
    for id in owned.iter_mut() {
        if *id == best_mid {
            *id = CandidateId(123);
        }
    }

    let input = CycleInput {
        current_roster: owned,
        free_transfers_left: 1,
        ..fresh_input()
    };
    let decision = engine.decide(&input);

    assert_eq!(decision.kind, DecisionKind::Transfers);
    let requests = decision.transfer_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].element_out, CandidateId(123));
    assert_eq!(requests[0].element_in, best_mid);
    assert!(decision.roster.contains(&best_mid));
    assert!(!decision.roster.contains(&CandidateId(123)));
    assert!(decision
        .lineup
        .starters
        .iter()
        .chain(decision.lineup.bench.iter())
        .all(|id| decision.roster.contains(id)));
}

#[test]
fn zero_free_transfers_holds_the_roster() {
    let engine = DecisionEngine::default();
    let owned = ids(&[
        100, 101, 104, 105, 106, 107, 108, 114, 115, 116, 117, 118, 124, 125, 126,
    ]);
    let input = CycleInput {
        current_roster: owned.clone(),
        free_transfers_left: 0,
        ..fresh_input()
    };

    let decision = engine.decide(&input);
    assert_eq!(decision.kind, DecisionKind::Hold);
    assert_eq!(decision.roster, owned);
    assert!(decision.transfer_requests().is_empty());
    assert_eq!(decision.lineup.starters.len(), 11);
}

#[test]
fn unknown_owned_ids_are_reported_not_fatal() {
    let engine = DecisionEngine::default();
    let fresh = engine.decide(&fresh_input());
    let mut owned = fresh.roster.clone();
    owned[0] = CandidateId(9_999);

    let input = CycleInput {
        current_roster: owned,
        free_transfers_left: 0,
        ..fresh_input()
    };
    let decision = engine.decide(&input);

    assert_eq!(decision.report.unknown_roster_ids, vec![CandidateId(9_999)]);
    assert!(decision.report.is_degraded());
    assert!(!decision.lineup.starters.contains(&CandidateId(9_999)));
}

#[test]
fn starved_budget_surfaces_as_degraded_report() {
    let mut config = EngineConfig::default();
    config.squad.budget = 200;
    let decision = DecisionEngine::new(config).decide(&fresh_input());

    assert_eq!(decision.kind, DecisionKind::FreshSquad);
    assert!(decision.report.is_degraded());
    assert!(decision.roster.len() < 15);
    assert!(decision.target.total_cost <= 200);
    assert!(!decision.report.target_shortfalls.is_empty());
    assert!(decision.report.lineup_size < 11);
}

#[test]
fn signal_can_promote_a_player_into_the_squad() {
    let engine = DecisionEngine::default();
    let baseline = engine.decide(&fresh_input());
    assert!(!baseline.roster.contains(&CandidateId(103)));

    let signals: SignalMap = [("Player 103", 500.0)].into_iter().collect();
    let decision = engine.decide(&CycleInput {
        signals,
        ..fresh_input()
    });

    assert!(decision.roster.contains(&CandidateId(103)));
    assert_eq!(decision.lineup.captain, Some(CandidateId(103)));
}

#[test]
fn identical_inputs_give_identical_decisions() {
    let engine = DecisionEngine::default();
    let input = CycleInput {
        current_roster: ids(&[
            100, 101, 104, 105, 106, 107, 108, 114, 115, 116, 117, 118, 124, 125, 129,
        ]),
        free_transfers_left: 1,
        ..fresh_input()
    };

    assert_eq!(engine.decide(&input), engine.decide(&input));
}

/// Owned: a weak keeper in slot 0 and three weak club-7 defenders. The target wants a strong
/// club-7 forward, and the only unwanted id the single transfer can move is the keeper.
fn club_seven_market() -> Catalog {
    let rows: [(u32, Position, u32, f64); 20] = [
        (1, Position::Goalkeeper, 1, 1.0),
        (2, Position::Goalkeeper, 2, 6.0),
        (3, Position::Goalkeeper, 3, 5.0),
        (10, Position::Defender, 7, 1.0),
        (11, Position::Defender, 7, 1.0),
        (12, Position::Defender, 7, 1.0),
        (13, Position::Defender, 13, 6.0),
        (14, Position::Defender, 14, 6.0),
        (15, Position::Defender, 15, 5.0),
        (16, Position::Defender, 16, 5.0),
        (17, Position::Defender, 17, 5.0),
        (20, Position::Midfielder, 20, 6.0),
        (21, Position::Midfielder, 21, 6.0),
        (22, Position::Midfielder, 22, 6.0),
        (23, Position::Midfielder, 23, 6.0),
        (24, Position::Midfielder, 24, 6.0),
        (30, Position::Forward, 30, 6.0),
        (31, Position::Forward, 31, 6.0),
        (32, Position::Forward, 32, 6.0),
        (33, Position::Forward, 7, 9.0),
    ];
    let candidates = rows
        .iter()
        .map(|(id, position, group, projected)| {
            let mut entry = candidate(*id, *position, *group, 50);
            entry.projected_value = *projected;
            entry
        })
        .collect();

    Catalog::from_candidates(candidates).expect("ids are unique")
}

#[test]
fn transfers_that_break_group_cap_and_shape_are_reported() {
    let owned = ids(&[1, 2, 10, 11, 12, 13, 14, 20, 21, 22, 23, 24, 30, 31, 32]);
    let decision = DecisionEngine::default().decide(&CycleInput {
        catalog: club_seven_market(),
        current_roster: owned,
        free_transfers_left: 1,
        ..CycleInput::default()
    });

    assert_eq!(decision.kind, DecisionKind::Transfers);
    let requests = decision.transfer_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].element_out, CandidateId(1));
    assert_eq!(requests[0].element_in, CandidateId(33));
    assert!(decision.report.target_shortfalls.is_empty());

    assert_eq!(
        decision.report.group_breaches,
        vec![GroupBreach {
            group: GroupId(7),
            cap: 3,
            count: 4
        }]
    );
    assert_eq!(
        decision.report.shape_deviations,
        vec![
            ShapeDeviation {
                position: Position::Goalkeeper,
                required: 2,
                actual: 1
            },
            ShapeDeviation {
                position: Position::Forward,
                required: 3,
                actual: 4
            },
        ]
    );
    assert!(decision.report.is_degraded());
}
