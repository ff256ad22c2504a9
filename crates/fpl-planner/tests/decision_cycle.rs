use fpl_planner::config::EngineConfig;
use fpl_planner::planner::{
    AvailabilityState, CandidateId, CatalogBuilder, CycleInput, DecisionEngine, DecisionKind,
    Gameweek, GroupDirectory, PlanStatus, Position, PositionShortfall, SignalMap,
};

const PLAYERS: &str = "\
id,web_name,element_type,team,now_cost,ep_next,form,ict_index,status,news
1,Raya,1,1,55,4.5,5.0,20.1,a,
2,Pickford,1,2,50,4.0,4.2,18.0,a,
3,Sels,1,3,45,3.1,3.0,15.0,a,
4,Flekken,1,4,45,3.0,2.5,12.0,i,Knee injury - Expected back 01 Nov
10,Gabriel,2,1,60,5.0,6.0,25.0,a,
11,Saliba,2,1,60,4.8,5.5,22.0,a,
12,Gvardiol,2,5,60,4.6,5.0,24.0,a,
13,Van Dijk,2,6,65,4.5,4.8,21.0,a,
14,Robinson,2,7,50,4.0,4.5,19.0,a,
15,Mykolenko,2,2,45,3.5,3.9,15.0,a,
16,Aina,2,3,50,3.8,4.1,17.0,d,Knock - 75% chance of playing
17,Lewis-Potts,2,8,40,2.0,1.0,5.0,a,
20,Salah,3,6,130,8.5,9.0,40.0,a,
21,Saka,3,1,100,6.5,7.1,32.0,a,
22,Palmer,3,9,105,7.0,7.5,35.0,a,
23,Mbeumo,3,10,75,5.5,6.0,27.0,a,
24,Mitoma,3,11,65,4.5,4.0,21.0,a,
25,Elanga,3,3,55,4.0,4.5,20.0,a,
26,Ødegaard,3,1,85,5.0,3.0,24.0,d,Ankle doubt
30,Haaland,4,5,150,7.5,8.0,38.0,a,
31,Isak,4,12,85,6.0,6.5,30.0,a,
32,Wood,4,3,65,5.0,5.5,24.0,a,
33,Muniz,4,13,45,3.0,2.8,10.0,s,Suspended until GW8
34,Evanilson,4,14,60,4.0,4.2,18.0,a,
";

fn groups() -> GroupDirectory {
    [
        (1, "Arsenal"),
        (2, "Everton"),
        (3, "Nott'm Forest"),
        (5, "Man City"),
        (6, "Liverpool"),
    ]
    .into_iter()
    .collect()
}

fn ids(raw: &[u32]) -> Vec<CandidateId> {
    raw.iter().copied().map(CandidateId).collect()
}

#[test]
fn csv_market_fresh_build_shows_the_greedy_budget_squeeze() {
    let records = CatalogBuilder::read_csv(PLAYERS.as_bytes()).expect("csv parses");
    let catalog = CatalogBuilder::new(groups())
        .build(&records)
        .expect("all rows valid");
    assert_eq!(catalog.len(), 24);

    let flekken = catalog.get(CandidateId(4)).expect("flekken present");
    assert_eq!(flekken.availability, AvailabilityState::Unavailable);
    let aina = catalog.get(CandidateId(16)).expect("aina present");
    assert_eq!(aina.availability, AvailabilityState::Doubtful);
    let odegaard = catalog.get(CandidateId(26)).expect("odegaard present");
    assert_eq!(odegaard.availability, AvailabilityState::Doubtful);
    assert_eq!(odegaard.group_name, "Arsenal");

    let decision = DecisionEngine::new(EngineConfig::default()).decide(&CycleInput {
        catalog,
        ..CycleInput::default()
    });

    assert_eq!(decision.kind, DecisionKind::FreshSquad);
    // Saka is skipped once three Arsenal players are in; Haaland leaves too little for a
    // second or third forward.
    assert_eq!(
        decision.roster,
        ids(&[1, 2, 10, 11, 12, 13, 14, 20, 22, 23, 24, 25, 30])
    );
    assert_eq!(decision.target.total_cost, 980);
    assert_eq!(decision.target.remaining_budget, 20);
    assert_eq!(
        decision.report.target_shortfalls,
        vec![PositionShortfall {
            position: Position::Forward,
            required: 3,
            selected: 1
        }]
    );
    assert!(decision.report.is_degraded());

    assert!(decision.lineup.is_complete());
    assert_eq!(
        decision.lineup.starters,
        ids(&[1, 10, 11, 12, 20, 22, 30, 23, 24, 13, 25])
    );
    assert_eq!(decision.lineup.captain, Some(CandidateId(20)));
    assert_eq!(decision.lineup.vice, Some(CandidateId(22)));
    assert_eq!(decision.lineup.bench, ids(&[2, 14]));
}

#[test]
fn lenient_build_drops_rows_with_bad_costs() {
    let csv = "\
id,web_name,element_type,team,now_cost,ep_next
1,Raya,1,1,55,4.5
2,Ghost,1,2,,4.0
3,Typo,2,2,fifty,3.0
";
    let records = CatalogBuilder::read_csv(csv.as_bytes()).expect("csv parses");
    let (catalog, rejected) = CatalogBuilder::default().build_lenient(&records);

    assert_eq!(catalog.len(), 1);
    assert_eq!(rejected.len(), 2);
    assert!(CatalogBuilder::default().build(&records).is_err());
}

#[test]
fn negative_signal_moves_the_armband_without_a_transfer() {
    let records = CatalogBuilder::read_csv(PLAYERS.as_bytes()).expect("csv parses");
    let catalog = CatalogBuilder::new(groups())
        .build(&records)
        .expect("all rows valid");
    let engine = DecisionEngine::default();

    let opening = engine.decide(&CycleInput {
        catalog: catalog.clone(),
        ..CycleInput::default()
    });
    assert_eq!(opening.lineup.captain, Some(CandidateId(20)));

    let signals: SignalMap = [("Salah", -1_000.0)].into_iter().collect();
    let week_two = engine.decide(&CycleInput {
        catalog,
        signals,
        current_roster: opening.roster.clone(),
        free_transfers_left: 1,
        gameweek: Some(Gameweek {
            id: 2,
            deadline: None,
        }),
    });

    // Salah still fills the last affordable midfield slot, so the target equals the roster.
    assert_eq!(week_two.kind, DecisionKind::Hold);
    assert_eq!(
        week_two.plan.as_ref().map(|plan| plan.status),
        Some(PlanStatus::AlreadyAligned)
    );
    assert!(week_two.transfer_requests().is_empty());
    assert_eq!(week_two.roster, opening.roster);
    assert_eq!(week_two.lineup.captain, Some(CandidateId(22)));
    assert_eq!(week_two.lineup.vice, Some(CandidateId(30)));
    assert!(week_two.lineup.bench.contains(&CandidateId(20)));
}
