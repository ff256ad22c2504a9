//! One decision cycle: score, build the target squad, then either adopt it outright (no
//! roster yet) or move the owned roster towards it within the free-transfer budget, and pick
//! the lineup from whatever roster results.

use super::catalog::Catalog;
use super::domain::CandidateId;
use super::lineup::{FormationGap, Lineup, LineupSelector, Pick};
use super::scoring::{ScoreBoard, ScoringEngine, SignalMap};
use super::squad::{
    GroupBreach, PositionShortfall, ShapeDeviation, SquadMember, SquadSelection, SquadSelector,
};
use super::transfers::{TransferPlan, TransferPlanner, TransferRequest};
use crate::config::EngineConfig;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Gameweek the decision is for. Passed through untouched for the apply collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gameweek {
    pub id: u32,
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
}

/// Snapshot consumed by a cycle. An empty `current_roster` requests a fresh build.
#[derive(Debug, Clone, Default)]
pub struct CycleInput {
    pub catalog: Catalog,
    pub signals: SignalMap,
    pub current_roster: Vec<CandidateId>,
    pub free_transfers_left: i32,
    pub gameweek: Option<Gameweek>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionKind {
    /// No roster existed; the whole target squad is proposed.
    FreshSquad,
    /// At least one swap is proposed.
    Transfers,
    /// Roster unchanged; only the lineup and armbands are refreshed.
    Hold,
}

/// Achieved versus requested counts for everything that can come up short.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DegradedReport {
    pub target_shortfalls: Vec<PositionShortfall>,
    pub roster_size: usize,
    pub roster_required: usize,
    pub lineup_gaps: Vec<FormationGap>,
    pub lineup_size: usize,
    pub lineup_required: usize,
    /// Owned ids missing from the catalog; they keep their roster slot but cannot start.
    pub unknown_roster_ids: Vec<CandidateId>,
    /// Groups over the cap on the roster after transfers.
    #[serde(default)]
    pub group_breaches: Vec<GroupBreach>,
    /// Positions off the squad shape on the roster after transfers.
    #[serde(default)]
    pub shape_deviations: Vec<ShapeDeviation>,
}

impl DegradedReport {
    pub fn is_degraded(&self) -> bool {
        !self.target_shortfalls.is_empty()
            || self.roster_size < self.roster_required
            || !self.lineup_gaps.is_empty()
            || self.lineup_size < self.lineup_required
            || !self.unknown_roster_ids.is_empty()
            || !self.group_breaches.is_empty()
            || !self.shape_deviations.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub gameweek: Option<Gameweek>,
    pub kind: DecisionKind,
    /// Roster after the decision is applied.
    pub roster: Vec<CandidateId>,
    pub target: SquadSelection,
    /// `None` for a fresh build.
    pub plan: Option<TransferPlan>,
    pub lineup: Lineup,
    pub report: DegradedReport,
}

impl Decision {
    pub fn transfer_requests(&self) -> Vec<TransferRequest> {
        self.plan
            .as_ref()
            .map(TransferPlan::requests)
            .unwrap_or_default()
    }

    pub fn picks(&self) -> Vec<Pick> {
        self.lineup.picks()
    }

    pub fn captain(&self) -> Option<CandidateId> {
        self.lineup.captain
    }

    pub fn vice_captain(&self) -> Option<CandidateId> {
        self.lineup.vice
    }
}

/// Stateless pipeline built from an [`EngineConfig`].
#[derive(Debug, Clone)]
pub struct DecisionEngine {
    scoring: ScoringEngine,
    squad: SquadSelector,
    lineup: LineupSelector,
    transfers: TransferPlanner,
}

impl Default for DecisionEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl DecisionEngine {
    pub fn new(config: EngineConfig) -> Self {
        let squad_size = config.squad.size();
        Self {
            scoring: ScoringEngine::new(config.scoring),
            squad: SquadSelector::new(config.squad),
            lineup: LineupSelector::new(config.lineup),
            transfers: TransferPlanner::new(squad_size),
        }
    }

    pub fn score(&self, catalog: &Catalog, signals: &SignalMap) -> ScoreBoard {
        self.scoring.score_catalog(catalog, signals)
    }

    pub fn decide(&self, input: &CycleInput) -> Decision {
        let board = self.score(&input.catalog, &input.signals);
        let target = self.squad.select(board.entries());

        let decision = if input.current_roster.is_empty() {
            self.fresh_build(input, target)
        } else {
            self.incremental(input, &board, target)
        };

        info!(
            gameweek = ?decision.gameweek.map(|gameweek| gameweek.id),
            kind = ?decision.kind,
            swaps = decision.plan.as_ref().map(|plan| plan.swaps.len()).unwrap_or(0),
            captain = ?decision.lineup.captain,
            vice = ?decision.lineup.vice,
            "decision ready"
        );
        if decision.report.is_degraded() {
            warn!(report = ?decision.report, "decision is degraded");
        }

        decision
    }

    fn fresh_build(&self, input: &CycleInput, target: SquadSelection) -> Decision {
        let lineup = self.lineup.select(&target.members);
        let roster = target.ids();
        let report = DegradedReport {
            target_shortfalls: target.shortfalls.clone(),
            roster_size: roster.len(),
            roster_required: target.required,
            lineup_gaps: lineup.gaps.clone(),
            lineup_size: lineup.starters.len(),
            lineup_required: lineup.required,
            unknown_roster_ids: Vec::new(),
            group_breaches: Vec::new(),
            shape_deviations: Vec::new(),
        };

        Decision {
            gameweek: input.gameweek,
            kind: DecisionKind::FreshSquad,
            roster,
            target,
            plan: None,
            lineup,
            report,
        }
    }

    fn incremental(
        &self,
        input: &CycleInput,
        board: &ScoreBoard,
        target: SquadSelection,
    ) -> Decision {
        let plan = self.transfers.plan(
            &input.current_roster,
            &target.ranked_ids(),
            input.free_transfers_left,
        );
        let roster = plan.apply_to(&input.current_roster);

        let (known, unknown_roster_ids) = board.resolve(&roster);
        let members: Vec<SquadMember> = known.into_iter().map(SquadMember::from).collect();
        let audit = self.squad.audit(&members);
        let lineup = self.lineup.select(&members);

        let kind = if plan.is_empty() {
            DecisionKind::Hold
        } else {
            DecisionKind::Transfers
        };
        let report = DegradedReport {
            target_shortfalls: target.shortfalls.clone(),
            roster_size: roster.len(),
            roster_required: target.required,
            lineup_gaps: lineup.gaps.clone(),
            lineup_size: lineup.starters.len(),
            lineup_required: lineup.required,
            unknown_roster_ids,
            group_breaches: audit.group_breaches,
            shape_deviations: audit.shape_deviations,
        };

        Decision {
            gameweek: input.gameweek,
            kind,
            roster,
            target,
            plan: Some(plan),
            lineup,
            report,
        }
    }
}
