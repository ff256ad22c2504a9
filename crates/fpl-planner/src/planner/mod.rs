//! Squad construction, lineup selection and transfer planning.

pub mod catalog;
pub mod cycle;
pub mod domain;
pub mod lineup;
pub mod scoring;
pub mod service;
pub mod squad;
pub mod transfers;

#[cfg(test)]
mod tests;

pub use catalog::{
    Catalog, CatalogBuilder, CatalogError, GroupDirectory, RawCandidateRecord, RawScalar,
};
pub use cycle::{CycleInput, Decision, DecisionEngine, DecisionKind, DegradedReport, Gameweek};
pub use domain::{AvailabilityState, Candidate, CandidateId, GroupId, Position, PositionTable};
pub use lineup::{FormationGap, Lineup, LineupRules, LineupSelector, Pick};
pub use scoring::{
    AvailabilityMultipliers, MetricWeights, ScoreBoard, ScoreBreakdown, ScoredCandidate,
    ScoringConfig, ScoringEngine, SignalMap,
};
pub use service::{
    Autopilot, CycleOutcome, DecisionSink, DegradedPolicy, NoSignals, SignalSource, SinkError,
    StaticSignals,
};
pub use squad::{
    GroupBreach, PositionShortfall, ShapeDeviation, SquadAudit, SquadMember, SquadRules,
    SquadSelection, SquadSelector,
};
pub use transfers::{
    PlanStatus, Swap, TransferAllowance, TransferPlan, TransferPlanner, TransferRequest,
};
