use std::sync::Arc;

use super::catalog::Catalog;
use super::cycle::{CycleInput, Decision, DecisionEngine, Gameweek};
use super::domain::CandidateId;
use super::scoring::SignalMap;
use crate::config::EngineConfig;
use tracing::{info, warn};

/// Text-signal collaborator: turns player names into per-name adjustments. Implementations
/// that cannot reach their sources should return an empty map.
pub trait SignalSource: Send + Sync {
    fn produce_signal_map(&self, names: &[&str]) -> SignalMap;
}

/// Apply collaborator that turns a decision into outbound calls.
pub trait DecisionSink: Send + Sync {
    fn apply(&self, decision: &Decision) -> Result<(), SinkError>;
}

/// Failure reported by a [`DecisionSink`].
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("decision transport unavailable: {0}")]
    Transport(String),
    #[error("decision rejected: {0}")]
    Rejected(String),
}

/// Signal source for runs without any auxiliary text data.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSignals;

impl SignalSource for NoSignals {
    fn produce_signal_map(&self, _names: &[&str]) -> SignalMap {
        SignalMap::new()
    }
}

/// A fixed map, e.g. one the caller loaded from disk.
#[derive(Debug, Clone, Default)]
pub struct StaticSignals(pub SignalMap);

impl SignalSource for StaticSignals {
    fn produce_signal_map(&self, _names: &[&str]) -> SignalMap {
        self.0.clone()
    }
}

/// Whether a degraded decision may still be handed to the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DegradedPolicy {
    #[default]
    Apply,
    Withhold,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CycleOutcome {
    pub decision: Decision,
    pub applied: bool,
}

/// Composes the decision engine with the signal and apply collaborators.
pub struct Autopilot<S, D> {
    engine: Arc<DecisionEngine>,
    signals: Arc<S>,
    sink: Arc<D>,
    degraded: DegradedPolicy,
}

impl<S, D> Autopilot<S, D>
where
    S: SignalSource + 'static,
    D: DecisionSink + 'static,
{
    pub fn new(config: EngineConfig, signals: Arc<S>, sink: Arc<D>) -> Self {
        Self {
            engine: Arc::new(DecisionEngine::new(config)),
            signals,
            sink,
            degraded: DegradedPolicy::default(),
        }
    }

    pub fn with_degraded_policy(mut self, policy: DegradedPolicy) -> Self {
        self.degraded = policy;
        self
    }

    pub fn engine(&self) -> &DecisionEngine {
        &self.engine
    }

    /// Runs one cycle over `catalog` and hands the result to the sink unless policy withholds
    /// it.
    pub fn run_cycle(
        &self,
        catalog: Catalog,
        current_roster: Vec<CandidateId>,
        free_transfers_left: i32,
        gameweek: Option<Gameweek>,
    ) -> Result<CycleOutcome, SinkError> {
        let signals = self.signals.produce_signal_map(&catalog.names());
        info!(
            candidates = catalog.len(),
            signals = signals.len(),
            owned = current_roster.len(),
            free_transfers_left,
            "running decision cycle"
        );

        let input = CycleInput {
            catalog,
            signals,
            current_roster,
            free_transfers_left,
            gameweek,
        };
        let decision = self.engine.decide(&input);

        if decision.report.is_degraded() && self.degraded == DegradedPolicy::Withhold {
            warn!(kind = ?decision.kind, "withholding degraded decision from sink");
            return Ok(CycleOutcome {
                decision,
                applied: false,
            });
        }

        self.sink.apply(&decision)?;
        Ok(CycleOutcome {
            decision,
            applied: true,
        })
    }
}
