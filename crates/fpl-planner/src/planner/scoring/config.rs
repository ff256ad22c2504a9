use crate::planner::domain::{AvailabilityState, PositionTable};
use serde::{Deserialize, Serialize};

/// Weights applied to the three performance metrics before any multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricWeights {
    pub projected_value: f64,
    pub recent_form: f64,
    pub influence_index: f64,
}

impl Default for MetricWeights {
    fn default() -> Self {
        Self {
            projected_value: 10.0,
            recent_form: 2.0,
            influence_index: 0.8,
        }
    }
}

/// Penalty per availability state. Defaults are monotone: the less likely a player is to
/// feature, the harsher the multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityMultipliers {
    pub available: f64,
    pub doubtful: f64,
    pub unavailable: f64,
}

impl AvailabilityMultipliers {
    pub fn for_state(&self, state: AvailabilityState) -> f64 {
        match state {
            AvailabilityState::Available => self.available,
            AvailabilityState::Doubtful => self.doubtful,
            AvailabilityState::Unavailable => self.unavailable,
        }
    }
}

impl Default for AvailabilityMultipliers {
    fn default() -> Self {
        Self {
            available: 1.0,
            doubtful: 0.6,
            unavailable: 0.3,
        }
    }
}

/// Full scoring rubric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub weights: MetricWeights,
    pub availability: AvailabilityMultipliers,
    pub position: PositionTable<f64>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: MetricWeights::default(),
            availability: AvailabilityMultipliers::default(),
            position: PositionTable::new(0.9, 1.05, 1.1, 1.0),
        }
    }
}
