use super::config::ScoringConfig;
use super::{ScoreBreakdown, SignalMap};
use crate::planner::domain::Candidate;

pub(crate) fn score_candidate(
    candidate: &Candidate,
    config: &ScoringConfig,
    signals: &SignalMap,
) -> ScoreBreakdown {
    let weights = &config.weights;
    let base = candidate.projected_value * weights.projected_value
        + candidate.recent_form * weights.recent_form
        + candidate.influence_index * weights.influence_index;

    let availability_multiplier = config.availability.for_state(candidate.availability);
    let position_multiplier = *config.position.get(candidate.position);
    let signal = signals.get(&candidate.name_key);

    let total = base * availability_multiplier * position_multiplier + signal;

    ScoreBreakdown {
        base,
        availability_multiplier,
        position_multiplier,
        signal,
        total: if total.is_finite() { total } else { 0.0 },
    }
}
