mod config;
mod rules;

pub use config::{AvailabilityMultipliers, MetricWeights, ScoringConfig};

use super::catalog::{normalize_name, Catalog};
use super::domain::{Candidate, CandidateId};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

/// Read-only auxiliary signal keyed by normalized player name. Absent or non-finite entries
/// are neutral.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, f64>", into = "BTreeMap<String, f64>")]
pub struct SignalMap {
    values: BTreeMap<String, f64>,
}

impl SignalMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulates into the normalized key, so "Saka" and " saka " land together.
    pub fn add(&mut self, name: &str, value: f64) {
        *self.values.entry(normalize_name(name)).or_insert(0.0) += value;
    }

    pub fn get(&self, name_key: &str) -> f64 {
        self.values
            .get(name_key)
            .copied()
            .filter(|value| value.is_finite())
            .unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<BTreeMap<String, f64>> for SignalMap {
    fn from(raw: BTreeMap<String, f64>) -> Self {
        raw.into_iter().collect()
    }
}

impl From<SignalMap> for BTreeMap<String, f64> {
    fn from(map: SignalMap) -> Self {
        map.values
    }
}

impl<S: AsRef<str>> FromIterator<(S, f64)> for SignalMap {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (name, value) in iter {
            map.add(name.as_ref(), value);
        }
        map
    }
}

/// Audit trail of how a score was assembled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub base: f64,
    pub availability_multiplier: f64,
    pub position_multiplier: f64,
    pub signal: f64,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub candidate: Candidate,
    pub breakdown: ScoreBreakdown,
}

impl ScoredCandidate {
    pub fn id(&self) -> CandidateId {
        self.candidate.id
    }

    pub fn score(&self) -> f64 {
        self.breakdown.total
    }
}

/// Descending by score. Used with stable sorts so equal scores keep catalog order.
pub(crate) fn by_score_desc(a: &ScoredCandidate, b: &ScoredCandidate) -> Ordering {
    b.score().total_cmp(&a.score())
}

/// Scored candidates in catalog order, addressable by id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreBoard {
    entries: Vec<ScoredCandidate>,
    index: HashMap<CandidateId, usize>,
}

impl ScoreBoard {
    pub fn new(entries: Vec<ScoredCandidate>) -> Self {
        let mut index = HashMap::with_capacity(entries.len());
        for (position, entry) in entries.iter().enumerate() {
            index.entry(entry.id()).or_insert(position);
        }
        Self { entries, index }
    }

    pub fn entries(&self) -> &[ScoredCandidate] {
        &self.entries
    }

    pub fn get(&self, id: CandidateId) -> Option<&ScoredCandidate> {
        self.index.get(&id).map(|position| &self.entries[*position])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every entry, best first.
    pub fn ranked(&self) -> Vec<&ScoredCandidate> {
        let mut ranked: Vec<&ScoredCandidate> = self.entries.iter().collect();
        ranked.sort_by(|a, b| by_score_desc(a, b));
        ranked
    }

    /// Splits `ids` into entries known to the board (input order, duplicates dropped) and the
    /// ids it has never seen.
    pub fn resolve(&self, ids: &[CandidateId]) -> (Vec<&ScoredCandidate>, Vec<CandidateId>) {
        let mut known: Vec<&ScoredCandidate> = Vec::with_capacity(ids.len());
        let mut unknown = Vec::new();

        for id in ids {
            match self.get(*id) {
                Some(entry) if !known.iter().any(|seen| seen.id() == *id) => known.push(entry),
                Some(_) => {}
                None if !unknown.contains(id) => unknown.push(*id),
                None => {}
            }
        }

        (known, unknown)
    }
}

/// Stateless scorer applying a [`ScoringConfig`].
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    config: ScoringConfig,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn score(&self, candidate: &Candidate, signals: &SignalMap) -> f64 {
        self.breakdown(candidate, signals).total
    }

    pub fn breakdown(&self, candidate: &Candidate, signals: &SignalMap) -> ScoreBreakdown {
        rules::score_candidate(candidate, &self.config, signals)
    }

    pub fn score_catalog(&self, catalog: &Catalog, signals: &SignalMap) -> ScoreBoard {
        let entries = catalog
            .candidates()
            .iter()
            .map(|candidate| ScoredCandidate {
                candidate: candidate.clone(),
                breakdown: self.breakdown(candidate, signals),
            })
            .collect();

        ScoreBoard::new(entries)
    }
}
