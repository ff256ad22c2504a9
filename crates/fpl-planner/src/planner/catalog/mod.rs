//! Normalization of raw player records into validated [`Candidate`] values.
//!
//! Raw records come either from the JSON snapshot the driver fetched or from a flat CSV
//! export. Numeric scoring inputs are lenient (anything unreadable becomes `0.0`), while
//! identity, position, group and cost are strict: a record with a bad value for any of them
//! is rejected with a [`CatalogError`] and never reaches scoring.

mod normalizer;
mod parser;

use super::domain::{Candidate, CandidateId, GroupId, Position};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

pub(crate) use normalizer::normalize_name;

/// Loosely typed cell: the remote API mixes numbers and numeric strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawScalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl RawScalar {
    fn as_f64(&self) -> Option<f64> {
        let value = match self {
            RawScalar::Int(value) => *value as f64,
            RawScalar::Float(value) => *value,
            RawScalar::Text(text) => text.trim().parse::<f64>().ok()?,
            RawScalar::Bool(_) => return None,
        };
        value.is_finite().then_some(value)
    }

    fn as_whole(&self) -> Option<i64> {
        match self {
            RawScalar::Int(value) => Some(*value),
            RawScalar::Bool(_) => None,
            _ => {
                let value = self.as_f64()?;
                (value.fract() == 0.0 && value.abs() <= i64::MAX as f64).then_some(value as i64)
            }
        }
    }

    fn describe(&self) -> String {
        match self {
            RawScalar::Bool(value) => value.to_string(),
            RawScalar::Int(value) => value.to_string(),
            RawScalar::Float(value) => value.to_string(),
            RawScalar::Text(text) => format!("{text:?}"),
        }
    }
}

/// Player record as handed over by the data-fetching collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCandidateRecord {
    #[serde(default)]
    pub id: Option<RawScalar>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub web_name: Option<String>,
    #[serde(default)]
    pub element_type: Option<RawScalar>,
    #[serde(default)]
    pub team: Option<RawScalar>,
    #[serde(default)]
    pub now_cost: Option<RawScalar>,
    #[serde(default)]
    pub ep_next: Option<RawScalar>,
    #[serde(default)]
    pub form: Option<RawScalar>,
    #[serde(default)]
    pub ict_index: Option<RawScalar>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub news: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

/// Validation failure for a single raw record. `index` is the record's position in the input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CatalogError {
    #[error("record {index}: missing or invalid id ({value})")]
    InvalidId { index: usize, value: String },
    #[error("record {index} (id {id}): missing cost")]
    MissingCost { index: usize, id: CandidateId },
    #[error("record {index} (id {id}): cost {value} is not a whole, non-negative number of tenths")]
    InvalidCost {
        index: usize,
        id: CandidateId,
        value: String,
    },
    #[error("record {index} (id {id}): position code {value} is not one of 1-4")]
    InvalidPosition {
        index: usize,
        id: CandidateId,
        value: String,
    },
    #[error("record {index} (id {id}): missing or invalid group ({value})")]
    InvalidGroup {
        index: usize,
        id: CandidateId,
        value: String,
    },
    #[error("record {index}: id {id} already appears earlier in the catalog")]
    DuplicateId { index: usize, id: CandidateId },
}

/// Lookup from group id to display name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupDirectory {
    names: BTreeMap<GroupId, String>,
}

impl GroupDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, group: GroupId, name: impl Into<String>) {
        self.names.insert(group, name.into());
    }

    pub fn name_for(&self, group: GroupId) -> String {
        self.names
            .get(&group)
            .cloned()
            .unwrap_or_else(|| format!("group-{}", group.0))
    }
}

impl<S: Into<String>> FromIterator<(u32, S)> for GroupDirectory {
    fn from_iter<I: IntoIterator<Item = (u32, S)>>(iter: I) -> Self {
        Self {
            names: iter
                .into_iter()
                .map(|(id, name)| (GroupId(id), name.into()))
                .collect(),
        }
    }
}

/// Validated candidates in input order. Input order is the tie-break order for every
/// downstream sort.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    candidates: Vec<Candidate>,
    index: HashMap<CandidateId, usize>,
}

impl Catalog {
    pub fn from_candidates(candidates: Vec<Candidate>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(candidates.len());
        for (position, candidate) in candidates.iter().enumerate() {
            if index.insert(candidate.id, position).is_some() {
                return Err(CatalogError::DuplicateId {
                    index: position,
                    id: candidate.id,
                });
            }
        }

        Ok(Self { candidates, index })
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn get(&self, id: CandidateId) -> Option<&Candidate> {
        self.index.get(&id).map(|position| &self.candidates[*position])
    }

    pub fn contains(&self, id: CandidateId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Display names, in catalog order, for the auxiliary signal collaborator.
    pub fn names(&self) -> Vec<&str> {
        self.candidates
            .iter()
            .map(|candidate| candidate.name.as_str())
            .collect()
    }
}

/// Turns raw records into a [`Catalog`].
#[derive(Debug, Clone, Default)]
pub struct CatalogBuilder {
    groups: GroupDirectory,
}

impl CatalogBuilder {
    pub fn new(groups: GroupDirectory) -> Self {
        Self { groups }
    }

    /// Reads raw records from a CSV file.
    pub fn read_csv_path<P: AsRef<Path>>(path: P) -> Result<Vec<RawCandidateRecord>, csv::Error> {
        let file = std::fs::File::open(path).map_err(csv::Error::from)?;
        Self::read_csv(file)
    }

    pub fn read_csv<R: Read>(reader: R) -> Result<Vec<RawCandidateRecord>, csv::Error> {
        parser::parse_records(reader)
    }

    /// Normalizes one record. `index` is only used to label errors.
    pub fn normalize(
        &self,
        index: usize,
        record: &RawCandidateRecord,
    ) -> Result<Candidate, CatalogError> {
        let id = record
            .id
            .as_ref()
            .and_then(RawScalar::as_whole)
            .filter(|value| *value > 0)
            .and_then(|value| u32::try_from(value).ok())
            .map(CandidateId)
            .ok_or_else(|| CatalogError::InvalidId {
                index,
                value: describe(record.id.as_ref()),
            })?;

        let position = record
            .element_type
            .as_ref()
            .and_then(RawScalar::as_whole)
            .and_then(Position::from_code)
            .ok_or_else(|| CatalogError::InvalidPosition {
                index,
                id,
                value: describe(record.element_type.as_ref()),
            })?;

        let group = record
            .team
            .as_ref()
            .and_then(RawScalar::as_whole)
            .and_then(|value| u32::try_from(value).ok())
            .map(GroupId)
            .ok_or_else(|| CatalogError::InvalidGroup {
                index,
                id,
                value: describe(record.team.as_ref()),
            })?;

        let raw_cost = record
            .now_cost
            .as_ref()
            .ok_or(CatalogError::MissingCost { index, id })?;
        let cost = raw_cost
            .as_whole()
            .and_then(|value| u32::try_from(value).ok())
            .ok_or_else(|| CatalogError::InvalidCost {
                index,
                id,
                value: raw_cost.describe(),
            })?;

        let name = record.web_name.clone().unwrap_or_default();
        let name_key = normalize_name(&name);

        Ok(Candidate {
            id,
            name,
            name_key,
            position,
            group,
            group_name: self.groups.name_for(group),
            cost,
            projected_value: lenient_metric(record.ep_next.as_ref()),
            recent_form: lenient_metric(record.form.as_ref()),
            influence_index: lenient_metric(record.ict_index.as_ref()),
            availability: normalizer::derive_availability(
                record.status.as_deref(),
                record.news.as_deref(),
            ),
        })
    }

    /// Fails on the first invalid record.
    pub fn build(&self, records: &[RawCandidateRecord]) -> Result<Catalog, CatalogError> {
        let candidates = records
            .iter()
            .enumerate()
            .map(|(index, record)| self.normalize(index, record))
            .collect::<Result<Vec<_>, _>>()?;

        let catalog = Catalog::from_candidates(candidates)?;
        debug!(candidates = catalog.len(), "catalog built");
        Ok(catalog)
    }

    /// Drops invalid records (including later duplicates of an id) and returns them next to
    /// the catalog of the valid ones.
    pub fn build_lenient(&self, records: &[RawCandidateRecord]) -> (Catalog, Vec<CatalogError>) {
        let mut candidates = Vec::with_capacity(records.len());
        let mut rejected = Vec::new();
        let mut seen = HashMap::new();

        for (index, record) in records.iter().enumerate() {
            match self.normalize(index, record) {
                Ok(candidate) => {
                    if seen.insert(candidate.id, index).is_some() {
                        rejected.push(CatalogError::DuplicateId {
                            index,
                            id: candidate.id,
                        });
                    } else {
                        candidates.push(candidate);
                    }
                }
                Err(err) => rejected.push(err),
            }
        }

        for err in &rejected {
            warn!(error = %err, "dropping invalid player record");
        }

        let index = candidates
            .iter()
            .enumerate()
            .map(|(position, candidate)| (candidate.id, position))
            .collect();
        let catalog = Catalog { candidates, index };
        debug!(
            candidates = catalog.len(),
            dropped = rejected.len(),
            "catalog built"
        );

        (catalog, rejected)
    }
}

fn lenient_metric(value: Option<&RawScalar>) -> f64 {
    value
        .and_then(RawScalar::as_f64)
        .filter(|metric| *metric >= 0.0)
        .unwrap_or(0.0)
}

fn describe(value: Option<&RawScalar>) -> String {
    value
        .map(RawScalar::describe)
        .unwrap_or_else(|| "missing".to_string())
}
