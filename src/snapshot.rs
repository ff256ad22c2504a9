//! The JSON snapshot the fetching side drops on disk before a run: the public player and team
//! tables, the event calendar and, once a squad exists, the manager's team.

use chrono::{DateTime, Utc};
use fpl_planner::error::AppError;
use fpl_planner::planner::{
    CandidateId, Catalog, CatalogBuilder, Gameweek, GroupDirectory, RawCandidateRecord,
    TransferAllowance,
};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub elements: Vec<RawCandidateRecord>,
    #[serde(default)]
    pub teams: Vec<TeamRecord>,
    #[serde(default)]
    pub events: Vec<EventRecord>,
    /// Absent before the first squad has been registered.
    #[serde(default)]
    pub my_team: Option<ManagerTeam>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TeamRecord {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventRecord {
    pub id: u32,
    #[serde(default)]
    pub deadline_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_next: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ManagerTeam {
    #[serde(default)]
    pub picks: Vec<OwnedPick>,
    #[serde(default)]
    pub transfers: TransferAllowance,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct OwnedPick {
    pub element: CandidateId,
}

impl Snapshot {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, AppError> {
        let file = File::open(path.as_ref())?;
        let snapshot: Snapshot = serde_json::from_reader(BufReader::new(file))?;
        info!(
            path = %path.as_ref().display(),
            elements = snapshot.elements.len(),
            teams = snapshot.teams.len(),
            events = snapshot.events.len(),
            has_team = snapshot.my_team.is_some(),
            "snapshot loaded"
        );
        Ok(snapshot)
    }

    pub fn groups(&self) -> GroupDirectory {
        self.teams
            .iter()
            .map(|team| (team.id, team.name.clone()))
            .collect()
    }

    /// Strict mode aborts on the first bad element; otherwise bad elements are dropped.
    pub fn catalog(&self, strict: bool) -> Result<Catalog, AppError> {
        let builder = CatalogBuilder::new(self.groups());
        if strict {
            return Ok(builder.build(&self.elements)?);
        }

        let (catalog, rejected) = builder.build_lenient(&self.elements);
        if !rejected.is_empty() {
            warn!(
                dropped = rejected.len(),
                kept = catalog.len(),
                "snapshot contained invalid elements"
            );
        }
        Ok(catalog)
    }

    /// The event flagged `is_next`. `None` once the season is over.
    pub fn next_gameweek(&self) -> Option<Gameweek> {
        self.events
            .iter()
            .find(|event| event.is_next)
            .map(|event| Gameweek {
                id: event.id,
                deadline: event.deadline_time,
            })
    }

    pub fn current_roster(&self) -> Vec<CandidateId> {
        self.my_team
            .as_ref()
            .map(|team| team.picks.iter().map(|pick| pick.element).collect())
            .unwrap_or_default()
    }

    pub fn free_transfers_left(&self) -> i32 {
        self.my_team
            .as_ref()
            .map(|team| team.transfers.remaining())
            .unwrap_or_else(|| TransferAllowance::default().remaining())
    }
}
