use chrono::{DateTime, Utc};
use fpl_planner::planner::{
    CandidateId, Decision, DecisionKind, DecisionSink, DegradedReport, Pick, SinkError,
    TransferRequest,
};
use serde::Serialize;
use std::io::{self, Write};
use std::sync::Mutex;

/// What the apply side would post for a decision: the squad for a fresh build, the transfer
/// requests otherwise, and the picks either way.
#[derive(Debug, Serialize)]
struct DecisionPayload<'a> {
    event: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    deadline: Option<DateTime<Utc>>,
    kind: DecisionKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    squad: Option<&'a [CandidateId]>,
    transfers: Vec<TransferRequest>,
    picks: Vec<Pick>,
    captain: Option<CandidateId>,
    vice_captain: Option<CandidateId>,
    degraded: bool,
    report: &'a DegradedReport,
}

impl<'a> From<&'a Decision> for DecisionPayload<'a> {
    fn from(decision: &'a Decision) -> Self {
        let squad = (decision.kind == DecisionKind::FreshSquad).then_some(&decision.roster[..]);
        Self {
            event: decision.gameweek.map(|gameweek| gameweek.id),
            deadline: decision.gameweek.and_then(|gameweek| gameweek.deadline),
            kind: decision.kind,
            squad,
            transfers: decision.transfer_requests(),
            picks: decision.picks(),
            captain: decision.captain(),
            vice_captain: decision.vice_captain(),
            degraded: decision.report.is_degraded(),
            report: &decision.report,
        }
    }
}

/// Writes each decision as one JSON document to `out`.
pub struct JsonDecisionWriter<W> {
    out: Mutex<W>,
    pretty: bool,
}

impl JsonDecisionWriter<io::Stdout> {
    pub fn stdout(pretty: bool) -> Self {
        Self::new(io::stdout(), pretty)
    }
}

impl<W: Write + Send> JsonDecisionWriter<W> {
    pub fn new(out: W, pretty: bool) -> Self {
        Self {
            out: Mutex::new(out),
            pretty,
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<W: Write + Send> DecisionSink for JsonDecisionWriter<W> {
    fn apply(&self, decision: &Decision) -> Result<(), SinkError> {
        let payload = DecisionPayload::from(decision);
        let mut out = self
            .out
            .lock()
            .map_err(|_| SinkError::Transport("decision output lock poisoned".to_string()))?;

        let written = if self.pretty {
            serde_json::to_writer_pretty(&mut *out, &payload)
        } else {
            serde_json::to_writer(&mut *out, &payload)
        };
        written.map_err(|err| SinkError::Transport(err.to_string()))?;

        writeln!(out)
            .and_then(|_| out.flush())
            .map_err(|err| SinkError::Transport(err.to_string()))
    }
}
