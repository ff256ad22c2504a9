use super::domain::CandidateId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// Free transfers granted and already used this gameweek. `made` can exceed `limit` when the
/// manager has taken points hits, leaving a negative balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferAllowance {
    #[serde(default = "default_limit")]
    pub limit: i32,
    #[serde(default)]
    pub made: i32,
}

fn default_limit() -> i32 {
    1
}

impl Default for TransferAllowance {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            made: 0,
        }
    }
}

impl TransferAllowance {
    pub fn remaining(&self) -> i32 {
        self.limit.saturating_sub(self.made)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Swap {
    pub out: CandidateId,
    #[serde(rename = "in")]
    pub incoming: CandidateId,
}

/// Outbound transfer request. Prices are settled by the remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    pub element_out: CandidateId,
    pub element_in: CandidateId,
    pub purchase_price: u32,
    pub selling_price: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    Accepted,
    NoTransfersLeft,
    AlreadyAligned,
    Unbalanced { outs: usize, ins: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferPlan {
    /// Empty unless `status` is [`PlanStatus::Accepted`].
    pub swaps: Vec<Swap>,
    pub status: PlanStatus,
    /// Roster the planner was steering towards, best first.
    pub desired: Vec<CandidateId>,
    pub proposed_outs: Vec<CandidateId>,
    pub proposed_ins: Vec<CandidateId>,
}

impl TransferPlan {
    pub fn is_empty(&self) -> bool {
        self.swaps.is_empty()
    }

    pub fn requests(&self) -> Vec<TransferRequest> {
        self.swaps
            .iter()
            .map(|swap| TransferRequest {
                element_out: swap.out,
                element_in: swap.incoming,
                purchase_price: 0,
                selling_price: 0,
            })
            .collect()
    }

    /// `current` with each outgoing id replaced in place by its incoming partner. Repeated
    /// ids keep only their first slot, matching how [`TransferPlanner::plan`] reads the roster.
    pub fn apply_to(&self, current: &[CandidateId]) -> Vec<CandidateId> {
        let mut seen: HashSet<CandidateId> = HashSet::with_capacity(current.len());
        current
            .iter()
            .filter(|id| seen.insert(**id))
            .map(|id| {
                self.swaps
                    .iter()
                    .find(|swap| swap.out == *id)
                    .map(|swap| swap.incoming)
                    .unwrap_or(*id)
            })
            .collect()
    }
}

/// Diffs the owned roster against a ranked target under a free-transfer budget.
#[derive(Debug, Clone)]
pub struct TransferPlanner {
    squad_size: usize,
}

impl Default for TransferPlanner {
    fn default() -> Self {
        Self::new(15)
    }
}

impl TransferPlanner {
    pub fn new(squad_size: usize) -> Self {
        Self { squad_size }
    }

    pub fn plan(
        &self,
        current: &[CandidateId],
        target_ranked: &[CandidateId],
        free_transfers_left: i32,
    ) -> TransferPlan {
        let mut owned: Vec<CandidateId> = Vec::with_capacity(current.len());
        for id in current {
            if !owned.contains(id) {
                owned.push(*id);
            }
        }
        let owned_set: HashSet<CandidateId> = owned.iter().copied().collect();

        let mut desired: Vec<CandidateId> = Vec::with_capacity(self.squad_size);
        for id in target_ranked {
            if desired.len() >= self.squad_size {
                break;
            }
            if owned_set.contains(id) && !desired.contains(id) {
                desired.push(*id);
            }
        }
        for id in target_ranked {
            if desired.len() >= self.squad_size {
                break;
            }
            if !desired.contains(id) {
                desired.push(*id);
            }
        }

        let cap = usize::try_from(free_transfers_left).unwrap_or(0);
        let desired_set: HashSet<CandidateId> = desired.iter().copied().collect();
        let outs: Vec<CandidateId> = owned
            .iter()
            .copied()
            .filter(|id| !desired_set.contains(id))
            .take(cap)
            .collect();
        let ins: Vec<CandidateId> = desired
            .iter()
            .copied()
            .filter(|id| !owned_set.contains(id))
            .take(cap)
            .collect();

        let status = if cap == 0 {
            PlanStatus::NoTransfersLeft
        } else if outs.is_empty() && ins.is_empty() {
            PlanStatus::AlreadyAligned
        } else if outs.len() != ins.len() {
            PlanStatus::Unbalanced {
                outs: outs.len(),
                ins: ins.len(),
            }
        } else {
            PlanStatus::Accepted
        };

        let swaps: Vec<Swap> = if status == PlanStatus::Accepted {
            outs.iter()
                .zip(ins.iter())
                .map(|(out, incoming)| Swap {
                    out: *out,
                    incoming: *incoming,
                })
                .collect()
        } else {
            Vec::new()
        };

        debug!(
            free_transfers_left,
            desired = desired.len(),
            swaps = swaps.len(),
            status = ?status,
            "transfer plan computed"
        );

        TransferPlan {
            swaps,
            status,
            desired,
            proposed_outs: outs,
            proposed_ins: ins,
        }
    }
}
