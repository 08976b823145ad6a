// ABOUTME: Append-only log of decisions that involved active judgment.
// ABOUTME: ApprovalRecord snapshots, the ApprovalHistory log, and GateStats.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::types::{Decision, ToolCallRequest};

/// One judged decision: the request as evaluated, the decision reached, and
/// when. A record's ordinal position is its index in the history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApprovalRecord {
    pub request: ToolCallRequest,
    pub decision: Decision,
    pub decided_at: DateTime<Utc>,
}

impl ApprovalRecord {
    /// Snapshot a request/decision pair at the current time.
    pub fn now(request: &ToolCallRequest, decision: &Decision) -> Self {
        Self {
            request: request.clone(),
            decision: decision.clone(),
            decided_at: Utc::now(),
        }
    }
}

/// Decisions that passed through the approval strategy or a human, in
/// order. Entries are only ever appended; whitelist hits and static policy
/// outcomes are not recorded.
#[derive(Debug, Clone, Default)]
pub struct ApprovalHistory {
    records: Vec<ApprovalRecord>,
}

impl ApprovalHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: ApprovalRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[ApprovalRecord] {
        &self.records
    }
}

/// A point-in-time summary of pipeline activity and policy flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GateStats {
    pub total_requests: usize,
    pub session_whitelist: usize,
    pub permanent_whitelist: usize,
    pub auto_approve_low_risk: bool,
    pub interactive: bool,
}
