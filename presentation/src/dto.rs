//! Wire shapes shared by the HTTP API and the CLI's JSON output.
//!
//! All bodies use camelCase field names.

use ledger_application::{AcceptOutcome, ItemTally, ReconcileReport, VoteOutcome, VoteStatus};
use ledger_domain::ItemRef;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    pub user_id: String,
    pub item_id: String,
    pub item_kind: String,
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteResponse {
    pub total_votes: i64,
    pub user_vote: i64,
}

impl From<VoteOutcome> for VoteResponse {
    fn from(outcome: VoteOutcome) -> Self {
        Self {
            total_votes: outcome.total_votes,
            user_vote: outcome.user_vote,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteStatusQuery {
    pub user_id: String,
    pub item_id: String,
    pub item_kind: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteStatusResponse {
    pub user_vote: i64,
    pub total_votes: i64,
}

impl From<VoteStatus> for VoteStatusResponse {
    fn from(status: VoteStatus) -> Self {
        Self {
            user_vote: status.user_vote,
            total_votes: status.total_votes,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptRequest {
    pub requesting_user_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptResponse {
    pub answer_id: String,
    pub is_accepted: bool,
}

impl From<AcceptOutcome> for AcceptResponse {
    fn from(outcome: AcceptOutcome) -> Self {
        Self {
            answer_id: outcome.answer_id.to_string(),
            is_accepted: outcome.is_accepted,
        }
    }
}

/// Vote breakdown for one item.
///
/// `totalVotes`, `upvotes` and `downvotes` come from one ledger read;
/// `storedTotal` is the item's denormalized field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TallyResponse {
    pub item_id: String,
    pub item_kind: String,
    pub total_votes: i64,
    pub upvotes: u64,
    pub downvotes: u64,
    pub stored_total: i64,
}

impl TallyResponse {
    pub fn new(item: &ItemRef, tally: &ItemTally) -> Self {
        Self {
            item_id: item.id.to_string(),
            item_kind: item.kind.as_str().to_string(),
            total_votes: tally.tally.total,
            upvotes: tally.tally.upvotes,
            downvotes: tally.tally.downvotes,
            stored_total: tally.stored_total,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileResponse {
    pub items_checked: usize,
    pub healed: Vec<String>,
    pub corrected: Vec<String>,
    pub failed: Vec<String>,
    pub acceptance_violations: Vec<String>,
}

impl From<&ReconcileReport> for ReconcileResponse {
    fn from(report: &ReconcileReport) -> Self {
        Self {
            items_checked: report.items_checked,
            healed: report.healed.iter().map(ToString::to_string).collect(),
            corrected: report.corrected.iter().map(ToString::to_string).collect(),
            failed: report.failed.iter().map(ToString::to_string).collect(),
            acceptance_violations: report
                .acceptance_violations
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}
