//! Votable content as seen by the ledger.
//!
//! Questions and answers are authored elsewhere; this core only reads their
//! ownership and writes two groups of fields: the projected `votes` total
//! and the acceptance flags.

use crate::acceptance::AcceptanceState;
use crate::core::ids::{AnswerId, QuestionId, UserId};
use crate::vote::value::ItemRef;
use serde::{Deserialize, Serialize};

/// Projection bookkeeping carried by every votable item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoteProjection {
    /// Σ value over the ledger entries for this item.
    pub votes: i64,
    /// Ledger sequence the `votes` value was computed from.
    #[serde(rename = "votes_watermark")]
    pub watermark: u64,
}

impl VoteProjection {
    /// Whether a total computed at `watermark` may replace this one.
    pub fn accepts(&self, watermark: u64) -> bool {
        watermark >= self.watermark
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub author_id: UserId,
    #[serde(flatten)]
    pub projection: VoteProjection,
    #[serde(flatten)]
    pub acceptance: AcceptanceState,
}

impl Question {
    pub fn new(id: impl Into<QuestionId>, author_id: impl Into<UserId>) -> Self {
        Self {
            id: id.into(),
            author_id: author_id.into(),
            projection: VoteProjection::default(),
            acceptance: AcceptanceState::default(),
        }
    }

    pub fn item_ref(&self) -> ItemRef {
        ItemRef::question(&self.id)
    }

    pub fn is_authored_by(&self, user: &UserId) -> bool {
        &self.author_id == user
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub id: AnswerId,
    pub question_id: QuestionId,
    pub author_id: UserId,
    #[serde(flatten)]
    pub projection: VoteProjection,
    #[serde(default)]
    pub is_accepted: bool,
}

impl Answer {
    pub fn new(
        id: impl Into<AnswerId>,
        question_id: impl Into<QuestionId>,
        author_id: impl Into<UserId>,
    ) -> Self {
        Self {
            id: id.into(),
            question_id: question_id.into(),
            author_id: author_id.into(),
            projection: VoteProjection::default(),
            is_accepted: false,
        }
    }

    pub fn item_ref(&self) -> ItemRef {
        ItemRef::answer(&self.id)
    }
}
