//! The toggle decision: given what the ledger holds for a user and an
//! incoming vote, what happens to the ledger entry.

use crate::core::ids::UserId;
use crate::vote::record::VoteRecord;
use crate::vote::value::{ItemRef, VoteValue};
use chrono::{DateTime, Utc};

/// Outcome of applying an incoming vote to the current ledger entry.
///
/// | Existing | Incoming | Transition |
/// |----------|----------|------------|
/// | none     | v        | `Insert(v)` |
/// | v        | v        | `Retract`  |
/// | -v       | v        | `Flip(v)`  |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteTransition {
    Insert(VoteValue),
    Retract,
    Flip(VoteValue),
}

impl VoteTransition {
    pub fn decide(existing: Option<VoteValue>, incoming: VoteValue) -> Self {
        match existing {
            None => VoteTransition::Insert(incoming),
            Some(current) if current == incoming => VoteTransition::Retract,
            Some(_) => VoteTransition::Flip(incoming),
        }
    }

    /// The user's vote once this transition is committed.
    pub fn user_vote(&self) -> i64 {
        match self {
            VoteTransition::Insert(v) | VoteTransition::Flip(v) => v.as_i64(),
            VoteTransition::Retract => 0,
        }
    }

    /// The record that should occupy the slot after the transition, or
    /// `None` when the slot becomes empty.
    pub fn next_record(
        &self,
        existing: Option<&VoteRecord>,
        user_id: &UserId,
        item: &ItemRef,
        now: DateTime<Utc>,
    ) -> Option<VoteRecord> {
        match (self, existing) {
            (VoteTransition::Retract, _) => None,
            (VoteTransition::Flip(v), Some(record)) => Some(record.flipped_to(*v, now)),
            (VoteTransition::Insert(v) | VoteTransition::Flip(v), _) => Some(VoteRecord::new(
                user_id.clone(),
                item.clone(),
                *v,
                now,
            )),
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            VoteTransition::Insert(_) => "insert",
            VoteTransition::Retract => "retract",
            VoteTransition::Flip(_) => "flip",
        }
    }
}
