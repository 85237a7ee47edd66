//! Ledger entries.

use crate::core::ids::{UserId, VoteId};
use crate::vote::value::{ItemRef, VoteValue};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One user's vote on one item.
///
/// At most one record exists per `(user_id, item)` pair. The record is
/// created on the first vote, flipped in place on a change of mind and
/// deleted on an un-vote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    pub id: VoteId,
    pub user_id: UserId,
    #[serde(flatten)]
    pub item: ItemRef,
    pub value: VoteValue,
    /// Bumped on every in-place update; used for compare-and-swap commits.
    #[serde(default)]
    pub revision: u64,
    pub updated_at: DateTime<Utc>,
}

impl VoteRecord {
    pub fn new(user_id: UserId, item: ItemRef, value: VoteValue, now: DateTime<Utc>) -> Self {
        Self {
            id: VoteId::generate(),
            user_id,
            item,
            value,
            revision: 0,
            updated_at: now,
        }
    }

    /// Copy of this record holding `value`, one revision later.
    pub fn flipped_to(&self, value: VoteValue, now: DateTime<Utc>) -> Self {
        Self {
            value,
            revision: self.revision + 1,
            updated_at: now,
            ..self.clone()
        }
    }

    pub fn version(&self) -> RecordVersion {
        RecordVersion {
            id: self.id.clone(),
            revision: self.revision,
        }
    }
}

/// Identity plus revision of a record, as observed by a reader.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordVersion {
    pub id: VoteId,
    pub revision: u64,
}

impl RecordVersion {
    pub fn matches(&self, record: &VoteRecord) -> bool {
        self.id == record.id && self.revision == record.revision
    }
}

/// The caller-facing vote state: `1`, `-1`, or `0` when no record exists.
pub fn user_vote(record: Option<&VoteRecord>) -> i64 {
    record.map_or(0, |r| r.value.as_i64())
}

/// Pick the record to keep when a slot holds more than one entry.
///
/// The most recently updated record wins; revision breaks ties, then id so
/// the choice is deterministic.
pub fn most_recent(records: &[VoteRecord]) -> Option<&VoteRecord> {
    records
        .iter()
        .max_by(|a, b| {
            a.updated_at
                .cmp(&b.updated_at)
                .then(a.revision.cmp(&b.revision))
                .then(a.id.cmp(&b.id))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn record(value: VoteValue, secs: i64) -> VoteRecord {
        VoteRecord::new(UserId::new("u"), ItemRef::answer("a"), value, at(secs))
    }

    #[test]
    fn test_flip_bumps_revision_and_keeps_identity() {
        let original = record(VoteValue::Up, 10);
        let flipped = original.flipped_to(VoteValue::Down, at(20));

        assert_eq!(flipped.id, original.id);
        assert_eq!(flipped.revision, 1);
        assert_eq!(flipped.value, VoteValue::Down);
        assert_eq!(flipped.updated_at, at(20));
        assert!(!original.version().matches(&flipped));
    }

    #[test]
    fn test_user_vote() {
        assert_eq!(user_vote(None), 0);
        assert_eq!(user_vote(Some(&record(VoteValue::Down, 0))), -1);
    }

    #[test]
    fn test_most_recent_prefers_latest_update() {
        let old = record(VoteValue::Up, 10);
        let new = record(VoteValue::Down, 30);
        let mid = record(VoteValue::Up, 20);
        let records = vec![old, new.clone(), mid];

        assert_eq!(most_recent(&records), Some(&new));
        assert_eq!(most_recent(&[]), None);
    }

    #[test]
    fn test_serialized_shape_is_flat() {
        let value = serde_json::to_value(record(VoteValue::Up, 0)).unwrap();
        assert_eq!(value["item_id"], "a");
        assert_eq!(value["item_kind"], "answer");
        assert_eq!(value["value"], 1);
        assert_eq!(value["user_id"], "u");
    }
}
