//! Vote Ledger port
//!
//! Defines the interface to the durable collection of vote records.

use super::store_error::StoreError;
use async_trait::async_trait;
use ledger_domain::{ItemRef, RecordVersion, Tally, UserId, VoteRecord};

/// Result of a compare-and-swap on a ledger slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The slot held the expected record and now holds the new one.
    Committed,
    /// The slot changed since it was read; nothing was written.
    Conflict,
}

/// Durable vote ledger
///
/// A *slot* is everything stored for one `(user, item)` pair. Adapters must
/// execute each method as a single atomic store operation; no method may
/// hold a lock across calls.
#[async_trait]
pub trait VoteLedger: Send + Sync {
    /// Every record in the slot, most adapters returning zero or one.
    ///
    /// More than one record means the uniqueness invariant was broken
    /// (e.g. by legacy data) and the caller must heal it.
    async fn find_votes(&self, user: &UserId, item: &ItemRef)
    -> Result<Vec<VoteRecord>, StoreError>;

    /// Replace the slot's content with `next` (or empty it when `None`).
    ///
    /// Applies only if the slot currently holds exactly one record matching
    /// `expected`, or is empty when `expected` is `None`.
    async fn commit_vote(
        &self,
        user: &UserId,
        item: &ItemRef,
        expected: Option<&RecordVersion>,
        next: Option<VoteRecord>,
    ) -> Result<CommitOutcome, StoreError>;

    /// Remove every record in the slot except `keep`. Returns how many were
    /// removed.
    async fn discard_duplicates(
        &self,
        user: &UserId,
        item: &ItemRef,
        keep: &RecordVersion,
    ) -> Result<usize, StoreError>;

    /// Sum of all record values for `item`, with the ledger sequence it was
    /// read at.
    async fn tally(&self, item: &ItemRef) -> Result<Tally, StoreError>;

    /// Users whose slot on `item` holds more than one record.
    async fn duplicate_voters(&self, item: &ItemRef) -> Result<Vec<UserId>, StoreError>;
}
