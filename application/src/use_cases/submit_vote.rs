//! Submit Vote use case (the Vote Toggle Engine)
//!
//! Applies one vote to the ledger and re-projects the item's total:
//!
//! 1. Validate the value and item kind (no store access)
//! 2. Check the item exists
//! 3. Read the `(user, item)` slot, healing duplicates
//! 4. Decide insert / retract / flip and commit it with compare-and-swap,
//!    re-reading on conflict
//! 5. Recompute the item's total from the ledger

use super::project_total::ProjectTotalUseCase;
use super::shared::{ErrorKind, load_slot};
use crate::config::LedgerParams;
use crate::ports::content_store::ContentStore;
use crate::ports::store_error::StoreError;
use crate::ports::vote_ledger::{CommitOutcome, VoteLedger};
use ledger_domain::{
    DomainError, ItemId, ItemKind, ItemRef, RecordVersion, UserId, VoteRecord, VoteTransition,
    VoteValue,
};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur while voting or reading vote state
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VoteError {
    #[error("Invalid vote value: {0} (expected +1 or -1)")]
    InvalidVoteValue(i64),

    #[error("Unknown item kind: '{0}' (expected 'question' or 'answer')")]
    UnknownItemKind(String),

    #[error("Unknown item: {0}")]
    UnknownItem(ItemRef),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Store error: {0}")]
    Store(StoreError),
}

impl VoteError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            VoteError::InvalidVoteValue(_) | VoteError::UnknownItemKind(_) => ErrorKind::Validation,
            VoteError::UnknownItem(_) => ErrorKind::NotFound,
            VoteError::ServiceUnavailable(_) => ErrorKind::Unavailable,
            VoteError::Store(e) => ErrorKind::of_store_error(e),
        }
    }
}

impl From<DomainError> for VoteError {
    fn from(error: DomainError) -> Self {
        match error {
            DomainError::InvalidVoteValue(v) => VoteError::InvalidVoteValue(v),
            DomainError::UnknownItemKind(k) => VoteError::UnknownItemKind(k),
            other => VoteError::Store(StoreError::Corrupt(other.to_string())),
        }
    }
}

impl From<StoreError> for VoteError {
    fn from(error: StoreError) -> Self {
        if error.is_unavailable() {
            VoteError::ServiceUnavailable(error.to_string())
        } else {
            VoteError::Store(error)
        }
    }
}

/// Input for the SubmitVote use case
///
/// Carries the raw value and kind so validation errors are reported by the
/// use case rather than by each transport.
#[derive(Debug, Clone)]
pub struct SubmitVoteInput {
    pub user_id: UserId,
    pub item_id: ItemId,
    pub item_kind: String,
    pub value: i64,
}

impl SubmitVoteInput {
    pub fn new(
        user_id: impl Into<UserId>,
        item_id: impl Into<ItemId>,
        item_kind: impl Into<String>,
        value: i64,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            item_id: item_id.into(),
            item_kind: item_kind.into(),
            value,
        }
    }

    /// Parse into domain types. Value is checked before kind.
    pub fn validate(&self) -> Result<(ItemRef, VoteValue), VoteError> {
        let value = VoteValue::try_from(self.value)?;
        let kind: ItemKind = self.item_kind.parse()?;
        Ok((ItemRef::new(self.item_id.clone(), kind), value))
    }
}

/// Result of a vote: the item's new total and the caller's resulting vote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VoteOutcome {
    pub total_votes: i64,
    /// `1`, `-1`, or `0` after an un-vote.
    pub user_vote: i64,
}

/// Use case for submitting (or toggling off) a vote
pub struct SubmitVoteUseCase<L: VoteLedger + ?Sized, C: ContentStore + ?Sized> {
    ledger: Arc<L>,
    content: Arc<C>,
    projector: ProjectTotalUseCase<L, C>,
    params: LedgerParams,
}

impl<L: VoteLedger + ?Sized, C: ContentStore + ?Sized> SubmitVoteUseCase<L, C> {
    pub fn new(ledger: Arc<L>, content: Arc<C>, params: LedgerParams) -> Self {
        let projector =
            ProjectTotalUseCase::new(Arc::clone(&ledger), Arc::clone(&content), params.retry.clone());
        Self {
            ledger,
            content,
            projector,
            params,
        }
    }

    pub async fn execute(&self, input: SubmitVoteInput) -> Result<VoteOutcome, VoteError> {
        let (item, value) = input.validate()?;
        let user = &input.user_id;
        let item = &item;
        let retry = &self.params.retry;
        let ledger = self.ledger.as_ref();
        let content = self.content.as_ref();

        let exists = retry
            .run("item_exists", move || content.item_exists(item))
            .await?;
        if !exists {
            return Err(VoteError::UnknownItem(item.clone()));
        }

        let transition = self.commit_toggle(ledger, user, item, value).await?;

        info!(
            user_id = %user,
            item = %item,
            value = %value,
            transition = transition.describe(),
            "Vote committed"
        );

        // The ledger write above is the durability boundary; a projection
        // failure leaves the vote recorded and the total is repaired by the
        // next projection of this item.
        let total_votes = match self.projector.recompute_total(item).await {
            Ok(total) => total,
            Err(e) => {
                warn!(item = %item, "Vote recorded but total not refreshed: {}", e);
                return Err(e);
            }
        };

        Ok(VoteOutcome {
            total_votes,
            user_vote: transition.user_vote(),
        })
    }

    /// Read-decide-write loop with optimistic concurrency on the slot.
    async fn commit_toggle(
        &self,
        ledger: &L,
        user: &UserId,
        item: &ItemRef,
        value: VoteValue,
    ) -> Result<VoteTransition, VoteError> {
        let retry = &self.params.retry;
        // After a lost CAS, the write we attempted may in fact have landed
        // (e.g. the commit timed out after applying and the retry saw our
        // own record). Recognise that instead of toggling a second time.
        let mut previous_attempt: Option<(VoteTransition, Option<RecordVersion>)> = None;

        for conflicts in 0..=self.params.max_conflict_retries {
            let slot = load_slot(ledger, retry, user, item).await?;
            let current = slot.record;

            if let Some((transition, intended)) = &previous_attempt
                && slot_matches(current.as_ref(), intended.as_ref())
            {
                debug!(item = %item, "Previous commit attempt had already applied");
                return Ok(*transition);
            }

            let transition = VoteTransition::decide(current.as_ref().map(|r| r.value), value);
            let next = transition.next_record(current.as_ref(), user, item, chrono::Utc::now());
            let intended = next.as_ref().map(VoteRecord::version);
            let expected = current.as_ref().map(VoteRecord::version);
            let expected = expected.as_ref();

            debug!(
                user_id = %user,
                item = %item,
                transition = transition.describe(),
                attempt = conflicts + 1,
                "Committing vote"
            );

            let outcome = retry
                .run("commit_vote", move || {
                    ledger.commit_vote(user, item, expected, next.clone())
                })
                .await?;

            match outcome {
                CommitOutcome::Committed => return Ok(transition),
                CommitOutcome::Conflict => {
                    debug!(item = %item, user_id = %user, "Vote slot changed concurrently, re-reading");
                    previous_attempt = Some((transition, intended));
                }
            }
        }

        warn!(
            user_id = %user,
            item = %item,
            "Giving up after {} conflicting commits",
            self.params.max_conflict_retries + 1
        );
        Err(VoteError::ServiceUnavailable(format!(
            "too much contention on {}",
            item
        )))
    }
}

/// Whether the slot now holds exactly what an earlier attempt tried to write.
fn slot_matches(current: Option<&VoteRecord>, intended: Option<&RecordVersion>) -> bool {
    match (current, intended) {
        (None, None) => true,
        (Some(record), Some(version)) => version.matches(record),
        _ => false,
    }
}
