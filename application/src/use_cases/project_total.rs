//! Project Total use case (the Aggregate Projector)
//!
//! Recomputes an item's vote total from the ledger and writes it onto the
//! item's `votes` field. The total is always a full resummation, never an
//! increment, so replaying a projection is harmless and a lost projection
//! is repaired by the next one.

use super::submit_vote::VoteError;
use crate::config::RetryPolicy;
use crate::ports::content_store::{ContentStore, ProjectionWrite};
use crate::ports::vote_ledger::VoteLedger;
use ledger_domain::{ItemRef, Tally};
use std::sync::Arc;
use tracing::{debug, warn};

/// Outcome of one projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Projection {
    /// The tally read from the ledger.
    pub tally: Tally,
    /// The total now standing on the item.
    pub total: i64,
    /// Whether this run wrote the total (false if a newer one was already in place).
    pub applied: bool,
}

/// Read-only view of an item: the ledger breakdown next to the stored total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemTally {
    /// The tally read from the ledger; `tally.total` is the authoritative sum.
    pub tally: Tally,
    /// The item's denormalized `votes` field, which may lag the ledger.
    pub stored_total: i64,
}

impl ItemTally {
    pub fn in_sync(&self) -> bool {
        self.tally.total == self.stored_total
    }
}

/// Use case for recomputing an item's denormalized vote total
pub struct ProjectTotalUseCase<L: VoteLedger + ?Sized, C: ContentStore + ?Sized> {
    ledger: Arc<L>,
    content: Arc<C>,
    retry: RetryPolicy,
}

impl<L: VoteLedger + ?Sized, C: ContentStore + ?Sized> ProjectTotalUseCase<L, C> {
    pub fn new(ledger: Arc<L>, content: Arc<C>, retry: RetryPolicy) -> Self {
        Self {
            ledger,
            content,
            retry,
        }
    }

    /// Recompute and write the total, returning the total now on the item.
    pub async fn recompute_total(&self, item: &ItemRef) -> Result<i64, VoteError> {
        Ok(self.project(item).await?.total)
    }

    /// Read the ledger tally and the stored total without writing anything.
    pub async fn read(&self, item: &ItemRef) -> Result<ItemTally, VoteError> {
        let ledger = self.ledger.as_ref();
        let content = self.content.as_ref();

        let Some(stored_total) = self
            .retry
            .run("projected_total", move || content.projected_total(item))
            .await?
        else {
            return Err(VoteError::UnknownItem(item.clone()));
        };
        let tally = self.retry.run("tally", move || ledger.tally(item)).await?;
        Ok(ItemTally { tally, stored_total })
    }

    /// Recompute and write the total, returning the full outcome.
    pub async fn project(&self, item: &ItemRef) -> Result<Projection, VoteError> {
        let ledger = self.ledger.as_ref();
        let content = self.content.as_ref();

        let tally = self.retry.run("tally", move || ledger.tally(item)).await?;
        let tally_ref = &tally;
        let write = self
            .retry
            .run("write_projection", move || {
                content.write_projection(item, tally_ref)
            })
            .await?;

        match write {
            ProjectionWrite::Applied => {
                debug!(
                    item = %item,
                    total = tally.total,
                    watermark = tally.watermark,
                    "Projected vote total"
                );
                Ok(Projection {
                    tally,
                    total: tally.total,
                    applied: true,
                })
            }
            ProjectionWrite::Stale { current } => {
                debug!(
                    item = %item,
                    computed = tally.total,
                    current,
                    "Newer projection already in place"
                );
                Ok(Projection {
                    tally,
                    total: current,
                    applied: false,
                })
            }
            ProjectionWrite::Missing => {
                warn!(item = %item, "Item disappeared before its total could be written");
                Err(VoteError::UnknownItem(item.clone()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::MemoryStore;
    use ledger_domain::{Answer, UserId, VoteRecord, VoteValue};

    fn seeded() -> Arc<MemoryStore> {
        let store = MemoryStore::new();
        store.add_answer(Answer::new("x", "q", "author"));
        Arc::new(store)
    }

    fn use_case(store: &Arc<MemoryStore>) -> ProjectTotalUseCase<MemoryStore, MemoryStore> {
        ProjectTotalUseCase::new(store.clone(), store.clone(), RetryPolicy::none())
    }

    #[tokio::test]
    async fn test_projects_sum_of_ledger() {
        let store = seeded();
        let item = ItemRef::answer("x");
        for (user, value) in [("a", VoteValue::Up), ("b", VoteValue::Up), ("c", VoteValue::Down)] {
            store.push_raw(VoteRecord::new(
                UserId::new(user),
                item.clone(),
                value,
                chrono::Utc::now(),
            ));
        }

        let total = use_case(&store).recompute_total(&item).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(store.total_of(&item), Some(1));
    }

    #[tokio::test]
    async fn test_replaying_projection_is_idempotent() {
        let store = seeded();
        let item = ItemRef::answer("x");
        store.push_raw(VoteRecord::new(
            UserId::new("a"),
            item.clone(),
            VoteValue::Down,
            chrono::Utc::now(),
        ));

        let uc = use_case(&store);
        let first = uc.project(&item).await.unwrap();
        let second = uc.project(&item).await.unwrap();

        assert_eq!(first.total, -1);
        assert_eq!(second.total, -1);
        assert!(second.applied);
    }

    #[tokio::test]
    async fn test_read_does_not_write() {
        let store = seeded();
        let item = ItemRef::answer("x");
        store.push_raw(VoteRecord::new(
            UserId::new("a"),
            item.clone(),
            VoteValue::Up,
            chrono::Utc::now(),
        ));

        let read = use_case(&store).read(&item).await.unwrap();

        assert_eq!(read.tally.total, 1);
        assert_eq!(read.tally.upvotes, 1);
        assert_eq!(read.stored_total, 0);
        assert!(!read.in_sync());
        assert_eq!(store.total_of(&item), Some(0));
        assert!(matches!(
            use_case(&store).read(&ItemRef::answer("nope")).await,
            Err(VoteError::UnknownItem(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_item_is_unknown() {
        let store = seeded();
        let result = use_case(&store)
            .recompute_total(&ItemRef::question("nope"))
            .await;
        assert!(matches!(result, Err(VoteError::UnknownItem(_))));
    }
}
