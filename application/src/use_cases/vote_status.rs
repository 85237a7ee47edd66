//! Vote Status use case
//!
//! Read-only view of one user's vote on an item plus the item's current
//! total. Duplicate ledger records found on the way are healed, which is
//! the only write this path can make.

use super::project_total::ProjectTotalUseCase;
use super::shared::load_slot;
use super::submit_vote::VoteError;
use crate::config::LedgerParams;
use crate::ports::content_store::ContentStore;
use crate::ports::vote_ledger::VoteLedger;
use ledger_domain::{ItemId, ItemKind, ItemRef, UserId, user_vote};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Input for the VoteStatus use case
#[derive(Debug, Clone)]
pub struct VoteStatusInput {
    pub user_id: UserId,
    pub item_id: ItemId,
    pub item_kind: String,
}

impl VoteStatusInput {
    pub fn new(
        user_id: impl Into<UserId>,
        item_id: impl Into<ItemId>,
        item_kind: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            item_id: item_id.into(),
            item_kind: item_kind.into(),
        }
    }
}

/// A user's standing vote and the item's total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VoteStatus {
    pub user_vote: i64,
    pub total_votes: i64,
}

pub struct VoteStatusUseCase<L: VoteLedger + ?Sized, C: ContentStore + ?Sized> {
    ledger: Arc<L>,
    content: Arc<C>,
    projector: ProjectTotalUseCase<L, C>,
    params: LedgerParams,
}

impl<L: VoteLedger + ?Sized, C: ContentStore + ?Sized> VoteStatusUseCase<L, C> {
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

    pub async fn execute(&self, input: VoteStatusInput) -> Result<VoteStatus, VoteError> {
        let kind: ItemKind = input.item_kind.parse()?;
        let item = ItemRef::new(input.item_id.clone(), kind);
        let item = &item;
        let user = &input.user_id;
        let retry = &self.params.retry;
        let content = self.content.as_ref();

        let Some(projected) = retry
            .run("projected_total", move || content.projected_total(item))
            .await?
        else {
            return Err(VoteError::UnknownItem(item.clone()));
        };

        let slot = load_slot(self.ledger.as_ref(), retry, user, item).await?;
        let total_votes = if slot.healed {
            debug!(item = %item, "Re-projecting total after healing duplicates");
            self.projector.recompute_total(item).await?
        } else {
            projected
        };

        Ok(VoteStatus {
            user_vote: user_vote(slot.record.as_ref()),
            total_votes,
        })
    }
}
