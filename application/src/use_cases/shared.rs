//! Shared utilities for use cases.
//!
//! Contains the caller-facing error taxonomy and the ledger slot loader
//! that heals duplicate records, used by SubmitVote and VoteStatus.

use crate::config::RetryPolicy;
use crate::ports::store_error::StoreError;
use crate::ports::vote_ledger::VoteLedger;
use ledger_domain::{ItemRef, UserId, VoteRecord, most_recent};
use tracing::{error, info};

/// Caller-facing error category.
///
/// Transport layers map these to status codes; only `Unavailable` is worth
/// retrying from the outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input, rejected before touching the store.
    Validation,
    NotFound,
    NotAuthorized,
    /// Store unreachable or too contended; try again later.
    Unavailable,
    Internal,
}

impl ErrorKind {
    pub fn of_store_error(error: &StoreError) -> Self {
        if error.is_unavailable() {
            ErrorKind::Unavailable
        } else {
            ErrorKind::Internal
        }
    }
}

/// What a ledger slot held once any duplicates were collapsed.
pub(crate) struct LoadedSlot {
    pub record: Option<VoteRecord>,
    /// Duplicate records were discarded; the item's total must be
    /// re-projected.
    pub healed: bool,
}

/// Read the `(user, item)` slot, collapsing duplicates to the most recent
/// record.
pub(crate) async fn load_slot<L: VoteLedger + ?Sized>(
    ledger: &L,
    retry: &RetryPolicy,
    user: &UserId,
    item: &ItemRef,
) -> Result<LoadedSlot, StoreError> {
    let mut records = retry
        .run("find_votes", move || ledger.find_votes(user, item))
        .await?;

    if records.len() <= 1 {
        return Ok(LoadedSlot {
            record: records.pop(),
            healed: false,
        });
    }

    let Some(keep) = most_recent(&records).cloned() else {
        return Ok(LoadedSlot {
            record: None,
            healed: false,
        });
    };

    error!(
        user_id = %user,
        item = %item,
        records = records.len(),
        keep = %keep.id,
        "Invariant violation: multiple ledger records for one user-item pair"
    );

    let version = keep.version();
    let version = &version;
    let removed = retry
        .run("discard_duplicates", move || {
            ledger.discard_duplicates(user, item, version)
        })
        .await?;
    info!(user_id = %user, item = %item, removed, "Collapsed duplicate ledger records");

    Ok(LoadedSlot {
        record: Some(keep),
        healed: true,
    })
}
