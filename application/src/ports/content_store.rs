//! Question/Answer store port
//!
//! The question/answer documents are owned by an external collaborator.
//! This port covers the lookups the ledger needs plus the two conditional
//! writes it owns: the projected vote total and the acceptance flags.

use super::store_error::StoreError;
use async_trait::async_trait;
use ledger_domain::{Answer, AnswerId, ItemRef, Question, QuestionId, Tally};

/// Result of writing a projected total onto an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionWrite {
    Applied,
    /// A total computed from a newer ledger state is already in place.
    Stale { current: i64 },
    /// The item no longer exists.
    Missing,
}

/// Result of a conditional acceptance update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcceptanceCommit {
    Committed,
    /// The question's acceptance pointer moved since it was read.
    Conflict,
    /// The question or the answer no longer exists.
    Missing,
}

#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn item_exists(&self, item: &ItemRef) -> Result<bool, StoreError>;

    /// The item's current `votes` field, `None` if the item does not exist.
    async fn projected_total(&self, item: &ItemRef) -> Result<Option<i64>, StoreError>;

    /// Write `tally.total` onto the item unless a newer projection (higher
    /// watermark) has already been written.
    async fn write_projection(
        &self,
        item: &ItemRef,
        tally: &Tally,
    ) -> Result<ProjectionWrite, StoreError>;

    /// Every question and answer, for reconciliation sweeps.
    async fn votable_items(&self) -> Result<Vec<ItemRef>, StoreError>;

    async fn find_question(&self, id: &QuestionId) -> Result<Option<Question>, StoreError>;

    async fn find_answer(&self, id: &AnswerId) -> Result<Option<Answer>, StoreError>;

    async fn answers_for(&self, question: &QuestionId) -> Result<Vec<Answer>, StoreError>;

    /// Atomically make `target` the only accepted answer of `question` and
    /// point the question at it.
    ///
    /// Applies only if the question's current accepted answer equals
    /// `expected` (`None` meaning no answer accepted yet).
    async fn commit_acceptance(
        &self,
        question: &QuestionId,
        expected: Option<&AnswerId>,
        target: &AnswerId,
    ) -> Result<AcceptanceCommit, StoreError>;
}
