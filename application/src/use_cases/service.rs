//! Ledger service facade
//!
//! Bundles the use cases over one pair of store handles so transports
//! (HTTP handlers, CLI commands) depend on a single type.

use super::accept_answer::{AcceptAnswerError, AcceptAnswerInput, AcceptAnswerUseCase, AcceptOutcome};
use super::project_total::{ItemTally, Projection, ProjectTotalUseCase};
use super::reconcile_totals::{ReconcileError, ReconcileReport, ReconcileTotalsUseCase};
use super::submit_vote::{SubmitVoteInput, SubmitVoteUseCase, VoteError, VoteOutcome};
use super::vote_status::{VoteStatus, VoteStatusInput, VoteStatusUseCase};
use crate::config::LedgerParams;
use crate::ports::content_store::ContentStore;
use crate::ports::vote_ledger::VoteLedger;
use ledger_domain::ItemRef;
use std::sync::Arc;

/// Service over trait objects, as wired by the binary.
pub type DynLedgerService = LedgerService<dyn VoteLedger, dyn ContentStore>;

pub struct LedgerService<L: VoteLedger + ?Sized, C: ContentStore + ?Sized> {
    submit: SubmitVoteUseCase<L, C>,
    status: VoteStatusUseCase<L, C>,
    accept: AcceptAnswerUseCase<C>,
    projector: ProjectTotalUseCase<L, C>,
    reconcile: ReconcileTotalsUseCase<L, C>,
}

impl<L: VoteLedger + ?Sized, C: ContentStore + ?Sized> LedgerService<L, C> {
    pub fn new(ledger: Arc<L>, content: Arc<C>, params: LedgerParams) -> Self {
        Self {
            submit: SubmitVoteUseCase::new(ledger.clone(), content.clone(), params.clone()),
            status: VoteStatusUseCase::new(ledger.clone(), content.clone(), params.clone()),
            accept: AcceptAnswerUseCase::new(content.clone(), params.clone()),
            projector: ProjectTotalUseCase::new(ledger.clone(), content.clone(), params.retry.clone()),
            reconcile: ReconcileTotalsUseCase::new(ledger, content, params),
        }
    }

    pub async fn submit_vote(&self, input: SubmitVoteInput) -> Result<VoteOutcome, VoteError> {
        self.submit.execute(input).await
    }

    pub async fn vote_status(&self, input: VoteStatusInput) -> Result<VoteStatus, VoteError> {
        self.status.execute(input).await
    }

    pub async fn accept_answer(
        &self,
        input: AcceptAnswerInput,
    ) -> Result<AcceptOutcome, AcceptAnswerError> {
        self.accept.execute(input).await
    }

    pub async fn recompute_total(&self, item: &ItemRef) -> Result<i64, VoteError> {
        self.projector.recompute_total(item).await
    }

    /// Ledger breakdown and stored total for one item. Writes nothing.
    pub async fn tally(&self, item: &ItemRef) -> Result<ItemTally, VoteError> {
        self.projector.read(item).await
    }

    /// Heal duplicate records on one item and re-project its total.
    pub async fn reconcile_item(&self, item: &ItemRef) -> Result<Projection, VoteError> {
        self.reconcile.reconcile_item(item).await
    }

    pub async fn reconcile(&self) -> Result<ReconcileReport, ReconcileError> {
        self.reconcile.execute().await
    }
}
