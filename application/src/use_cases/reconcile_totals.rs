//! Reconcile Totals use case
//!
//! Sweeps every votable item, recomputing its total from the ledger, and
//! checks each question's acceptance flags against its pointer. Duplicate
//! ledger records are collapsed before the total is recomputed, so a sweep
//! never publishes a total that counts one voter twice. Totals are
//! repaired; acceptance violations are only reported.

use super::project_total::{Projection, ProjectTotalUseCase};
use super::shared::load_slot;
use super::submit_vote::VoteError;
use crate::config::LedgerParams;
use crate::ports::content_store::ContentStore;
use crate::ports::store_error::StoreError;
use crate::ports::vote_ledger::VoteLedger;
use ledger_domain::{ItemKind, ItemRef, QuestionId, verify_acceptance};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReconcileError {
    #[error("Could not list votable items: {0}")]
    Listing(StoreError),
}

/// Summary of one reconciliation sweep
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    pub items_checked: usize,
    /// Items whose ledger held several records for one voter. Each such
    /// slot was collapsed to its most recent record.
    pub healed: Vec<ItemRef>,
    /// Items whose stored total differed from the ledger and was rewritten.
    pub corrected: Vec<ItemRef>,
    /// Items that could not be projected this sweep.
    pub failed: Vec<ItemRef>,
    /// Questions whose acceptance flags disagree with their pointer.
    pub acceptance_violations: Vec<QuestionId>,
}

impl ReconcileReport {
    pub fn is_clean(&self) -> bool {
        self.healed.is_empty()
            && self.corrected.is_empty()
            && self.failed.is_empty()
            && self.acceptance_violations.is_empty()
    }
}

pub struct ReconcileTotalsUseCase<L: VoteLedger + ?Sized, C: ContentStore + ?Sized> {
    ledger: Arc<L>,
    content: Arc<C>,
    projector: ProjectTotalUseCase<L, C>,
    params: LedgerParams,
}

impl<L: VoteLedger + ?Sized, C: ContentStore + ?Sized> ReconcileTotalsUseCase<L, C> {
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

    /// Heal and re-project a single item.
    pub async fn reconcile_item(&self, item: &ItemRef) -> Result<Projection, VoteError> {
        self.heal_item(item).await?;
        self.projector.project(item).await
    }

    /// Collapse every duplicate slot on `item`. Returns how many slots were
    /// healed.
    async fn heal_item(&self, item: &ItemRef) -> Result<usize, StoreError> {
        let retry = &self.params.retry;
        let ledger = self.ledger.as_ref();

        let users = retry
            .run("duplicate_voters", move || ledger.duplicate_voters(item))
            .await?;

        let mut healed = 0;
        for user in &users {
            if load_slot(ledger, retry, user, item).await?.healed {
                healed += 1;
            }
        }
        Ok(healed)
    }

    /// Reconcile every votable item.
    pub async fn execute(&self) -> Result<ReconcileReport, ReconcileError> {
        let retry = &self.params.retry;
        let content = self.content.as_ref();

        let items = retry
            .run("votable_items", move || content.votable_items())
            .await
            .map_err(ReconcileError::Listing)?;

        let mut report = ReconcileReport {
            items_checked: items.len(),
            ..Default::default()
        };

        for item in &items {
            let before = retry
                .run("projected_total", move || content.projected_total(item))
                .await
                .ok()
                .flatten();

            let projected = match self.heal_item(item).await {
                Ok(healed) => {
                    if healed > 0 {
                        report.healed.push(item.clone());
                    }
                    self.projector.project(item).await
                }
                Err(e) => Err(VoteError::from(e)),
            };

            match projected {
                Ok(projection) => {
                    if projection.applied && before != Some(projection.total) {
                        warn!(
                            item = %item,
                            stored = ?before,
                            ledger = projection.total,
                            "Corrected drifted vote total"
                        );
                        report.corrected.push(item.clone());
                    }
                }
                Err(e) => {
                    warn!(item = %item, "Failed to reconcile item: {}", e);
                    report.failed.push(item.clone());
                }
            }

            if item.kind == ItemKind::Question {
                let question = QuestionId::new(item.id.as_str());
                if !self.acceptance_consistent(&question).await {
                    report.acceptance_violations.push(question);
                }
            }
        }

        info!(
            items = report.items_checked,
            healed = report.healed.len(),
            corrected = report.corrected.len(),
            failed = report.failed.len(),
            acceptance_violations = report.acceptance_violations.len(),
            "Reconciliation sweep finished"
        );
        Ok(report)
    }

    /// False only for a confirmed violation; read failures are logged and
    /// left for the next sweep.
    async fn acceptance_consistent(&self, id: &QuestionId) -> bool {
        let retry = &self.params.retry;
        let content = self.content.as_ref();

        let question = match retry.run("find_question", move || content.find_question(id)).await {
            Ok(Some(q)) => q,
            Ok(None) => return true,
            Err(e) => {
                warn!(question_id = %id, "Skipping acceptance check: {}", e);
                return true;
            }
        };
        let answers = match retry.run("answers_for", move || content.answers_for(id)).await {
            Ok(answers) => answers,
            Err(e) => {
                warn!(question_id = %id, "Skipping acceptance check: {}", e);
                return true;
            }
        };

        match verify_acceptance(&question, &answers) {
            Ok(()) => true,
            Err(violation) => {
                error!(question_id = %id, "Acceptance invariant violated: {}", violation);
                false
            }
        }
    }
}
