//! Accept Answer use case (the Acceptance Controller)
//!
//! Marks an answer as its question's accepted answer. Only the question's
//! author may do this, and at most one answer per question is accepted at
//! any time. The pointer move is a single conditional write keyed on the
//! pointer value we read, so two concurrent accepts on the same question
//! serialize: the loser re-reads and re-plans.

use super::shared::ErrorKind;
use crate::config::LedgerParams;
use crate::ports::content_store::{AcceptanceCommit, ContentStore};
use crate::ports::store_error::StoreError;
use ledger_domain::{AcceptancePlan, AnswerId, DomainError, UserId};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Errors that can occur during acceptance
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AcceptAnswerError {
    #[error("Answer not found: {0}")]
    AnswerNotFound(AnswerId),

    #[error("only the question author can accept answers")]
    NotAuthorized,

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Store error: {0}")]
    Store(StoreError),
}

impl AcceptAnswerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AcceptAnswerError::AnswerNotFound(_) => ErrorKind::NotFound,
            AcceptAnswerError::NotAuthorized => ErrorKind::NotAuthorized,
            AcceptAnswerError::ServiceUnavailable(_) => ErrorKind::Unavailable,
            AcceptAnswerError::Store(e) => ErrorKind::of_store_error(e),
        }
    }
}

impl From<StoreError> for AcceptAnswerError {
    fn from(error: StoreError) -> Self {
        if error.is_unavailable() {
            AcceptAnswerError::ServiceUnavailable(error.to_string())
        } else {
            AcceptAnswerError::Store(error)
        }
    }
}

/// Input for the AcceptAnswer use case
#[derive(Debug, Clone)]
pub struct AcceptAnswerInput {
    pub user_id: UserId,
    pub answer_id: AnswerId,
}

impl AcceptAnswerInput {
    pub fn new(user_id: impl Into<UserId>, answer_id: impl Into<AnswerId>) -> Self {
        Self {
            user_id: user_id.into(),
            answer_id: answer_id.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AcceptOutcome {
    pub answer_id: AnswerId,
    pub is_accepted: bool,
}

pub struct AcceptAnswerUseCase<C: ContentStore + ?Sized> {
    content: Arc<C>,
    params: LedgerParams,
}

impl<C: ContentStore + ?Sized> AcceptAnswerUseCase<C> {
    pub fn new(content: Arc<C>, params: LedgerParams) -> Self {
        Self { content, params }
    }

    pub async fn execute(&self, input: AcceptAnswerInput) -> Result<AcceptOutcome, AcceptAnswerError> {
        let retry = &self.params.retry;
        let content = self.content.as_ref();
        let answer_id = &input.answer_id;
        let user = &input.user_id;

        let Some(answer) = retry
            .run("find_answer", move || content.find_answer(answer_id))
            .await?
        else {
            return Err(AcceptAnswerError::AnswerNotFound(answer_id.clone()));
        };
        let question_id = &answer.question_id;

        for attempt in 0..=self.params.max_conflict_retries {
            let Some(question) = retry
                .run("find_question", move || content.find_question(question_id))
                .await?
            else {
                error!(
                    answer_id = %answer_id,
                    question_id = %question_id,
                    "Answer refers to a question that does not exist"
                );
                return Err(AcceptAnswerError::AnswerNotFound(answer_id.clone()));
            };

            if !question.is_authored_by(user) {
                debug!(user_id = %user, question_id = %question.id, "Rejected accept from non-author");
                return Err(AcceptAnswerError::NotAuthorized);
            }

            let plan = match AcceptancePlan::for_answer(&question, &answer) {
                Ok(plan) => plan,
                Err(DomainError::ForeignAnswer { answer }) => {
                    return Err(AcceptAnswerError::AnswerNotFound(answer));
                }
                Err(other) => {
                    return Err(AcceptAnswerError::Store(StoreError::Corrupt(other.to_string())));
                }
            };

            let replacing = match plan {
                AcceptancePlan::AlreadyAccepted => {
                    debug!(answer_id = %answer_id, "Answer already accepted");
                    return Ok(accepted(answer_id));
                }
                AcceptancePlan::Accept { replacing } => replacing,
            };
            let expected = replacing.as_ref();

            let commit = retry
                .run("commit_acceptance", move || {
                    content.commit_acceptance(question_id, expected, answer_id)
                })
                .await?;

            match commit {
                AcceptanceCommit::Committed => {
                    info!(
                        question_id = %question_id,
                        answer_id = %answer_id,
                        replaced = ?replacing.as_ref().map(AnswerId::as_str),
                        "Answer accepted"
                    );
                    return Ok(accepted(answer_id));
                }
                AcceptanceCommit::Conflict => {
                    debug!(
                        question_id = %question_id,
                        attempt = attempt + 1,
                        "Acceptance changed concurrently, re-reading"
                    );
                }
                AcceptanceCommit::Missing => {
                    return Err(AcceptAnswerError::AnswerNotFound(answer_id.clone()));
                }
            }
        }

        warn!(question_id = %question_id, "Giving up on contended acceptance");
        Err(AcceptAnswerError::ServiceUnavailable(format!(
            "too much contention on question {}",
            question_id
        )))
    }
}

fn accepted(answer_id: &AnswerId) -> AcceptOutcome {
    AcceptOutcome {
        answer_id: answer_id.clone(),
        is_accepted: true,
    }
}
