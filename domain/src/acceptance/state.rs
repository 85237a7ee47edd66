//! Acceptance state of a question.
//!
//! # State machine
//!
//! ```text
//!  Unanswered ──(answer posted)──► Answered ──accept(a)──► Accepted(a)
//!                                                            │    ▲
//!                                                            └────┘
//!                                                          accept(b)
//! ```
//!
//! There is no transition back to `Answered`: an accepted answer can only be
//! replaced, never withdrawn.

use crate::content::{Answer, Question};
use crate::core::error::DomainError;
use crate::core::ids::AnswerId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Acceptance pointer stored on a question.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcceptanceState {
    pub has_accepted_answer: bool,
    pub accepted_answer_id: Option<AnswerId>,
}

impl AcceptanceState {
    pub fn accepted(answer_id: AnswerId) -> Self {
        Self {
            has_accepted_answer: true,
            accepted_answer_id: Some(answer_id),
        }
    }

    /// The accepted answer, if the pointer is set.
    pub fn current(&self) -> Option<&AnswerId> {
        if self.has_accepted_answer {
            self.accepted_answer_id.as_ref()
        } else {
            None
        }
    }
}

/// Lifecycle phase of a question with respect to acceptance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionPhase {
    Unanswered,
    Answered,
    Accepted(AnswerId),
}

impl QuestionPhase {
    pub fn of(state: &AcceptanceState, answer_count: usize) -> Self {
        match state.current() {
            Some(id) => QuestionPhase::Accepted(id.clone()),
            None if answer_count == 0 => QuestionPhase::Unanswered,
            None => QuestionPhase::Answered,
        }
    }
}

/// What accepting a given answer requires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcceptancePlan {
    /// The answer is already the accepted one; nothing to write.
    AlreadyAccepted,
    /// Move the pointer to the answer, clearing `replacing` if set.
    Accept { replacing: Option<AnswerId> },
}

impl AcceptancePlan {
    /// Plan the transition to `Accepted(answer)`.
    ///
    /// Fails if the answer belongs to a different question.
    pub fn for_answer(question: &Question, answer: &Answer) -> Result<Self, DomainError> {
        if answer.question_id != question.id {
            return Err(DomainError::ForeignAnswer {
                answer: answer.id.clone(),
            });
        }

        match question.acceptance.current() {
            Some(current) if current == &answer.id => Ok(AcceptancePlan::AlreadyAccepted),
            current => Ok(AcceptancePlan::Accept {
                replacing: current.cloned(),
            }),
        }
    }
}

/// A broken single-acceptance invariant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AcceptanceViolation {
    #[error("{count} answers are marked accepted")]
    MultipleAccepted { count: usize },

    #[error("pointer names {pointer:?} but accepted answer is {flagged:?}")]
    PointerMismatch {
        pointer: Option<AnswerId>,
        flagged: Option<AnswerId>,
    },
}

/// Check that `answers` (all answers of `question`) agree with the
/// question's acceptance pointer.
pub fn verify_acceptance(question: &Question, answers: &[Answer]) -> Result<(), AcceptanceViolation> {
    let flagged: Vec<&AnswerId> = answers
        .iter()
        .filter(|a| a.question_id == question.id && a.is_accepted)
        .map(|a| &a.id)
        .collect();

    if flagged.len() > 1 {
        return Err(AcceptanceViolation::MultipleAccepted {
            count: flagged.len(),
        });
    }

    let flagged = flagged.first().map(|id| (*id).clone());
    let pointer = question.acceptance.current().cloned();
    if flagged != pointer {
        return Err(AcceptanceViolation::PointerMismatch { pointer, flagged });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question() -> Question {
        Question::new("q", "author")
    }

    #[test]
    fn test_phase_progression() {
        let mut q = question();
        assert_eq!(QuestionPhase::of(&q.acceptance, 0), QuestionPhase::Unanswered);
        assert_eq!(QuestionPhase::of(&q.acceptance, 2), QuestionPhase::Answered);

        q.acceptance = AcceptanceState::accepted(AnswerId::new("x"));
        assert_eq!(
            QuestionPhase::of(&q.acceptance, 2),
            QuestionPhase::Accepted(AnswerId::new("x"))
        );
    }

    #[test]
    fn test_pointer_without_flag_is_not_current() {
        let state = AcceptanceState {
            has_accepted_answer: false,
            accepted_answer_id: Some(AnswerId::new("x")),
        };
        assert_eq!(state.current(), None);
    }

    #[test]
    fn test_plan_first_acceptance() {
        let q = question();
        let x = Answer::new("x", "q", "bob");
        assert_eq!(
            AcceptancePlan::for_answer(&q, &x),
            Ok(AcceptancePlan::Accept { replacing: None })
        );
    }

    #[test]
    fn test_plan_replaces_previous() {
        let mut q = question();
        q.acceptance = AcceptanceState::accepted(AnswerId::new("x"));
        let y = Answer::new("y", "q", "carol");
        assert_eq!(
            AcceptancePlan::for_answer(&q, &y),
            Ok(AcceptancePlan::Accept {
                replacing: Some(AnswerId::new("x"))
            })
        );
    }

    #[test]
    fn test_plan_reaccept_is_noop() {
        let mut q = question();
        q.acceptance = AcceptanceState::accepted(AnswerId::new("x"));
        let x = Answer::new("x", "q", "bob");
        assert_eq!(
            AcceptancePlan::for_answer(&q, &x),
            Ok(AcceptancePlan::AlreadyAccepted)
        );
    }

    #[test]
    fn test_plan_rejects_foreign_answer() {
        let q = question();
        let other = Answer::new("z", "other-q", "bob");
        assert!(matches!(
            AcceptancePlan::for_answer(&q, &other),
            Err(DomainError::ForeignAnswer { .. })
        ));
    }

    #[test]
    fn test_verify_acceptance() {
        let mut q = question();
        let mut x = Answer::new("x", "q", "bob");
        let mut y = Answer::new("y", "q", "carol");
        assert!(verify_acceptance(&q, &[x.clone(), y.clone()]).is_ok());

        x.is_accepted = true;
        assert!(matches!(
            verify_acceptance(&q, &[x.clone(), y.clone()]),
            Err(AcceptanceViolation::PointerMismatch { .. })
        ));

        q.acceptance = AcceptanceState::accepted(AnswerId::new("x"));
        assert!(verify_acceptance(&q, &[x.clone(), y.clone()]).is_ok());

        y.is_accepted = true;
        assert_eq!(
            verify_acceptance(&q, &[x, y]),
            Err(AcceptanceViolation::MultipleAccepted { count: 2 })
        );
    }
}
