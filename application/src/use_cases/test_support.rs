//! In-memory port implementations with fault injection, for use case tests.

use crate::ports::content_store::{AcceptanceCommit, ContentStore, ProjectionWrite};
use crate::ports::store_error::StoreError;
use crate::ports::vote_ledger::{CommitOutcome, VoteLedger};
use async_trait::async_trait;
use ledger_domain::{
    AcceptanceState, Answer, AnswerId, ItemKind, ItemRef, Question, QuestionId, RecordVersion,
    Tally, UserId, VoteRecord,
};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A scripted misbehaviour for the next call of one operation.
pub(crate) enum Fault {
    /// Fail without touching state.
    Fail(StoreError),
    /// Report a lost compare-and-swap without touching state.
    Conflict,
    /// Apply the write, then report the error (a timeout after commit).
    ApplyThenFail(StoreError),
    /// Another request accepts this answer just before the commit lands.
    MoveAcceptance(AnswerId),
}

#[derive(Default)]
struct State {
    questions: BTreeMap<QuestionId, Question>,
    answers: BTreeMap<AnswerId, Answer>,
    votes: Vec<VoteRecord>,
    sequences: HashMap<ItemRef, u64>,
}

impl State {
    fn bump(&mut self, item: &ItemRef) {
        *self.sequences.entry(item.clone()).or_default() += 1;
    }

    fn accept(&mut self, question: &QuestionId, target: &AnswerId) {
        for answer in self.answers.values_mut() {
            if &answer.question_id == question {
                answer.is_accepted = &answer.id == target;
            }
        }
        if let Some(q) = self.questions.get_mut(question) {
            q.acceptance = AcceptanceState::accepted(target.clone());
        }
    }
}

#[derive(Default)]
pub(crate) struct MemoryStore {
    state: Mutex<State>,
    faults: Mutex<HashMap<&'static str, VecDeque<Fault>>>,
    calls: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_question(&self, question: Question) {
        let mut state = self.state.lock().unwrap();
        state.questions.insert(question.id.clone(), question);
    }

    pub fn add_answer(&self, answer: Answer) {
        let mut state = self.state.lock().unwrap();
        state.answers.insert(answer.id.clone(), answer);
    }

    /// Insert a record without the uniqueness check.
    pub fn push_raw(&self, record: VoteRecord) {
        let mut state = self.state.lock().unwrap();
        let item = record.item.clone();
        state.votes.push(record);
        state.bump(&item);
    }

    pub fn inject(&self, operation: &'static str, fault: Fault) {
        self.faults
            .lock()
            .unwrap()
            .entry(operation)
            .or_default()
            .push_back(fault);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn records_for(&self, item: &ItemRef) -> Vec<VoteRecord> {
        let state = self.state.lock().unwrap();
        state.votes.iter().filter(|r| &r.item == item).cloned().collect()
    }

    pub fn total_of(&self, item: &ItemRef) -> Option<i64> {
        let state = self.state.lock().unwrap();
        match item.kind {
            ItemKind::Question => state
                .questions
                .get(&QuestionId::new(item.id.as_str()))
                .map(|q| q.projection.votes),
            ItemKind::Answer => state
                .answers
                .get(&AnswerId::new(item.id.as_str()))
                .map(|a| a.projection.votes),
        }
    }

    pub fn question(&self, id: &str) -> Question {
        self.state.lock().unwrap().questions[&QuestionId::new(id)].clone()
    }

    pub fn answer(&self, id: &str) -> Answer {
        self.state.lock().unwrap().answers[&AnswerId::new(id)].clone()
    }

    fn enter(&self, operation: &'static str) -> Option<Fault> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.faults
            .lock()
            .unwrap()
            .get_mut(operation)
            .and_then(VecDeque::pop_front)
    }
}

fn fail_fast(fault: &Option<Fault>) -> Result<(), StoreError> {
    match fault {
        Some(Fault::Fail(e)) => Err(e.clone()),
        _ => Ok(()),
    }
}

fn fail_late(fault: Option<Fault>) -> Result<(), StoreError> {
    match fault {
        Some(Fault::ApplyThenFail(e)) => Err(e),
        _ => Ok(()),
    }
}

#[async_trait]
impl VoteLedger for MemoryStore {
    async fn find_votes(
        &self,
        user: &UserId,
        item: &ItemRef,
    ) -> Result<Vec<VoteRecord>, StoreError> {
        fail_fast(&self.enter("find_votes"))?;
        let state = self.state.lock().unwrap();
        Ok(state
            .votes
            .iter()
            .filter(|r| &r.user_id == user && &r.item == item)
            .cloned()
            .collect())
    }

    async fn commit_vote(
        &self,
        user: &UserId,
        item: &ItemRef,
        expected: Option<&RecordVersion>,
        next: Option<VoteRecord>,
    ) -> Result<CommitOutcome, StoreError> {
        let fault = self.enter("commit_vote");
        fail_fast(&fault)?;
        if matches!(fault, Some(Fault::Conflict)) {
            return Ok(CommitOutcome::Conflict);
        }

        let outcome = {
            let mut state = self.state.lock().unwrap();
            let slot: Vec<usize> = state
                .votes
                .iter()
                .enumerate()
                .filter(|(_, r)| &r.user_id == user && &r.item == item)
                .map(|(i, _)| i)
                .collect();

            let matches = match (expected, slot.as_slice()) {
                (None, []) => true,
                (Some(version), [i]) => version.matches(&state.votes[*i]),
                _ => false,
            };

            if matches {
                if let Some(&i) = slot.first() {
                    state.votes.remove(i);
                }
                if let Some(record) = next {
                    state.votes.push(record);
                }
                state.bump(item);
                CommitOutcome::Committed
            } else {
                CommitOutcome::Conflict
            }
        };

        fail_late(fault)?;
        Ok(outcome)
    }

    async fn discard_duplicates(
        &self,
        user: &UserId,
        item: &ItemRef,
        keep: &RecordVersion,
    ) -> Result<usize, StoreError> {
        fail_fast(&self.enter("discard_duplicates"))?;
        let mut state = self.state.lock().unwrap();
        let before = state.votes.len();
        state
            .votes
            .retain(|r| !(&r.user_id == user && &r.item == item) || keep.matches(r));
        let removed = before - state.votes.len();
        if removed > 0 {
            state.bump(item);
        }
        Ok(removed)
    }

    async fn tally(&self, item: &ItemRef) -> Result<Tally, StoreError> {
        fail_fast(&self.enter("tally"))?;
        let state = self.state.lock().unwrap();
        let watermark = state.sequences.get(item).copied().unwrap_or(0);
        Ok(Tally::from_values(
            state.votes.iter().filter(|r| &r.item == item).map(|r| r.value),
            watermark,
        ))
    }

    async fn duplicate_voters(&self, item: &ItemRef) -> Result<Vec<UserId>, StoreError> {
        fail_fast(&self.enter("duplicate_voters"))?;
        let state = self.state.lock().unwrap();
        let mut counts: BTreeMap<&UserId, usize> = BTreeMap::new();
        for record in state.votes.iter().filter(|r| &r.item == item) {
            *counts.entry(&record.user_id).or_default() += 1;
        }
        Ok(counts
            .into_iter()
            .filter(|(_, n)| *n > 1)
            .map(|(user, _)| user.clone())
            .collect())
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn item_exists(&self, item: &ItemRef) -> Result<bool, StoreError> {
        fail_fast(&self.enter("item_exists"))?;
        Ok(self.total_of(item).is_some())
    }

    async fn projected_total(&self, item: &ItemRef) -> Result<Option<i64>, StoreError> {
        fail_fast(&self.enter("projected_total"))?;
        Ok(self.total_of(item))
    }

    async fn write_projection(
        &self,
        item: &ItemRef,
        tally: &Tally,
    ) -> Result<ProjectionWrite, StoreError> {
        fail_fast(&self.enter("write_projection"))?;
        let mut state = self.state.lock().unwrap();
        let projection = match item.kind {
            ItemKind::Question => state
                .questions
                .get_mut(&QuestionId::new(item.id.as_str()))
                .map(|q| &mut q.projection),
            ItemKind::Answer => state
                .answers
                .get_mut(&AnswerId::new(item.id.as_str()))
                .map(|a| &mut a.projection),
        };
        let Some(projection) = projection else {
            return Ok(ProjectionWrite::Missing);
        };
        if !projection.accepts(tally.watermark) {
            return Ok(ProjectionWrite::Stale {
                current: projection.votes,
            });
        }
        projection.votes = tally.total;
        projection.watermark = tally.watermark;
        Ok(ProjectionWrite::Applied)
    }

    async fn votable_items(&self) -> Result<Vec<ItemRef>, StoreError> {
        fail_fast(&self.enter("votable_items"))?;
        let state = self.state.lock().unwrap();
        Ok(state
            .questions
            .values()
            .map(Question::item_ref)
            .chain(state.answers.values().map(Answer::item_ref))
            .collect())
    }

    async fn find_question(&self, id: &QuestionId) -> Result<Option<Question>, StoreError> {
        fail_fast(&self.enter("find_question"))?;
        Ok(self.state.lock().unwrap().questions.get(id).cloned())
    }

    async fn find_answer(&self, id: &AnswerId) -> Result<Option<Answer>, StoreError> {
        fail_fast(&self.enter("find_answer"))?;
        Ok(self.state.lock().unwrap().answers.get(id).cloned())
    }

    async fn answers_for(&self, question: &QuestionId) -> Result<Vec<Answer>, StoreError> {
        fail_fast(&self.enter("answers_for"))?;
        let state = self.state.lock().unwrap();
        Ok(state
            .answers
            .values()
            .filter(|a| &a.question_id == question)
            .cloned()
            .collect())
    }

    async fn commit_acceptance(
        &self,
        question: &QuestionId,
        expected: Option<&AnswerId>,
        target: &AnswerId,
    ) -> Result<AcceptanceCommit, StoreError> {
        let fault = self.enter("commit_acceptance");
        fail_fast(&fault)?;

        let outcome = {
            let mut state = self.state.lock().unwrap();
            if let Some(Fault::MoveAcceptance(other)) = &fault {
                state.accept(question, other);
            }

            let Some(q) = state.questions.get(question) else {
                return Ok(AcceptanceCommit::Missing);
            };
            if !state.answers.contains_key(target) {
                return Ok(AcceptanceCommit::Missing);
            }
            if q.acceptance.current() != expected {
                AcceptanceCommit::Conflict
            } else {
                state.accept(question, target);
                AcceptanceCommit::Committed
            }
        };

        fail_late(fault)?;
        Ok(outcome)
    }
}
