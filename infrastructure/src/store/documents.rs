//! In-memory document model shared by both store backends, and its
//! on-disk snapshot form.

use ledger_domain::{
    AcceptanceState, Answer, AnswerId, ItemKind, ItemRef, Question, QuestionId, UserId,
    VoteProjection, VoteRecord,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Questions, answers and vote records to load into a store.
///
/// This is also the body of the on-disk snapshot, so a snapshot file is a
/// valid seed file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedData {
    pub questions: Vec<Question>,
    pub answers: Vec<Answer>,
    pub votes: Vec<VoteRecord>,
}

/// Counts of what an import loaded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub questions: usize,
    pub answers: usize,
    pub votes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LedgerSequence {
    #[serde(flatten)]
    item: ItemRef,
    sequence: u64,
}

/// Persisted form of [`Documents`].
#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct Snapshot {
    #[serde(flatten)]
    data: SeedData,
    #[serde(default)]
    ledger_sequences: Vec<LedgerSequence>,
}

impl Snapshot {
    pub fn into_seed(self) -> SeedData {
        self.data
    }
}

type Slot = Vec<VoteRecord>;

#[derive(Debug, Clone, Default)]
pub(crate) struct Documents {
    pub questions: BTreeMap<QuestionId, Question>,
    pub answers: BTreeMap<AnswerId, Answer>,
    /// item → user → records. A healthy slot holds at most one record.
    ledger: HashMap<ItemRef, HashMap<UserId, Slot>>,
    sequences: HashMap<ItemRef, u64>,
}

impl Documents {
    pub fn slot(&self, user: &UserId, item: &ItemRef) -> &[VoteRecord] {
        self.ledger
            .get(item)
            .and_then(|users| users.get(user))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Replace the slot's contents and advance the item's sequence.
    pub fn replace_slot(&mut self, user: &UserId, item: &ItemRef, records: Slot) {
        let users = self.ledger.entry(item.clone()).or_default();
        if records.is_empty() {
            users.remove(user);
            if users.is_empty() {
                self.ledger.remove(item);
            }
        } else {
            users.insert(user.clone(), records);
        }
        self.bump(item);
    }

    pub fn item_records(&self, item: &ItemRef) -> impl Iterator<Item = &VoteRecord> {
        self.ledger
            .get(item)
            .into_iter()
            .flat_map(|users| users.values().flatten())
    }

    pub fn duplicate_voters(&self, item: &ItemRef) -> Vec<UserId> {
        let mut users: Vec<UserId> = self
            .ledger
            .get(item)
            .into_iter()
            .flat_map(|users| users.iter())
            .filter(|(_, slot)| slot.len() > 1)
            .map(|(user, _)| user.clone())
            .collect();
        users.sort();
        users
    }

    pub fn sequence(&self, item: &ItemRef) -> u64 {
        self.sequences.get(item).copied().unwrap_or(0)
    }

    fn bump(&mut self, item: &ItemRef) {
        *self.sequences.entry(item.clone()).or_default() += 1;
    }

    pub fn projection(&self, item: &ItemRef) -> Option<&VoteProjection> {
        match item.kind {
            ItemKind::Question => self
                .questions
                .get(&QuestionId::new(item.id.as_str()))
                .map(|q| &q.projection),
            ItemKind::Answer => self
                .answers
                .get(&AnswerId::new(item.id.as_str()))
                .map(|a| &a.projection),
        }
    }

    pub fn projection_mut(&mut self, item: &ItemRef) -> Option<&mut VoteProjection> {
        match item.kind {
            ItemKind::Question => self
                .questions
                .get_mut(&QuestionId::new(item.id.as_str()))
                .map(|q| &mut q.projection),
            ItemKind::Answer => self
                .answers
                .get_mut(&AnswerId::new(item.id.as_str()))
                .map(|a| &mut a.projection),
        }
    }

    /// Point `question` at `target` and set every answer's flag to match.
    pub fn accept(&mut self, question: &QuestionId, target: &AnswerId) {
        for answer in self.answers.values_mut() {
            if &answer.question_id == question {
                answer.is_accepted = &answer.id == target;
            }
        }
        if let Some(q) = self.questions.get_mut(question) {
            q.acceptance = AcceptanceState::accepted(target.clone());
        }
    }

    /// Merge seed data, replacing documents with the same id.
    ///
    /// Vote records are appended without the one-per-slot check, so legacy
    /// duplicates survive the import and are healed on first access.
    pub fn absorb(&mut self, seed: SeedData) -> ImportSummary {
        let summary = ImportSummary {
            questions: seed.questions.len(),
            answers: seed.answers.len(),
            votes: seed.votes.len(),
        };

        for question in seed.questions {
            self.questions.insert(question.id.clone(), question);
        }
        for answer in seed.answers {
            self.answers.insert(answer.id.clone(), answer);
        }
        for record in seed.votes {
            let item = record.item.clone();
            self.ledger
                .entry(item.clone())
                .or_default()
                .entry(record.user_id.clone())
                .or_default()
                .push(record);
            self.bump(&item);
        }
        self.lift_sequences();
        summary
    }

    /// Keep every item's sequence at or above its projection watermark, so
    /// hand-edited data cannot freeze a total.
    fn lift_sequences(&mut self) {
        let watermarks: Vec<(ItemRef, u64)> = self
            .questions
            .values()
            .map(|q| (q.item_ref(), q.projection.watermark))
            .chain(
                self.answers
                    .values()
                    .map(|a| (a.item_ref(), a.projection.watermark)),
            )
            .collect();
        for (item, watermark) in watermarks {
            let sequence = self.sequences.entry(item).or_default();
            *sequence = (*sequence).max(watermark);
        }
    }

    pub fn to_snapshot(&self) -> Snapshot {
        let mut votes: Vec<VoteRecord> = self
            .ledger
            .values()
            .flat_map(|users| users.values().flatten().cloned())
            .collect();
        votes.sort_by(|a, b| (&a.item, &a.user_id, a.updated_at).cmp(&(&b.item, &b.user_id, b.updated_at)));

        let mut ledger_sequences: Vec<LedgerSequence> = self
            .sequences
            .iter()
            .map(|(item, sequence)| LedgerSequence {
                item: item.clone(),
                sequence: *sequence,
            })
            .collect();
        ledger_sequences.sort_by(|a, b| a.item.cmp(&b.item));

        Snapshot {
            data: SeedData {
                questions: self.questions.values().cloned().collect(),
                answers: self.answers.values().cloned().collect(),
                votes,
            },
            ledger_sequences,
        }
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let mut documents = Documents::default();
        documents.absorb(snapshot.data);
        // Restore the persisted sequences exactly rather than the counts
        // absorb() produced.
        for entry in snapshot.ledger_sequences {
            documents.sequences.insert(entry.item, entry.sequence);
        }
        documents.lift_sequences();
        documents
    }
}
