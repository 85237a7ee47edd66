//! Document store adapter
//!
//! Implements both store ports over one [`Documents`] value guarded by a
//! `tokio::sync::RwLock`. Each port call runs as a single critical section,
//! which is what makes `commit_vote` and `commit_acceptance` atomic
//! compare-and-swap operations.
//!
//! With the file backend every mutation is persisted before the call
//! returns: the snapshot is written to `<path>.tmp`, synced to disk, and
//! renamed over `<path>`, after which the directory entry is synced too.
//! If any step fails the in-memory change is rolled back and the caller
//! sees a transient [`StoreError::Io`].

use super::documents::{Documents, ImportSummary, SeedData, Snapshot};
use crate::config::{FileStoreConfig, StoreBackend};
use async_trait::async_trait;
use ledger_application::{
    AcceptanceCommit, CommitOutcome, ContentStore, ProjectionWrite, StoreError, VoteLedger,
};
use ledger_domain::{
    Answer, AnswerId, ItemRef, Question, QuestionId, RecordVersion, Tally, UserId, VoteRecord,
};
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
enum Persistence {
    Memory,
    File(PathBuf),
}

struct Inner {
    open: bool,
    docs: Documents,
}

pub struct DocumentStore {
    inner: RwLock<Inner>,
    persistence: Persistence,
}

impl DocumentStore {
    /// A store whose contents live only as long as the process.
    pub fn in_memory() -> Self {
        Self::with_documents(Documents::default(), Persistence::Memory)
    }

    /// Open (or create) a JSON snapshot store at `path`.
    pub async fn open_file(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await.map_err(io_error)?;
        }

        let docs = match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let snapshot: Snapshot = serde_json::from_slice(&bytes)
                    .map_err(|e| StoreError::Corrupt(format!("{}: {}", path.display(), e)))?;
                Documents::from_snapshot(snapshot)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "No snapshot yet, starting empty");
                Documents::default()
            }
            Err(e) => return Err(io_error(e)),
        };

        info!(
            path = %path.display(),
            questions = docs.questions.len(),
            answers = docs.answers.len(),
            "Opened document store"
        );
        Ok(Self::with_documents(docs, Persistence::File(path)))
    }

    /// Open the backend selected by the `[store]` section.
    pub async fn open(config: &FileStoreConfig) -> Result<Self, StoreError> {
        match config.backend {
            StoreBackend::Memory => {
                info!("Opened in-memory document store");
                Ok(Self::in_memory())
            }
            StoreBackend::File => Self::open_file(config.resolved_path()).await,
        }
    }

    fn with_documents(docs: Documents, persistence: Persistence) -> Self {
        Self {
            inner: RwLock::new(Inner { open: true, docs }),
            persistence,
        }
    }

    /// Snapshot path, if file-backed.
    pub fn path(&self) -> Option<&Path> {
        match &self.persistence {
            Persistence::Memory => None,
            Persistence::File(path) => Some(path),
        }
    }

    /// Flush and refuse all further calls with [`StoreError::Closed`].
    pub async fn close(&self) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        if !inner.open {
            return Ok(());
        }
        self.persist(&inner.docs).await?;
        inner.open = false;
        info!("Closed document store");
        Ok(())
    }

    /// Load seed data, replacing questions and answers with matching ids.
    pub async fn import(&self, seed: SeedData) -> Result<ImportSummary, StoreError> {
        let summary = self.write(|docs| (docs.absorb(seed), true)).await?;
        info!(
            questions = summary.questions,
            answers = summary.answers,
            votes = summary.votes,
            "Imported seed data"
        );
        Ok(summary)
    }

    /// Current contents in seed form.
    pub async fn export(&self) -> Result<SeedData, StoreError> {
        self.read(|docs| docs.to_snapshot().into_seed()).await
    }

    async fn read<T>(&self, f: impl FnOnce(&Documents) -> T) -> Result<T, StoreError> {
        let inner = self.inner.read().await;
        if !inner.open {
            return Err(StoreError::Closed);
        }
        Ok(f(&inner.docs))
    }

    /// Run one mutating transaction. `f` reports whether it changed anything.
    async fn write<T>(&self, f: impl FnOnce(&mut Documents) -> (T, bool)) -> Result<T, StoreError> {
        let mut inner = self.inner.write().await;
        if !inner.open {
            return Err(StoreError::Closed);
        }

        let backup = match self.persistence {
            Persistence::Memory => None,
            Persistence::File(_) => Some(inner.docs.clone()),
        };

        let (out, changed) = f(&mut inner.docs);
        if changed && let Err(e) = self.persist(&inner.docs).await {
            if let Some(backup) = backup {
                inner.docs = backup;
            }
            warn!("Rolled back transaction after failed snapshot write: {}", e);
            return Err(e);
        }
        Ok(out)
    }

    async fn persist(&self, docs: &Documents) -> Result<(), StoreError> {
        let Persistence::File(path) = &self.persistence else {
            return Ok(());
        };
        let bytes = serde_json::to_vec_pretty(&docs.to_snapshot())
            .map_err(|e| StoreError::Corrupt(e.to_string()))?;

        write_durably(path, &bytes).await.map_err(io_error)?;
        debug!(path = %path.display(), bytes = bytes.len(), "Snapshot written");
        Ok(())
    }
}

/// Replace `path` with `bytes` so that, once this returns, a crash leaves
/// either the old or the new contents on disk.
async fn write_durably(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut tmp = OsString::from(path.as_os_str());
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    let mut file = tokio::fs::File::create(&tmp).await?;
    file.write_all(bytes).await?;
    file.sync_all().await?;
    drop(file);

    tokio::fs::rename(&tmp, path).await?;
    sync_parent(path).await
}

#[cfg(unix)]
async fn sync_parent(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            tokio::fs::File::open(parent).await?.sync_all().await
        }
        _ => Ok(()),
    }
}

// Directories cannot be opened for syncing here; the rename is as durable
// as the platform makes it.
#[cfg(not(unix))]
async fn sync_parent(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

fn io_error(error: std::io::Error) -> StoreError {
    StoreError::Io(error.to_string())
}

#[async_trait]
impl VoteLedger for DocumentStore {
    async fn find_votes(
        &self,
        user: &UserId,
        item: &ItemRef,
    ) -> Result<Vec<VoteRecord>, StoreError> {
        self.read(|docs| docs.slot(user, item).to_vec()).await
    }

    async fn commit_vote(
        &self,
        user: &UserId,
        item: &ItemRef,
        expected: Option<&RecordVersion>,
        next: Option<VoteRecord>,
    ) -> Result<CommitOutcome, StoreError> {
        self.write(|docs| {
            let matches = match (expected, docs.slot(user, item)) {
                (None, []) => true,
                (Some(version), [current]) => version.matches(current),
                _ => false,
            };
            if !matches {
                return (CommitOutcome::Conflict, false);
            }
            docs.replace_slot(user, item, next.into_iter().collect());
            (CommitOutcome::Committed, true)
        })
        .await
    }

    async fn discard_duplicates(
        &self,
        user: &UserId,
        item: &ItemRef,
        keep: &RecordVersion,
    ) -> Result<usize, StoreError> {
        self.write(|docs| {
            let slot = docs.slot(user, item);
            let kept: Vec<VoteRecord> = slot.iter().filter(|r| keep.matches(r)).cloned().collect();
            let removed = slot.len() - kept.len();
            if removed == 0 {
                return (0, false);
            }
            docs.replace_slot(user, item, kept);
            (removed, true)
        })
        .await
    }

    async fn tally(&self, item: &ItemRef) -> Result<Tally, StoreError> {
        self.read(|docs| {
            Tally::from_values(
                docs.item_records(item).map(|r| r.value),
                docs.sequence(item),
            )
        })
        .await
    }

    async fn duplicate_voters(&self, item: &ItemRef) -> Result<Vec<UserId>, StoreError> {
        self.read(|docs| docs.duplicate_voters(item)).await
    }
}

#[async_trait]
impl ContentStore for DocumentStore {
    async fn item_exists(&self, item: &ItemRef) -> Result<bool, StoreError> {
        self.read(|docs| docs.projection(item).is_some()).await
    }

    async fn projected_total(&self, item: &ItemRef) -> Result<Option<i64>, StoreError> {
        self.read(|docs| docs.projection(item).map(|p| p.votes)).await
    }

    async fn write_projection(
        &self,
        item: &ItemRef,
        tally: &Tally,
    ) -> Result<ProjectionWrite, StoreError> {
        self.write(|docs| {
            let Some(projection) = docs.projection_mut(item) else {
                return (ProjectionWrite::Missing, false);
            };
            if !projection.accepts(tally.watermark) {
                return (
                    ProjectionWrite::Stale {
                        current: projection.votes,
                    },
                    false,
                );
            }
            let changed = projection.votes != tally.total || projection.watermark != tally.watermark;
            projection.votes = tally.total;
            projection.watermark = tally.watermark;
            (ProjectionWrite::Applied, changed)
        })
        .await
    }

    async fn votable_items(&self) -> Result<Vec<ItemRef>, StoreError> {
        self.read(|docs| {
            docs.questions
                .values()
                .map(Question::item_ref)
                .chain(docs.answers.values().map(Answer::item_ref))
                .collect()
        })
        .await
    }

    async fn find_question(&self, id: &QuestionId) -> Result<Option<Question>, StoreError> {
        self.read(|docs| docs.questions.get(id).cloned()).await
    }

    async fn find_answer(&self, id: &AnswerId) -> Result<Option<Answer>, StoreError> {
        self.read(|docs| docs.answers.get(id).cloned()).await
    }

    async fn answers_for(&self, question: &QuestionId) -> Result<Vec<Answer>, StoreError> {
        self.read(|docs| {
            docs.answers
                .values()
                .filter(|a| &a.question_id == question)
                .cloned()
                .collect()
        })
        .await
    }

    async fn commit_acceptance(
        &self,
        question: &QuestionId,
        expected: Option<&AnswerId>,
        target: &AnswerId,
    ) -> Result<AcceptanceCommit, StoreError> {
        self.write(|docs| {
            let Some(current) = docs.questions.get(question) else {
                return (AcceptanceCommit::Missing, false);
            };
            let belongs = docs
                .answers
                .get(target)
                .is_some_and(|a| &a.question_id == question);
            if !belongs {
                return (AcceptanceCommit::Missing, false);
            }
            if current.acceptance.current() != expected {
                return (AcceptanceCommit::Conflict, false);
            }
            docs.accept(question, target);
            (AcceptanceCommit::Committed, true)
        })
        .await
    }
}
