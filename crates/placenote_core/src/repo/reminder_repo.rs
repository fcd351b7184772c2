//! Reminder repository contract and store-backed implementation.
//!
//! # Responsibility
//! - Be the only path from controllers and trigger handling to the store.
//! - Run blocking store calls off the caller's task.
//! - Translate store failures into `RepoError` without retrying or hiding them.
//!
//! # Invariants
//! - An empty table is `Ok(vec![])`, never an error.
//! - A missing id is `Err(RepoError::NotFound)`, never `Ok` of nothing.
//! - No caching: every call is a live read/write.

use crate::model::reminder::{new_reminder_id, ReminderId, ReminderRecord};
use crate::store::{ReminderStore, StoreError};
use async_trait::async_trait;
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::time::Instant;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository-level failure surfaced to controllers.
///
/// `Display` is the short user-visible message, passed through verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoError {
    /// The store failed; carries its message unchanged.
    Storage(String),
    NotFound(ReminderId),
}

impl RepoError {
    /// Short message for notification surfaces.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(message) => f.write_str(message),
            Self::NotFound(id) => write!(f, "Reminder not found: {id}"),
        }
    }
}

impl Error for RepoError {}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        Self::Storage(value.to_string())
    }
}

/// Asynchronous reminder data source used by controllers.
#[async_trait]
pub trait ReminderRepository: Send + Sync {
    async fn get_all(&self) -> RepoResult<Vec<ReminderRecord>>;
    async fn get_by_id(&self, id: &str) -> RepoResult<ReminderRecord>;
    /// Upserts by id, assigning a fresh id when the record carries none.
    ///
    /// Returns the id actually stored.
    async fn save(&self, record: ReminderRecord) -> RepoResult<ReminderId>;
    /// Clears every reminder; reset/test flows only.
    async fn delete_all(&self) -> RepoResult<()>;
}

/// Repository over any `ReminderStore`, running store calls on tokio's
/// blocking pool.
pub struct LocalReminderRepository<S: ReminderStore + 'static> {
    store: Arc<S>,
}

impl<S: ReminderStore + 'static> LocalReminderRepository<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    async fn run<T, F>(&self, op: &'static str, job: F) -> RepoResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&S) -> Result<T, RepoError> + Send + 'static,
    {
        let started_at = Instant::now();
        let store = Arc::clone(&self.store);
        let outcome = tokio::task::spawn_blocking(move || job(store.as_ref()))
            .await
            .unwrap_or_else(|err| Err(RepoError::Storage(format!("storage task failed: {err}"))));

        match &outcome {
            Ok(_) => info!(
                "event=repo_call module=repo status=ok op={op} duration_ms={}",
                started_at.elapsed().as_millis()
            ),
            Err(RepoError::NotFound(id)) => info!(
                "event=repo_call module=repo status=not_found op={op} reminder_id={id} duration_ms={}",
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=repo_call module=repo status=error op={op} duration_ms={} error={err}",
                started_at.elapsed().as_millis()
            ),
        }
        outcome
    }
}

#[async_trait]
impl<S: ReminderStore + 'static> ReminderRepository for LocalReminderRepository<S> {
    async fn get_all(&self) -> RepoResult<Vec<ReminderRecord>> {
        self.run("get_all", |store| Ok(store.get_all()?)).await
    }

    async fn get_by_id(&self, id: &str) -> RepoResult<ReminderRecord> {
        let id = id.to_string();
        self.run("get_by_id", move |store| {
            store.get_by_id(&id)?.ok_or(RepoError::NotFound(id))
        })
        .await
    }

    async fn save(&self, mut record: ReminderRecord) -> RepoResult<ReminderId> {
        if !record.has_id() {
            record.id = new_reminder_id();
        }
        self.run("save", move |store| {
            store.upsert(&record)?;
            Ok(record.id)
        })
        .await
    }

    async fn delete_all(&self) -> RepoResult<()> {
        self.run("delete_all", |store| Ok(store.delete_all()?)).await
    }
}
