//! Durable reminder table contracts.
//!
//! # Responsibility
//! - Define the synchronous DAO-like interface over reminder rows.
//! - Keep storage engines free of business rules.
//!
//! # Invariants
//! - `upsert` replaces the row with the same id (last write wins).
//! - Rows with an empty id are rejected at insertion time.
//! - `get_by_id` reports absence as `Ok(None)`, not as an error.

use crate::model::reminder::ReminderRecord;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod memory;
pub mod sqlite;

pub use memory::MemoryReminderStore;
pub use sqlite::SqliteReminderStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage engine failure.
#[derive(Debug)]
pub enum StoreError {
    Sqlite(rusqlite::Error),
    /// The database file was migrated by a newer build.
    SchemaTooNew { found: u32, supported: u32 },
    /// Persisted or incoming row shape violates table invariants.
    InvalidData(String),
    /// Store cannot serve requests right now (I/O fault, poisoned lock, ...).
    Unavailable(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "reminder database schema version {found} is newer than supported {supported}"
            ),
            Self::InvalidData(message) => write!(f, "invalid reminder data: {message}"),
            Self::Unavailable(message) => f.write_str(message),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::SchemaTooNew { .. } | Self::InvalidData(_) | Self::Unavailable(_) => None,
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Synchronous reminder table.
///
/// Only the repository layer is expected to call this.
pub trait ReminderStore: Send + Sync {
    fn get_all(&self) -> StoreResult<Vec<ReminderRecord>>;
    fn get_by_id(&self, id: &str) -> StoreResult<Option<ReminderRecord>>;
    fn upsert(&self, record: &ReminderRecord) -> StoreResult<()>;
    fn delete_all(&self) -> StoreResult<()>;
}

pub(crate) fn ensure_storable(record: &ReminderRecord) -> StoreResult<()> {
    if !record.has_id() {
        return Err(StoreError::InvalidData(
            "reminder id must not be empty".to_string(),
        ));
    }
    if !record.latitude.is_finite() || !record.longitude.is_finite() {
        return Err(StoreError::InvalidData(format!(
            "non-finite coordinates for reminder {}",
            record.id
        )));
    }
    Ok(())
}
