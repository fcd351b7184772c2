//! SQLite-backed reminder store.
//!
//! # Invariants
//! - All statements run on one connection guarded by a mutex.
//! - Read paths reject rows that violate table invariants instead of masking
//!   them.

use super::{ensure_storable, ReminderStore, StoreError, StoreResult};
use crate::db::{open_db, open_db_in_memory};
use crate::model::reminder::ReminderRecord;
use rusqlite::{params, Connection, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

const REMINDER_SELECT_SQL: &str = "SELECT
    id,
    title,
    description,
    location,
    latitude,
    longitude
FROM reminders";

/// Reminder table stored in one SQLite database.
pub struct SqliteReminderStore {
    conn: Mutex<Connection>,
}

impl SqliteReminderStore {
    /// Wraps an already migrated connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Opens (and migrates) a database file.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Ok(Self::new(open_db(path)?))
    }

    /// Opens a migrated in-memory database.
    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(Self::new(open_db_in_memory()?))
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Unavailable("reminder database lock poisoned".to_string()))
    }
}

impl ReminderStore for SqliteReminderStore {
    fn get_all(&self) -> StoreResult<Vec<ReminderRecord>> {
        let conn = self.lock()?;
        // `created_at` has second granularity; rowid keeps insertion order
        // within the same second and survives upserts.
        let mut stmt =
            conn.prepare(&format!("{REMINDER_SELECT_SQL} ORDER BY created_at ASC, rowid ASC"))?;
        let mut rows = stmt.query([])?;
        let mut reminders = Vec::new();

        while let Some(row) = rows.next()? {
            reminders.push(parse_reminder_row(row)?);
        }

        Ok(reminders)
    }

    fn get_by_id(&self, id: &str) -> StoreResult<Option<ReminderRecord>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!("{REMINDER_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_reminder_row(row)?));
        }

        Ok(None)
    }

    fn upsert(&self, record: &ReminderRecord) -> StoreResult<()> {
        ensure_storable(record)?;

        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO reminders (
                id,
                title,
                description,
                location,
                latitude,
                longitude
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                description = excluded.description,
                location = excluded.location,
                latitude = excluded.latitude,
                longitude = excluded.longitude,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![
                record.id.as_str(),
                record.title.as_str(),
                record.description.as_deref(),
                record.location.as_str(),
                record.latitude,
                record.longitude,
            ],
        )?;

        Ok(())
    }

    fn delete_all(&self) -> StoreResult<()> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM reminders;", [])?;
        Ok(())
    }
}

fn parse_reminder_row(row: &Row<'_>) -> StoreResult<ReminderRecord> {
    let record = ReminderRecord {
        id: row.get("id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        location: row.get("location")?,
        latitude: row.get("latitude")?,
        longitude: row.get("longitude")?,
    };
    ensure_storable(&record)?;
    Ok(record)
}
