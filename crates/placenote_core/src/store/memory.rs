//! In-process reminder store.
//!
//! Keeps insertion order and can be switched into a failing mode, which makes
//! it the stand-in for the database in controller tests.

use super::{ensure_storable, ReminderStore, StoreError, StoreResult};
use crate::model::reminder::ReminderRecord;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Default)]
struct MemoryState {
    reminders: Vec<ReminderRecord>,
    failure: Option<String>,
}

/// Volatile reminder table.
#[derive(Default)]
pub struct MemoryReminderStore {
    state: Mutex<MemoryState>,
}

impl MemoryReminderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with existing rows.
    pub fn with_reminders(reminders: Vec<ReminderRecord>) -> Self {
        Self {
            state: Mutex::new(MemoryState {
                reminders,
                failure: None,
            }),
        }
    }

    /// Makes every following call fail with `message`; `None` heals the store.
    pub fn set_failure(&self, message: Option<&str>) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .failure = message.map(str::to_string);
    }

    fn checked(&self) -> StoreResult<MutexGuard<'_, MemoryState>> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(message) = &state.failure {
            return Err(StoreError::Unavailable(message.clone()));
        }
        Ok(state)
    }
}

impl ReminderStore for MemoryReminderStore {
    fn get_all(&self) -> StoreResult<Vec<ReminderRecord>> {
        Ok(self.checked()?.reminders.clone())
    }

    fn get_by_id(&self, id: &str) -> StoreResult<Option<ReminderRecord>> {
        Ok(self
            .checked()?
            .reminders
            .iter()
            .find(|reminder| reminder.id == id)
            .cloned())
    }

    fn upsert(&self, record: &ReminderRecord) -> StoreResult<()> {
        ensure_storable(record)?;
        let mut state = self.checked()?;
        match state
            .reminders
            .iter_mut()
            .find(|existing| existing.id == record.id)
        {
            Some(existing) => *existing = record.clone(),
            None => state.reminders.push(record.clone()),
        }
        Ok(())
    }

    fn delete_all(&self) -> StoreResult<()> {
        self.checked()?.reminders.clear();
        Ok(())
    }
}
