//! Reminder list controller.
//!
//! # Invariants
//! - `is_loading` goes true -> false exactly once per `load()` call.
//! - An empty repository is a `Loaded { empty: true }` state, not a failure.
//! - Repository error messages are exposed verbatim.

use crate::model::reminder::ReminderItem;
use crate::repo::reminder_repo::ReminderRepository;
use crate::state::StateCell;
use log::{info, warn};
use std::sync::Arc;

/// Lifecycle of the list screen.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ListPhase {
    #[default]
    Idle,
    Loading,
    Loaded {
        empty: bool,
    },
    Failed {
        message: String,
    },
}

/// Controller for the reminders list screen.
pub struct RemindersListController<R: ReminderRepository> {
    repo: Arc<R>,
    pub phase: StateCell<ListPhase>,
    pub reminders: StateCell<Vec<ReminderItem>>,
    pub is_loading: StateCell<bool>,
    pub show_no_data: StateCell<bool>,
    /// Last failure message for snackbar surfaces.
    pub error_message: StateCell<Option<String>>,
}

impl<R: ReminderRepository> RemindersListController<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self {
            repo,
            phase: StateCell::default(),
            reminders: StateCell::default(),
            is_loading: StateCell::new(false),
            show_no_data: StateCell::new(false),
            error_message: StateCell::new(None),
        }
    }

    /// Reloads every reminder from the repository.
    pub async fn load(&self) {
        self.phase.set(ListPhase::Loading);
        self.is_loading.set(true);

        let result = self.repo.get_all().await;
        self.is_loading.set(false);

        match result {
            Ok(records) => {
                let items: Vec<ReminderItem> = records.iter().map(ReminderItem::from).collect();
                let empty = items.is_empty();
                info!(
                    "event=reminders_load module=controller status=ok count={}",
                    items.len()
                );
                self.reminders.set(items);
                self.show_no_data.set(empty);
                self.error_message.set(None);
                self.phase.set(ListPhase::Loaded { empty });
            }
            Err(err) => {
                let message = err.message();
                warn!("event=reminders_load module=controller status=error error={message}");
                self.show_no_data.set(self.reminders.get().is_empty());
                self.error_message.set(Some(message.clone()));
                self.phase.set(ListPhase::Failed { message });
            }
        }
    }
}
