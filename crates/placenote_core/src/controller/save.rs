//! Save-reminder controller.
//!
//! # Responsibility
//! - Hold the draft being edited and validate it.
//! - Persist valid drafts and hand them to geofence registration.
//! - Publish one-shot UI signals (toast, snackbar, navigation).
//!
//! # Invariants
//! - Invalid drafts never reach the repository.
//! - `is_loading` is raised and lowered on every `save_reminder` path.
//! - Only the first validation failure is signalled (title before location).

use crate::geofence::{GeofenceManager, LocationPlatform};
use crate::model::reminder::{ReminderDraft, ReminderRecord, ValidationError};
use crate::repo::reminder_repo::ReminderRepository;
use crate::state::StateCell;
use log::{info, warn};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Confirmation text shown after a successful save.
pub const SAVED_MESSAGE: &str = "Reminder Saved !";

/// One-shot UI event emitted by the save flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveSignal {
    Toast(String),
    Snackbar(ValidationError),
    /// Storage or geofence failure message, verbatim.
    Error(String),
    NavigateBack,
}

/// Controller for the save-reminder screen.
pub struct SaveReminderController<R: ReminderRepository, P: LocationPlatform> {
    repo: Arc<R>,
    geofences: Arc<GeofenceManager<P>>,
    signals: mpsc::UnboundedSender<SaveSignal>,
    pub is_loading: StateCell<bool>,
    pub title: StateCell<Option<String>>,
    pub description: StateCell<Option<String>>,
    pub selected_location: StateCell<Option<String>>,
    pub latitude: StateCell<Option<f64>>,
    pub longitude: StateCell<Option<f64>>,
}

impl<R: ReminderRepository, P: LocationPlatform> SaveReminderController<R, P> {
    /// Builds the controller and the receiving end of its signal stream.
    pub fn new(
        repo: Arc<R>,
        geofences: Arc<GeofenceManager<P>>,
    ) -> (Self, mpsc::UnboundedReceiver<SaveSignal>) {
        let (signals, receiver) = mpsc::unbounded_channel();
        let controller = Self {
            repo,
            geofences,
            signals,
            is_loading: StateCell::new(false),
            title: StateCell::new(None),
            description: StateCell::new(None),
            selected_location: StateCell::new(None),
            latitude: StateCell::new(None),
            longitude: StateCell::new(None),
        };
        (controller, receiver)
    }

    pub fn set_title(&self, title: impl Into<String>) {
        self.title.set(Some(title.into()));
    }

    pub fn set_description(&self, description: impl Into<String>) {
        self.description.set(Some(description.into()));
    }

    /// Records the point picked on the map.
    pub fn select_location(&self, name: impl Into<String>, latitude: f64, longitude: f64) {
        self.selected_location.set(Some(name.into()));
        self.latitude.set(Some(latitude));
        self.longitude.set(Some(longitude));
    }

    /// Snapshot of the fields currently being edited.
    pub fn draft(&self) -> ReminderDraft {
        ReminderDraft {
            id: None,
            title: self.title.get(),
            description: self.description.get(),
            location: self.selected_location.get(),
            latitude: self.latitude.get(),
            longitude: self.longitude.get(),
        }
    }

    /// Resets every draft field, e.g. when the screen is torn down.
    pub fn on_clear(&self) {
        self.title.set(None);
        self.description.set(None);
        self.selected_location.set(None);
        self.latitude.set(None);
        self.longitude.set(None);
    }

    /// Returns whether `draft` can be saved, signalling the first problem.
    pub fn validate_entered_data(&self, draft: &ReminderDraft) -> bool {
        match draft.validate() {
            Ok(()) => true,
            Err(err) => {
                self.emit(SaveSignal::Snackbar(err));
                false
            }
        }
    }

    /// Validates and persists `draft`.
    ///
    /// Returns the stored record (with its final id) on success.
    pub async fn save_reminder(&self, draft: ReminderDraft) -> Option<ReminderRecord> {
        self.is_loading.set(true);
        let saved = self.persist(draft).await;
        self.is_loading.set(false);
        saved
    }

    /// Saves `draft`, then registers its geofence.
    ///
    /// A registration failure is signalled but does not undo the save.
    pub async fn save_and_register(&self, draft: ReminderDraft) -> Option<ReminderRecord> {
        let record = self.save_reminder(draft).await?;
        if let Err(err) = self.geofences.register_geofence(&record).await {
            self.emit(SaveSignal::Error(err.to_string()));
        }
        Some(record)
    }

    async fn persist(&self, draft: ReminderDraft) -> Option<ReminderRecord> {
        if !self.validate_entered_data(&draft) {
            return None;
        }
        let mut record = match draft.into_record() {
            Ok(record) => record,
            Err(err) => {
                self.emit(SaveSignal::Snackbar(err));
                return None;
            }
        };

        match self.repo.save(record.clone()).await {
            Ok(id) => {
                record.id = id;
                info!(
                    "event=reminder_save module=controller status=ok reminder_id={}",
                    record.id
                );
                self.emit(SaveSignal::Toast(SAVED_MESSAGE.to_string()));
                self.emit(SaveSignal::NavigateBack);
                Some(record)
            }
            Err(err) => {
                warn!("event=reminder_save module=controller status=error error={err}");
                self.emit(SaveSignal::Error(err.message()));
                None
            }
        }
    }

    fn emit(&self, signal: SaveSignal) {
        // Receiver gone means the screen is gone; nothing left to notify.
        let _ = self.signals.send(signal);
    }
}
