//! Core domain logic for placenote location reminders.
//!
//! Pipeline: draft -> `SaveReminderController` -> `ReminderRepository` ->
//! `GeofenceManager`; platform triggers flow back through
//! `TriggerDispatcher` to the notification presenter channel.

pub mod config;
pub mod controller;
pub mod db;
pub mod geofence;
pub mod logging;
pub mod model;
pub mod repo;
pub mod state;
pub mod store;

pub use config::{CoreConfig, GeofenceSettings};
pub use controller::list::{ListPhase, RemindersListController};
pub use controller::save::{SaveReminderController, SaveSignal, SAVED_MESSAGE};
pub use geofence::{
    trigger_channel, GeofenceError, GeofenceManager, GeofenceState, GeofencingEvent,
    LocationPlatform, ReminderTriggered, SimulatedLocationPlatform, Transition,
    TriggerDispatcher,
};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::reminder::{
    ReminderDraft, ReminderId, ReminderItem, ReminderRecord, ValidationError,
};
pub use repo::reminder_repo::{
    LocalReminderRepository, RepoError, RepoResult, ReminderRepository,
};
pub use state::StateCell;
pub use store::{MemoryReminderStore, ReminderStore, SqliteReminderStore, StoreError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
