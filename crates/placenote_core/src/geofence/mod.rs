//! Geofence lifecycle: request building, platform boundary, registration
//! state and trigger dispatch.
//!
//! Flow: `GeofenceManager::register_geofence` submits a region keyed by the
//! reminder id; the platform later pushes `GeofencingEvent`s into a
//! `TriggerSender`; `TriggerDispatcher` resolves them to reminders and
//! publishes `ReminderTriggered` for the notification presenter.
//!
//! Removing a reminder does not remove its geofence; callers own that.

pub mod manager;
pub mod platform;
pub mod request;
pub mod trigger;

pub use manager::{GeofenceError, GeofenceManager, GeofenceRegistry, GeofenceState};
pub use platform::{
    LocationPlatform, PlatformError, ResolutionOutcome, SettingsCheckError,
    SimulatedLocationPlatform,
};
pub use request::{
    Expiration, Geofence, GeofencingRequest, LocationPriority, LocationSettingsRequest,
    Transition, TransitionMask,
};
pub use trigger::{
    trigger_channel, GeofencingEvent, ReminderTriggered, TriggerDispatcher, TriggerSender,
};
