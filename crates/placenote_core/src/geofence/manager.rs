//! Geofence registration lifecycle.
//!
//! # Responsibility
//! - Turn persisted reminders into platform geofence registrations.
//! - Track per-reminder registration state shared with trigger dispatch.
//!
//! # Invariants
//! - The location-settings prompt is offered at most once per
//!   `register_geofence` call.
//! - A rejected submission is retried exactly once; the second failure is
//!   terminal for that call.
//! - Re-registering a live geofence never moves it away from `Registered`.
//! - Registrations and removals run one at a time per manager.
//! - Registry lock scopes never span an await.

use super::platform::{LocationPlatform, ResolutionOutcome, SettingsCheckError};
use super::request::{Geofence, GeofencingRequest, LocationSettingsRequest};
use crate::config::GeofenceSettings;
use crate::model::reminder::{ReminderId, ReminderRecord};
use log::{info, warn};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

const MAX_SUBMISSION_ATTEMPTS: u32 = 2;

/// Registration state of one reminder's geofence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GeofenceState {
    #[default]
    Unregistered,
    PendingRegistration,
    Registered,
    /// Registered and fired at least once.
    Triggered,
}

impl GeofenceState {
    /// Whether the platform currently holds a registration for this id.
    pub fn is_live(self) -> bool {
        matches!(self, Self::Registered | Self::Triggered)
    }
}

/// Terminal registration failure for one attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeofenceError {
    /// Device location settings stayed off or the prompt was dismissed.
    SettingsUnresolved,
    PlatformRejected(String),
}

impl Display for GeofenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SettingsUnresolved => {
                f.write_str("Location services must be enabled to use the app")
            }
            Self::PlatformRejected(message) => {
                write!(f, "Failed to add location, try again later: {message}")
            }
        }
    }
}

impl Error for GeofenceError {}

/// Shared per-id state table.
#[derive(Debug, Clone, Default)]
pub struct GeofenceRegistry {
    states: Arc<Mutex<HashMap<ReminderId, GeofenceState>>>,
}

impl GeofenceRegistry {
    pub fn state(&self, id: &str) -> GeofenceState {
        self.lock().get(id).copied().unwrap_or_default()
    }

    /// Ids with a live platform registration, sorted.
    pub fn live_ids(&self) -> Vec<ReminderId> {
        let mut ids: Vec<ReminderId> = self
            .lock()
            .iter()
            .filter(|(_, state)| state.is_live())
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort();
        ids
    }

    /// Marks a live geofence as fired. Returns whether the id was live.
    pub fn mark_triggered(&self, id: &str) -> bool {
        let mut states = self.lock();
        match states.get_mut(id) {
            Some(state) if state.is_live() => {
                *state = GeofenceState::Triggered;
                true
            }
            _ => false,
        }
    }

    fn set(&self, id: &str, state: GeofenceState) {
        let mut states = self.lock();
        if state == GeofenceState::Unregistered {
            states.remove(id);
        } else {
            states.insert(id.to_string(), state);
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<ReminderId, GeofenceState>> {
        self.states.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Resets a pending registration when the registering future is dropped
/// before finishing.
struct PendingGuard<'a> {
    registry: &'a GeofenceRegistry,
    id: &'a str,
    armed: bool,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        if self.armed && self.registry.state(self.id) == GeofenceState::PendingRegistration {
            self.registry.set(self.id, GeofenceState::Unregistered);
        }
    }
}

/// Registers reminder geofences with the platform and tracks their state.
pub struct GeofenceManager<P: LocationPlatform> {
    platform: Arc<P>,
    settings: GeofenceSettings,
    registry: GeofenceRegistry,
    submissions: tokio::sync::Mutex<()>,
}

impl<P: LocationPlatform> GeofenceManager<P> {
    pub fn new(platform: Arc<P>, settings: GeofenceSettings) -> Self {
        Self {
            platform,
            settings,
            registry: GeofenceRegistry::default(),
            submissions: tokio::sync::Mutex::new(()),
        }
    }

    /// Handle for trigger dispatch; shares state with this manager.
    pub fn registry(&self) -> GeofenceRegistry {
        self.registry.clone()
    }

    pub fn state(&self, id: &str) -> GeofenceState {
        self.registry.state(id)
    }

    pub fn registered_ids(&self) -> Vec<ReminderId> {
        self.registry.live_ids()
    }

    /// Registers (or overwrites) the geofence for `record`.
    ///
    /// On error the reminder is left `Unregistered`, unless it already had a
    /// live registration, which stays in place.
    pub async fn register_geofence(&self, record: &ReminderRecord) -> Result<(), GeofenceError> {
        let _submission = self.submissions.lock().await;
        let id = record.id.as_str();
        let was_live = self.registry.state(id).is_live();
        if !was_live {
            self.registry.set(id, GeofenceState::PendingRegistration);
        }
        let mut guard = PendingGuard {
            registry: &self.registry,
            id,
            armed: !was_live,
        };

        let request = GeofencingRequest::single(Geofence::for_reminder(record, &self.settings));
        let mut prompt_available = true;
        let mut outcome = Err(GeofenceError::SettingsUnresolved);

        for attempt in 1..=MAX_SUBMISSION_ATTEMPTS {
            outcome = self.try_register(&request, &mut prompt_available).await;
            match &outcome {
                Ok(()) | Err(GeofenceError::SettingsUnresolved) => break,
                Err(GeofenceError::PlatformRejected(message)) => warn!(
                    "event=geofence_register module=geofence status=rejected reminder_id={id} attempt={attempt} error={message}"
                ),
            }
        }

        match &outcome {
            Ok(()) => {
                guard.armed = false;
                self.registry.set(id, GeofenceState::Registered);
                info!(
                    "event=geofence_register module=geofence status=ok reminder_id={id} overwrite={was_live}"
                );
            }
            // Dropping the guard resets a pending id; a live one is untouched.
            Err(err) => {
                warn!(
                    "event=geofence_register module=geofence status=error reminder_id={id} error={err}"
                );
            }
        }
        outcome
    }

    /// Drops the platform registration for `id`.
    pub async fn remove_geofence(&self, id: &str) -> Result<(), GeofenceError> {
        let _submission = self.submissions.lock().await;
        self.platform
            .remove_geofences(&[id.to_string()])
            .await
            .map_err(|err| GeofenceError::PlatformRejected(err.message))?;
        self.registry.set(id, GeofenceState::Unregistered);
        info!("event=geofence_remove module=geofence status=ok reminder_id={id}");
        Ok(())
    }

    async fn try_register(
        &self,
        request: &GeofencingRequest,
        prompt_available: &mut bool,
    ) -> Result<(), GeofenceError> {
        self.ensure_location_settings(prompt_available).await?;
        self.platform
            .add_geofences(request)
            .await
            .map_err(|err| GeofenceError::PlatformRejected(err.message))
    }

    async fn ensure_location_settings(
        &self,
        prompt_available: &mut bool,
    ) -> Result<(), GeofenceError> {
        let request = LocationSettingsRequest::low_power();
        match self.platform.check_location_settings(&request).await {
            Ok(()) => Ok(()),
            Err(SettingsCheckError::Resolvable(reason)) if *prompt_available => {
                *prompt_available = false;
                info!("event=location_settings module=geofence status=prompt reason={reason}");
                match self.platform.resolve_location_settings().await {
                    ResolutionOutcome::Resolved => self
                        .platform
                        .check_location_settings(&request)
                        .await
                        .map_err(|_| GeofenceError::SettingsUnresolved),
                    ResolutionOutcome::Dismissed => Err(GeofenceError::SettingsUnresolved),
                }
            }
            Err(err) => {
                warn!("event=location_settings module=geofence status=error error={err}");
                Err(GeofenceError::SettingsUnresolved)
            }
        }
    }
}
