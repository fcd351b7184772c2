//! Platform location-service boundary.
//!
//! # Responsibility
//! - Define what the geofence manager needs from the host OS.
//! - Provide an in-process platform for tests and the CLI driver.
//!
//! # Invariants
//! - Platforms key registrations by geofence request id; adding an existing
//!   id replaces it.

use super::request::{Geofence, GeofencingRequest, LocationSettingsRequest, Transition};
use super::trigger::{GeofencingEvent, TriggerSender};
use crate::model::reminder::ReminderId;
use async_trait::async_trait;
use std::collections::{BTreeMap, VecDeque};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Failed device location-settings check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsCheckError {
    /// The user can fix it through an interactive settings prompt.
    Resolvable(String),
    Unresolvable(String),
}

impl Display for SettingsCheckError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Resolvable(message) => write!(f, "location settings need attention: {message}"),
            Self::Unresolvable(message) => write!(f, "location settings unavailable: {message}"),
        }
    }
}

impl Error for SettingsCheckError {}

/// How the user left the interactive settings prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionOutcome {
    Resolved,
    /// Prompt dismissed or cancelled.
    Dismissed,
}

/// Rejection from the platform geofencing API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformError {
    pub message: String,
}

impl PlatformError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Display for PlatformError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl Error for PlatformError {}

/// Host location service used by `GeofenceManager`.
#[async_trait]
pub trait LocationPlatform: Send + Sync {
    async fn check_location_settings(
        &self,
        request: &LocationSettingsRequest,
    ) -> Result<(), SettingsCheckError>;

    /// Shows the interactive settings prompt and waits for the user.
    ///
    /// Unbounded; returns `Dismissed` when the user cancels.
    async fn resolve_location_settings(&self) -> ResolutionOutcome;

    async fn add_geofences(&self, request: &GeofencingRequest) -> Result<(), PlatformError>;

    async fn remove_geofences(&self, ids: &[ReminderId]) -> Result<(), PlatformError>;
}

#[derive(Default)]
struct SimulatedState {
    registered: BTreeMap<ReminderId, Geofence>,
    settings_script: VecDeque<Result<(), SettingsCheckError>>,
    resolution_script: VecDeque<ResolutionOutcome>,
    add_script: VecDeque<Result<(), PlatformError>>,
    settings_checks: usize,
    resolutions: usize,
    add_calls: usize,
}

/// Scriptable in-process location service.
///
/// Unscripted calls succeed: settings are fine, prompts get resolved and
/// submissions are accepted.
#[derive(Default)]
pub struct SimulatedLocationPlatform {
    state: Mutex<SimulatedState>,
    triggers: Option<TriggerSender>,
}

impl SimulatedLocationPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes fired transitions into the given trigger channel.
    pub fn with_trigger_sender(triggers: TriggerSender) -> Self {
        Self {
            state: Mutex::default(),
            triggers: Some(triggers),
        }
    }

    pub fn push_settings_result(&self, result: Result<(), SettingsCheckError>) {
        self.lock().settings_script.push_back(result);
    }

    pub fn push_resolution(&self, outcome: ResolutionOutcome) {
        self.lock().resolution_script.push_back(outcome);
    }

    pub fn push_add_result(&self, result: Result<(), PlatformError>) {
        self.lock().add_script.push_back(result);
    }

    pub fn is_registered(&self, id: &str) -> bool {
        self.lock().registered.contains_key(id)
    }

    pub fn registered_geofences(&self) -> Vec<Geofence> {
        self.lock().registered.values().cloned().collect()
    }

    pub fn settings_checks(&self) -> usize {
        self.lock().settings_checks
    }

    pub fn resolutions(&self) -> usize {
        self.lock().resolutions
    }

    pub fn add_calls(&self) -> usize {
        self.lock().add_calls
    }

    /// Simulates the device crossing a registered region boundary.
    ///
    /// Returns `false` when the id is not registered, the geofence does not
    /// report this transition, or no trigger channel is attached.
    pub fn fire(&self, id: &str, transition: Transition) -> bool {
        let reports = self
            .lock()
            .registered
            .get(id)
            .is_some_and(|geofence| geofence.transitions.contains(transition));
        if !reports {
            return false;
        }
        self.triggers.as_ref().is_some_and(|sender| {
            sender.deliver(GeofencingEvent::transition(transition, vec![id.to_string()]))
        })
    }

    fn lock(&self) -> MutexGuard<'_, SimulatedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl LocationPlatform for SimulatedLocationPlatform {
    async fn check_location_settings(
        &self,
        _request: &LocationSettingsRequest,
    ) -> Result<(), SettingsCheckError> {
        let mut state = self.lock();
        state.settings_checks += 1;
        state.settings_script.pop_front().unwrap_or(Ok(()))
    }

    async fn resolve_location_settings(&self) -> ResolutionOutcome {
        let mut state = self.lock();
        state.resolutions += 1;
        state
            .resolution_script
            .pop_front()
            .unwrap_or(ResolutionOutcome::Resolved)
    }

    async fn add_geofences(&self, request: &GeofencingRequest) -> Result<(), PlatformError> {
        let mut state = self.lock();
        state.add_calls += 1;
        state.add_script.pop_front().unwrap_or(Ok(()))?;
        for geofence in &request.geofences {
            state
                .registered
                .insert(geofence.request_id.clone(), geofence.clone());
        }
        Ok(())
    }

    async fn remove_geofences(&self, ids: &[ReminderId]) -> Result<(), PlatformError> {
        let mut state = self.lock();
        for id in ids {
            state.registered.remove(id);
        }
        Ok(())
    }
}
