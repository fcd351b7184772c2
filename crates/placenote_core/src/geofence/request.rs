//! Geofence request shapes handed to the platform location service.

use crate::config::GeofenceSettings;
use crate::model::reminder::{ReminderId, ReminderRecord};
use std::ops::BitOr;

/// Region transition reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    Enter,
    Exit,
}

/// Set of transitions a geofence reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransitionMask(u8);

impl TransitionMask {
    pub const NONE: Self = Self(0);
    pub const ENTER: Self = Self(1);
    pub const EXIT: Self = Self(1 << 1);

    pub fn contains(self, transition: Transition) -> bool {
        let bit = match transition {
            Transition::Enter => Self::ENTER,
            Transition::Exit => Self::EXIT,
        };
        self.0 & bit.0 != 0
    }
}

impl BitOr for TransitionMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// How long a registered geofence stays active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiration {
    Never,
    AfterMillis(u64),
}

/// Circular trigger region.
#[derive(Debug, Clone, PartialEq)]
pub struct Geofence {
    /// Same value as the reminder id; this is how triggers map back.
    pub request_id: ReminderId,
    pub latitude: f64,
    pub longitude: f64,
    pub radius_meters: f64,
    pub transitions: TransitionMask,
    pub loitering_delay_ms: u64,
    pub expiration: Expiration,
}

impl Geofence {
    /// Builds the region for one reminder.
    ///
    /// Reports enter and exit, never expires.
    pub fn for_reminder(record: &ReminderRecord, settings: &GeofenceSettings) -> Self {
        Self {
            request_id: record.id.clone(),
            latitude: record.latitude,
            longitude: record.longitude,
            radius_meters: settings.radius_meters,
            transitions: TransitionMask::ENTER | TransitionMask::EXIT,
            loitering_delay_ms: settings.loitering_delay_ms,
            expiration: Expiration::Never,
        }
    }
}

/// Batch of geofences submitted in one platform call.
#[derive(Debug, Clone, PartialEq)]
pub struct GeofencingRequest {
    pub geofences: Vec<Geofence>,
    /// Transitions reported immediately when the device is already inside.
    pub initial_trigger: TransitionMask,
}

impl GeofencingRequest {
    pub fn single(geofence: Geofence) -> Self {
        Self {
            geofences: vec![geofence],
            initial_trigger: TransitionMask::ENTER,
        }
    }
}

/// Location accuracy the settings check asks the device for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationPriority {
    HighAccuracy,
    BalancedPower,
    LowPower,
}

/// Device location-settings pre-check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocationSettingsRequest {
    pub priority: LocationPriority,
}

impl LocationSettingsRequest {
    pub fn low_power() -> Self {
        Self {
            priority: LocationPriority::LowPower,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Expiration, Geofence, GeofencingRequest, Transition, TransitionMask};
    use crate::config::GeofenceSettings;
    use crate::model::reminder::ReminderRecord;

    #[test]
    fn reminder_geofence_uses_defaults() {
        let record = ReminderRecord::new("t", None, "park", 30.25, 31.45);
        let geofence = Geofence::for_reminder(&record, &GeofenceSettings::default());

        assert_eq!(geofence.request_id, record.id);
        assert_eq!(geofence.radius_meters, 500.0);
        assert_eq!(geofence.loitering_delay_ms, 5_000);
        assert_eq!(geofence.expiration, Expiration::Never);
        assert!(geofence.transitions.contains(Transition::Enter));
        assert!(geofence.transitions.contains(Transition::Exit));

        let request = GeofencingRequest::single(geofence);
        assert_eq!(request.initial_trigger, TransitionMask::ENTER);
        assert!(!request.initial_trigger.contains(Transition::Exit));
    }
}
