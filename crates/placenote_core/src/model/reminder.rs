//! Reminder domain model.
//!
//! # Responsibility
//! - Define the persisted reminder record and the editable draft shape.
//! - Own draft validation rules used before anything reaches storage.
//!
//! # Invariants
//! - `ReminderRecord::id` is never empty once a record exists.
//! - Latitude and longitude are set together and are finite.
//! - Title is validated before location; only the first failure is reported.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque stable reminder identifier.
///
/// Also used verbatim as the geofence request id.
pub type ReminderId = String;

/// Generates a fresh reminder id.
pub fn new_reminder_id() -> ReminderId {
    Uuid::new_v4().to_string()
}

/// Validation failures for reminder drafts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Title is absent or blank.
    MissingTitle,
    /// Location label is absent or blank.
    MissingLocation,
    /// Coordinates are absent, only half present, or not finite.
    MissingCoordinates,
}

impl ValidationError {
    /// Short user-facing message for snackbar surfaces.
    pub fn message(self) -> &'static str {
        match self {
            Self::MissingTitle => "Please enter title",
            Self::MissingLocation => "Please select location",
            Self::MissingCoordinates => "Please select a point on the map",
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl Error for ValidationError {}

/// Persisted reminder bound to one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReminderRecord {
    pub id: ReminderId,
    pub title: String,
    pub description: Option<String>,
    /// Human-readable place label, e.g. a point-of-interest name.
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl ReminderRecord {
    /// Creates a record with a generated id.
    pub fn new(
        title: impl Into<String>,
        description: Option<String>,
        location: impl Into<String>,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Self {
            id: new_reminder_id(),
            title: title.into(),
            description,
            location: location.into(),
            latitude,
            longitude,
        }
    }

    /// Returns whether this record still needs an id assigned by the repository.
    pub fn has_id(&self) -> bool {
        !self.id.trim().is_empty()
    }
}

/// Editable, possibly incomplete reminder input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReminderDraft {
    /// Present when editing an existing reminder; `None` creates a new one.
    pub id: Option<ReminderId>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl ReminderDraft {
    /// Checks the draft in priority order: title, location, coordinates.
    ///
    /// Beyond the title and location checks, a draft with missing or
    /// non-finite coordinates is rejected with `MissingCoordinates`: a
    /// record cannot be stored or geofenced without a point. A draft that
    /// names a location but never picked a point on the map fails here.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if is_blank(self.title.as_deref()) {
            return Err(ValidationError::MissingTitle);
        }
        if is_blank(self.location.as_deref()) {
            return Err(ValidationError::MissingLocation);
        }
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => Ok(()),
            _ => Err(ValidationError::MissingCoordinates),
        }
    }

    /// Converts a valid draft into a record.
    ///
    /// Keeps the draft id when present so saves of an edited draft upsert the
    /// same row.
    pub fn into_record(self) -> Result<ReminderRecord, ValidationError> {
        self.validate()?;
        let (Some(title), Some(location), Some(latitude), Some(longitude)) =
            (self.title, self.location, self.latitude, self.longitude)
        else {
            return Err(ValidationError::MissingCoordinates);
        };

        Ok(ReminderRecord {
            id: self.id.unwrap_or_default(),
            title,
            description: self.description.filter(|value| !value.trim().is_empty()),
            location,
            latitude,
            longitude,
        })
    }
}

impl From<&ReminderRecord> for ReminderDraft {
    fn from(record: &ReminderRecord) -> Self {
        Self {
            id: Some(record.id.clone()),
            title: Some(record.title.clone()),
            description: record.description.clone(),
            location: Some(record.location.clone()),
            latitude: Some(record.latitude),
            longitude: Some(record.longitude),
        }
    }
}

/// Display-ready projection of a reminder.
///
/// All fields are plain strings so view layers can bind them directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderItem {
    pub id: String,
    pub title: String,
    pub description: String,
    pub location: String,
    pub latitude: String,
    pub longitude: String,
}

impl From<&ReminderRecord> for ReminderItem {
    fn from(record: &ReminderRecord) -> Self {
        Self {
            id: record.id.clone(),
            title: record.title.clone(),
            description: record.description.clone().unwrap_or_default(),
            location: record.location.clone(),
            latitude: format!("{:.6}", record.latitude),
            longitude: format!("{:.6}", record.longitude),
        }
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |text| text.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::{ReminderDraft, ReminderItem, ReminderRecord, ValidationError};

    fn full_draft() -> ReminderDraft {
        ReminderDraft {
            id: None,
            title: Some("Buy milk".to_string()),
            description: Some("two litres".to_string()),
            location: Some("Corner shop".to_string()),
            latitude: Some(47.5456551),
            longitude: Some(122.0101731),
        }
    }

    #[test]
    fn whitespace_title_counts_as_missing() {
        let draft = ReminderDraft {
            title: Some("   ".to_string()),
            ..full_draft()
        };
        assert_eq!(draft.validate(), Err(ValidationError::MissingTitle));
    }

    #[test]
    fn half_coordinates_are_rejected() {
        let draft = ReminderDraft {
            longitude: None,
            ..full_draft()
        };
        assert_eq!(draft.validate(), Err(ValidationError::MissingCoordinates));
    }

    #[test]
    fn title_and_location_without_point_are_rejected() {
        let draft = ReminderDraft {
            title: Some("T".to_string()),
            location: Some("X".to_string()),
            ..ReminderDraft::default()
        };
        assert_eq!(draft.validate(), Err(ValidationError::MissingCoordinates));
    }

    #[test]
    fn non_finite_coordinates_are_rejected() {
        let draft = ReminderDraft {
            latitude: Some(f64::NAN),
            ..full_draft()
        };
        assert_eq!(draft.validate(), Err(ValidationError::MissingCoordinates));
    }

    #[test]
    fn into_record_drops_blank_description() {
        let draft = ReminderDraft {
            description: Some(" ".to_string()),
            ..full_draft()
        };
        let record = draft.into_record().unwrap();
        assert_eq!(record.description, None);
        assert!(!record.has_id());
    }

    #[test]
    fn item_projection_formats_coordinates() {
        let record = ReminderRecord::new("t", None, "home", 1.5, -2.25);
        let item = ReminderItem::from(&record);
        assert_eq!(item.latitude, "1.500000");
        assert_eq!(item.longitude, "-2.250000");
        assert_eq!(item.description, "");
    }
}
