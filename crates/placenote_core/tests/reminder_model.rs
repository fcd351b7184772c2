use placenote_core::{ReminderDraft, ReminderItem, ReminderRecord, ValidationError};

fn draft(title: &str, location: &str) -> ReminderDraft {
    ReminderDraft {
        id: None,
        title: Some(title.to_string()),
        description: Some("description".to_string()),
        location: Some(location.to_string()),
        latitude: Some(47.5456551),
        longitude: Some(122.0101731),
    }
}

#[test]
fn complete_draft_is_valid() {
    assert_eq!(draft("title", "location").validate(), Ok(()));
}

#[test]
fn empty_title_reports_missing_title() {
    assert_eq!(
        draft("", "X").validate(),
        Err(ValidationError::MissingTitle)
    );
}

#[test]
fn empty_location_reports_missing_location() {
    assert_eq!(
        draft("T", "").validate(),
        Err(ValidationError::MissingLocation)
    );
}

#[test]
fn missing_title_wins_over_missing_location() {
    let mut both_missing = draft("", "");
    assert_eq!(both_missing.validate(), Err(ValidationError::MissingTitle));

    both_missing.title = None;
    both_missing.location = None;
    assert_eq!(both_missing.validate(), Err(ValidationError::MissingTitle));
}

#[test]
fn non_finite_coordinates_are_rejected() {
    let mut invalid = draft("T", "X");
    invalid.latitude = Some(f64::NAN);
    assert_eq!(invalid.validate(), Err(ValidationError::MissingCoordinates));
}

#[test]
fn record_new_generates_distinct_ids() {
    let a = ReminderRecord::new("a", None, "x", 0.0, 0.0);
    let b = ReminderRecord::new("a", None, "x", 0.0, 0.0);
    assert!(a.has_id());
    assert_ne!(a.id, b.id);
}

#[test]
fn draft_round_trips_through_record() {
    let record = ReminderRecord::new("T1", Some("hello 1".to_string()), "location 1", 30.25, 31.45);
    let back = ReminderDraft::from(&record).into_record().unwrap();
    assert_eq!(back, record);
}

#[test]
fn record_serialization_uses_expected_wire_fields() {
    let record = ReminderRecord {
        id: "11111111-2222-4333-8444-555555555555".to_string(),
        title: "Pick up parcel".to_string(),
        description: None,
        location: "Post office".to_string(),
        latitude: 24.46017677941061,
        longitude: 54.42401049833613,
    };

    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["id"], "11111111-2222-4333-8444-555555555555");
    assert_eq!(json["title"], "Pick up parcel");
    assert!(json["description"].is_null());
    assert_eq!(json["location"], "Post office");
    assert_eq!(json["latitude"], 24.46017677941061);

    let decoded: ReminderRecord = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, record);
}

#[test]
fn item_projection_is_display_ready() {
    let record = ReminderRecord::new("T", Some("D".to_string()), "L", 30.0, 31.0);
    let item = ReminderItem::from(&record);
    assert_eq!(item.id, record.id);
    assert_eq!(item.title, "T");
    assert_eq!(item.description, "D");
    assert_eq!(item.location, "L");
    assert_eq!(item.latitude, "30.000000");
}

#[test]
fn validation_messages_are_short_strings() {
    assert_eq!(ValidationError::MissingTitle.to_string(), "Please enter title");
    assert_eq!(
        ValidationError::MissingLocation.to_string(),
        "Please select location"
    );
}
