use placenote_core::{ReminderRecord, ReminderStore, SqliteReminderStore, StoreError};

fn reminder(title: &str) -> ReminderRecord {
    ReminderRecord::new(
        title,
        Some(format!("{title} description")),
        format!("{title} location"),
        24.46017677941061,
        54.42401049833613,
    )
}

#[test]
fn upsert_and_get_by_id_roundtrip() {
    let store = SqliteReminderStore::open_in_memory().unwrap();
    let record = reminder("first");

    store.upsert(&record).unwrap();

    let loaded = store.get_by_id(&record.id).unwrap().unwrap();
    assert_eq!(loaded, record);
}

#[test]
fn get_by_id_returns_none_for_unknown_id() {
    let store = SqliteReminderStore::open_in_memory().unwrap();
    assert!(store.get_by_id("missing").unwrap().is_none());
}

#[test]
fn upsert_with_existing_id_replaces_row() {
    let store = SqliteReminderStore::open_in_memory().unwrap();
    let mut record = reminder("draft");
    store.upsert(&record).unwrap();

    record.title = "final".to_string();
    record.description = None;
    store.upsert(&record).unwrap();

    let all = store.get_all().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].title, "final");
    assert_eq!(all[0].description, None);
}

#[test]
fn get_all_keeps_insertion_order_within_one_second() {
    let store = SqliteReminderStore::open_in_memory().unwrap();
    let titles: Vec<String> = (0..20).map(|i| format!("T{i}")).collect();
    for title in &titles {
        store.upsert(&reminder(title)).unwrap();
    }

    let loaded: Vec<String> = store
        .get_all()
        .unwrap()
        .into_iter()
        .map(|record| record.title)
        .collect();
    assert_eq!(loaded, titles);
}

#[test]
fn upsert_keeps_position_of_existing_row() {
    let store = SqliteReminderStore::open_in_memory().unwrap();
    let mut first = reminder("first");
    store.upsert(&first).unwrap();
    store.upsert(&reminder("second")).unwrap();

    first.title = "first edited".to_string();
    store.upsert(&first).unwrap();

    let titles: Vec<String> = store
        .get_all()
        .unwrap()
        .into_iter()
        .map(|record| record.title)
        .collect();
    assert_eq!(titles, vec!["first edited", "second"]);
}

#[test]
fn delete_all_empties_the_table() {
    let store = SqliteReminderStore::open_in_memory().unwrap();
    for title in ["a", "b", "c"] {
        store.upsert(&reminder(title)).unwrap();
    }
    assert_eq!(store.get_all().unwrap().len(), 3);

    store.delete_all().unwrap();
    assert!(store.get_all().unwrap().is_empty());
}

#[test]
fn blank_id_is_rejected_before_sql() {
    let store = SqliteReminderStore::open_in_memory().unwrap();
    let mut record = reminder("no id");
    record.id = String::new();

    let err = store.upsert(&record).unwrap_err();
    assert!(matches!(err, StoreError::InvalidData(_)));
}

#[test]
fn rows_survive_reopening_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reminders.db");
    let record = reminder("persisted");

    {
        let store = SqliteReminderStore::open(&path).unwrap();
        store.upsert(&record).unwrap();
    }

    let reopened = SqliteReminderStore::open(&path).unwrap();
    assert_eq!(reopened.get_all().unwrap(), vec![record]);
}
