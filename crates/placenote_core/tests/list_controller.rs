use async_trait::async_trait;
use placenote_core::{
    ListPhase, LocalReminderRepository, MemoryReminderStore, ReminderId, ReminderRecord,
    ReminderRepository, RemindersListController, RepoError, RepoResult,
};
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Repository whose `get_all` blocks until the test releases it.
struct GatedRepository {
    gate: Semaphore,
    result: RepoResult<Vec<ReminderRecord>>,
}

impl GatedRepository {
    fn new(result: RepoResult<Vec<ReminderRecord>>) -> Self {
        Self {
            gate: Semaphore::new(0),
            result,
        }
    }

    fn release(&self) {
        self.gate.add_permits(1);
    }
}

#[async_trait]
impl ReminderRepository for GatedRepository {
    async fn get_all(&self) -> RepoResult<Vec<ReminderRecord>> {
        let _permit = self.gate.acquire().await.unwrap();
        self.result.clone()
    }

    async fn get_by_id(&self, id: &str) -> RepoResult<ReminderRecord> {
        Err(RepoError::NotFound(id.to_string()))
    }

    async fn save(&self, record: ReminderRecord) -> RepoResult<ReminderId> {
        Ok(record.id)
    }

    async fn delete_all(&self) -> RepoResult<()> {
        Ok(())
    }
}

async fn assert_single_loading_cycle(result: RepoResult<Vec<ReminderRecord>>) {
    let repo = Arc::new(GatedRepository::new(result));
    let controller = Arc::new(RemindersListController::new(Arc::clone(&repo)));
    let mut loading = controller.is_loading.subscribe();

    let task = tokio::spawn({
        let controller = Arc::clone(&controller);
        async move { controller.load().await }
    });

    loading.changed().await.unwrap();
    assert!(*loading.borrow_and_update());
    assert_eq!(controller.phase.get(), ListPhase::Loading);

    repo.release();
    loading.changed().await.unwrap();
    assert!(!*loading.borrow_and_update());

    task.await.unwrap();
    assert!(!loading.has_changed().unwrap());
}

fn three_reminders() -> Vec<ReminderRecord> {
    vec![
        ReminderRecord::new("T1", Some("hello 1".to_string()), "location 1", 30.2541, 31.4553),
        ReminderRecord::new("T2", Some("hello 2".to_string()), "location 2", 30.2565, 31.5018),
        ReminderRecord::new("T3", Some("hello 3".to_string()), "location 3", 30.1718, 31.4923),
    ]
}

#[tokio::test]
async fn loading_flag_cycles_once_on_success() {
    assert_single_loading_cycle(Ok(three_reminders())).await;
}

#[tokio::test]
async fn loading_flag_cycles_once_on_error() {
    assert_single_loading_cycle(Err(RepoError::Storage("boom".to_string()))).await;
}

#[tokio::test]
async fn empty_repository_loads_without_error() {
    let repo = Arc::new(LocalReminderRepository::new(Arc::new(
        MemoryReminderStore::new(),
    )));
    let controller = RemindersListController::new(repo);

    controller.load().await;

    assert_eq!(controller.phase.get(), ListPhase::Loaded { empty: true });
    assert!(controller.reminders.get().is_empty());
    assert!(controller.show_no_data.get());
    assert_eq!(controller.error_message.get(), None);
    assert!(!controller.is_loading.get());
}

#[tokio::test]
async fn loaded_reminders_are_projected_in_order() {
    let records = three_reminders();
    let repo = Arc::new(LocalReminderRepository::new(Arc::new(
        MemoryReminderStore::with_reminders(records.clone()),
    )));
    let controller = RemindersListController::new(repo);

    controller.load().await;

    let items = controller.reminders.get();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0].id, records[0].id);
    assert_eq!(items[2].title, "T3");
    assert!(!controller.show_no_data.get());
    assert_eq!(controller.phase.get(), ListPhase::Loaded { empty: false });
}

#[tokio::test]
async fn failing_repository_exposes_exact_message() {
    let store = Arc::new(MemoryReminderStore::new());
    store.set_failure(Some("Returning testing error!"));
    let repo = Arc::new(LocalReminderRepository::new(Arc::clone(&store)));
    let controller = RemindersListController::new(repo);

    controller.load().await;

    assert_eq!(
        controller.phase.get(),
        ListPhase::Failed {
            message: "Returning testing error!".to_string()
        }
    );
    assert_eq!(
        controller.error_message.get().as_deref(),
        Some("Returning testing error!")
    );
    assert!(!controller.is_loading.get());

    store.set_failure(None);
    controller.load().await;
    assert_eq!(controller.phase.get(), ListPhase::Loaded { empty: true });
    assert_eq!(controller.error_message.get(), None);
}
