//! Trigger delivery from the platform to the notification presenter.
//!
//! # Responsibility
//! - Carry platform transition events over a channel, detached from any
//!   screen.
//! - Resolve triggering geofence ids back to reminders and publish
//!   `ReminderTriggered` messages.
//!
//! # Invariants
//! - The dispatcher only talks to the repository, the geofence registry and
//!   the presenter channel.
//! - Events carrying a platform error code are logged and dropped.

use super::manager::GeofenceRegistry;
use super::request::Transition;
use crate::model::reminder::{ReminderId, ReminderRecord};
use crate::repo::reminder_repo::ReminderRepository;
use log::{error, info, warn};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Raw transition event as delivered by the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeofencingEvent {
    pub transition: Option<Transition>,
    pub triggering_ids: Vec<ReminderId>,
    pub error_code: Option<i32>,
}

impl GeofencingEvent {
    pub fn transition(transition: Transition, triggering_ids: Vec<ReminderId>) -> Self {
        Self {
            transition: Some(transition),
            triggering_ids,
            error_code: None,
        }
    }

    pub fn error(code: i32) -> Self {
        Self {
            transition: None,
            triggering_ids: Vec::new(),
            error_code: Some(code),
        }
    }
}

/// Message consumed by the notification presenter.
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderTriggered {
    pub id: ReminderId,
    pub transition: Transition,
    /// `None` when the reminder could not be read back.
    pub reminder: Option<ReminderRecord>,
}

/// Cloneable entry point the platform pushes events into.
#[derive(Debug, Clone)]
pub struct TriggerSender {
    inner: mpsc::UnboundedSender<GeofencingEvent>,
}

impl TriggerSender {
    /// Returns `false` once the dispatcher side is gone.
    pub fn deliver(&self, event: GeofencingEvent) -> bool {
        self.inner.send(event).is_ok()
    }
}

/// Creates the platform -> dispatcher event channel.
pub fn trigger_channel() -> (TriggerSender, mpsc::UnboundedReceiver<GeofencingEvent>) {
    let (inner, receiver) = mpsc::unbounded_channel();
    (TriggerSender { inner }, receiver)
}

/// Background consumer of platform trigger events.
pub struct TriggerDispatcher<R: ReminderRepository + 'static> {
    repo: Arc<R>,
    registry: GeofenceRegistry,
    events: mpsc::UnboundedReceiver<GeofencingEvent>,
    presenter: mpsc::UnboundedSender<ReminderTriggered>,
}

impl<R: ReminderRepository + 'static> TriggerDispatcher<R> {
    pub fn new(
        repo: Arc<R>,
        registry: GeofenceRegistry,
        events: mpsc::UnboundedReceiver<GeofencingEvent>,
        presenter: mpsc::UnboundedSender<ReminderTriggered>,
    ) -> Self {
        Self {
            repo,
            registry,
            events,
            presenter,
        }
    }

    /// Runs the dispatcher on the current tokio runtime.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Drains events until the platform side closes or the presenter goes
    /// away.
    pub async fn run(self) {
        let Self {
            repo,
            registry,
            mut events,
            presenter,
        } = self;

        info!("event=trigger_dispatch module=geofence status=start");
        while let Some(event) = events.recv().await {
            if !dispatch(repo.as_ref(), &registry, &presenter, event).await {
                break;
            }
        }
        info!("event=trigger_dispatch module=geofence status=stopped");
    }
}

/// Handles one event. Returns `false` once the presenter is gone.
async fn dispatch<R: ReminderRepository>(
    repo: &R,
    registry: &GeofenceRegistry,
    presenter: &mpsc::UnboundedSender<ReminderTriggered>,
    event: GeofencingEvent,
) -> bool {
    if let Some(code) = event.error_code {
        error!("event=geofence_trigger module=geofence status=error error_code={code}");
        return true;
    }
    let Some(transition) = event.transition else {
        warn!("event=geofence_trigger module=geofence status=ignored reason=no_transition");
        return true;
    };

    for id in event.triggering_ids {
        let known = registry.mark_triggered(&id);
        let reminder = match repo.get_by_id(&id).await {
            Ok(record) => Some(record),
            Err(err) => {
                warn!(
                    "event=geofence_trigger module=geofence status=lookup_failed reminder_id={id} error={err}"
                );
                None
            }
        };
        info!(
            "event=geofence_trigger module=geofence status=ok reminder_id={id} transition={transition:?} known={known}"
        );

        let message = ReminderTriggered {
            id,
            transition,
            reminder,
        };
        if presenter.send(message).is_err() {
            warn!("event=geofence_trigger module=geofence status=presenter_closed");
            return false;
        }
    }
    true
}
