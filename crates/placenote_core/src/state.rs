//! Observable value cells for controller-owned UI state.
//!
//! # Invariants
//! - Only the owning controller holds a cell; observers get read handles.
//! - Observers always see whole values, never partial updates.
//! - `observe` callbacks see every value in order; `subscribe` handles may
//!   skip intermediate ones.

use std::fmt::{Debug, Formatter};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;

type Observer<T> = Box<dyn Fn(&T) + Send + Sync>;

/// Single observable value.
///
/// Backed by `tokio::sync::watch`: readers get the latest value and can await
/// changes, intermediate values may be coalesced for slow readers.
pub struct StateCell<T> {
    sender: watch::Sender<T>,
    observers: Mutex<Vec<Observer<T>>>,
}

impl<T: Clone> StateCell<T> {
    pub fn new(initial: T) -> Self {
        let (sender, _) = watch::channel(initial);
        Self {
            sender,
            observers: Mutex::new(Vec::new()),
        }
    }

    /// Returns a clone of the current value.
    pub fn get(&self) -> T {
        self.sender.borrow().clone()
    }

    /// Replaces the value and wakes observers.
    ///
    /// Succeeds even when nobody is observing.
    pub fn set(&self, value: T) {
        for observer in self.observers().iter() {
            observer(&value);
        }
        self.sender.send_replace(value);
    }

    /// Registers a callback run synchronously on every `set`, in order.
    ///
    /// Callbacks must not touch this cell.
    pub fn observe(&self, observer: impl Fn(&T) + Send + Sync + 'static) {
        self.observers().push(Box::new(observer));
    }

    fn observers(&self) -> MutexGuard<'_, Vec<Observer<T>>> {
        self.observers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Opens a read handle that can await changes.
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.sender.subscribe()
    }
}

impl<T: Debug> Debug for StateCell<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateCell")
            .field("value", &*self.sender.borrow())
            .finish_non_exhaustive()
    }
}

impl<T: Clone + Default> Default for StateCell<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
