//! Reminder domain model.
//!
//! # Responsibility
//! - Define canonical data structures shared by storage, controllers and
//!   geofencing.
//!
//! # Invariants
//! - Every persisted reminder is identified by a stable `ReminderId`.
//! - Drafts are validated before conversion into records.

pub mod reminder;
