//! SQLite connection bootstrap for the reminder store.
//!
//! Connections handed out here are configured and fully migrated; failures
//! surface as `StoreError` so callers deal with one storage error type.

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};
