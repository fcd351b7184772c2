//! Repository layer: the single choke point for reminder reads/writes.
//!
//! # Invariants
//! - Controllers and trigger handling never touch a store directly.
//! - Every asynchronous call returns `RepoResult` instead of panicking.

pub mod reminder_repo;
