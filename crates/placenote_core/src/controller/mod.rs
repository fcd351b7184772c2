//! Screen controllers deriving observable state from repository calls.
//!
//! # Responsibility
//! - Own one screen's state cells and mutate them from the driving task only.
//! - Receive collaborators through constructors; no global registry.

pub mod list;
pub mod save;
