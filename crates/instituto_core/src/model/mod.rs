//! Domain model for users, academics and messaging.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep patch/merge rules next to the data they mutate.
//!
//! # Invariants
//! - Every user is identified by a stable `UserId`.
//! - Nothing is hard-deleted during a session.

pub mod academic;
pub mod appearance;
pub mod conversation;
pub mod user;
