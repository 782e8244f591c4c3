//! Repository layer abstractions and in-memory implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate locking details from service/business orchestration.
//!
//! # Invariants
//! - Every write runs under a single table write lock.
//! - Repository APIs never panic on poisoned locks; they return
//!   `RepoError::LockPoisoned`.

pub mod conversation_repo;
pub mod user_repo;
