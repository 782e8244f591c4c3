//! Service layer for store use-cases and read-side derivations.

pub mod data_store;
pub mod queries;
pub mod session_service;
