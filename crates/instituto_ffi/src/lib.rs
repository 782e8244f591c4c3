//! Flutter bridge for `instituto_core`.

pub mod api;
