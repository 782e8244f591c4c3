//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `instituto_core` linkage.
//! - Print a deterministic summary of the seeded store.
//!
//! Set `INSTITUTO_LOG_DIR` (absolute path) to write rolling logs and
//! `INSTITUTO_LOG_LEVEL` to override the default level.

use instituto_core::{default_log_level, init_logging, InMemoryDataStore, StoreResult};
use log::info;
use std::env;
use std::process::ExitCode;

const LOG_DIR_ENV: &str = "INSTITUTO_LOG_DIR";
const LOG_LEVEL_ENV: &str = "INSTITUTO_LOG_LEVEL";

fn main() -> ExitCode {
    if let Ok(log_dir) = env::var(LOG_DIR_ENV) {
        let level = env::var(LOG_LEVEL_ENV).unwrap_or_else(|_| default_log_level().to_string());
        if let Err(err) = init_logging(&level, &log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    println!("instituto_core ping={}", instituto_core::ping());
    println!("instituto_core version={}", instituto_core::core_version());

    match print_summary() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("store error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn print_summary() -> StoreResult<()> {
    let store = InMemoryDataStore::seeded()?;
    let users = store.users()?;
    let conversations = store.conversations()?;
    let pending = store.pending_justifications()?;

    println!("users={}", users.len());
    println!("conversations={}", conversations.len());
    println!("pending_justifications={}", pending.len());
    for item in &pending {
        println!(
            "  {} {} {} {}",
            item.student_name,
            item.subject_id,
            item.record.date,
            item.record.justification_note.as_deref().unwrap_or("-")
        );
    }
    info!(
        "event=cli_summary module=cli status=ok users={} conversations={} pending={}",
        users.len(),
        conversations.len(),
        pending.len()
    );
    Ok(())
}
