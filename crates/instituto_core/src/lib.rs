//! Core domain logic for Mi Instituto.
//! This crate is the single source of truth for business invariants.

pub mod fixtures;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::academic::{
    AttendancePatch, AttendanceRecord, AttendanceStatus, Course, JustificationStatus,
    PartialGrade, Subject,
};
pub use model::appearance::{
    border_styles, parse_border_style, parse_theme, themes, AppearanceError,
    AppearancePreferences, BorderStyle, Theme,
};
pub use model::conversation::{Conversation, Message};
pub use model::user::{
    CustomEvent, NewCustomEvent, StudentProfile, TeacherProfile, User, UserId, UserProfile,
    UserRole,
};
pub use repo::conversation_repo::{ConversationRepository, InMemoryConversationRepository};
pub use repo::user_repo::{InMemoryUserRepository, RepoError, RepoResult, UserRepository};
pub use service::data_store::{
    AttendanceSheetEntry, DataStore, InMemoryDataStore, StoreError, StoreResult,
};
pub use service::queries::{
    attendance_percentage, calendar_events, conversation_partner, conversation_summaries,
    credited_attendance_percentage, events_on, justification_history,
    overall_attendance_percentage, pending_justifications, pending_justifications_for_teacher,
    ungraded_partials, upcoming_events, CalendarEvent, CalendarEventKind, ConversationSummary,
    JustificationEntry, PendingJustification, UngradedPartial,
};
pub use service::session_service::{login_email, SessionService};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
