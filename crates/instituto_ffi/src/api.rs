//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to Dart via FRB.
//! - Own the process-lifetime store, session identity and appearance choice.
//! - Refuse blank form input before it reaches the store.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Store data outlives login sessions; logout only drops the identity.
//! - User snapshots cross the boundary as JSON strings.

use instituto_core::{
    attendance_percentage, core_version as core_version_inner,
    credited_attendance_percentage, init_logging as init_logging_inner, ping as ping_inner,
    AppearancePreferences, AttendanceStatus, CalendarEventKind, InMemoryDataStore,
    NewCustomEvent, PendingJustification, SessionService, StoreError, User, UserRole,
};
use log::error;
use std::sync::{Mutex, MutexGuard, OnceLock};

static STORE: OnceLock<Result<InMemoryDataStore, StoreError>> = OnceLock::new();
static SESSION: Mutex<SessionService> = Mutex::new(SessionService::new());
static APPEARANCE: OnceLock<Mutex<AppearancePreferences>> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    /// Whether the store applied the change.
    pub ok: bool,
    /// Optional id of the created entity.
    pub id: Option<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl ActionResponse {
    fn applied(message: impl Into<String>, id: Option<String>) -> Self {
        Self {
            ok: true,
            id,
            message: message.into(),
        }
    }

    fn rejected(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            id: None,
            message: message.into(),
        }
    }

    fn from_outcome(result: Result<bool, String>, done: &str, noop: &str) -> Self {
        match result {
            Ok(true) => Self::applied(done, None),
            Ok(false) => Self::rejected(noop),
            Err(err) => Self::rejected(err),
        }
    }
}

/// One row of the take-attendance sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceEntry {
    pub student_id: u32,
    /// `present|absent|justified|pending|late`.
    pub status: String,
}

/// One inbox row with the partner already resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboxItem {
    pub conversation_id: String,
    pub partner_id: u32,
    pub partner_name: String,
    pub partner_avatar: String,
    pub last_message_text: String,
    /// RFC 3339 timestamp.
    pub last_message_at: String,
}

/// One justification waiting for review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingJustificationItem {
    pub student_id: u32,
    pub student_name: String,
    pub subject_id: String,
    pub subject_name: String,
    pub date: String,
    pub note: Option<String>,
}

/// One calendar timeline entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarItem {
    /// `YYYY-MM-DD`.
    pub date: String,
    pub title: String,
    /// `academic|custom`.
    pub kind: String,
}

/// Attendance percentages of one subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectAttendanceItem {
    pub subject_id: String,
    pub subject_name: String,
    pub percentage: u32,
    pub credited_percentage: u32,
}

/// Active appearance ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppearanceResponse {
    pub theme: String,
    pub border_style: String,
}

/// Logs in as the fixture account for `role` (`student|teacher`).
///
/// Returns the user snapshot as JSON, or `None` when the role is unknown or
/// the account is missing.
#[flutter_rust_bridge::frb(sync)]
pub fn login(role: String) -> Option<String> {
    let role = UserRole::parse(&role)?;
    let store = store().ok()?;
    let mut session = session().ok()?;
    match session.login(store, role) {
        Ok(user) => user.as_ref().and_then(user_json),
        Err(err) => {
            error!("event=login module=ffi status=error error={err}");
            None
        }
    }
}

/// Drops the session identity. Store data is kept.
#[flutter_rust_bridge::frb(sync)]
pub fn logout() {
    if let Ok(mut session) = session() {
        session.logout();
    }
}

/// Snapshot of the logged-in user as JSON.
#[flutter_rust_bridge::frb(sync)]
pub fn current_user_json() -> Option<String> {
    let store = store().ok()?;
    let session = session().ok()?;
    let user = session.current_user(store).ok()??;
    user_json(&user)
}

/// Snapshot of any user as JSON.
#[flutter_rust_bridge::frb(sync)]
pub fn find_user_json(user_id: u32) -> Option<String> {
    let user = store().ok()?.find_user_by_id(user_id).ok()??;
    user_json(&user)
}

/// Sets the status of one attendance row, creating it when missing.
#[flutter_rust_bridge::frb(sync)]
pub fn update_student_attendance(
    student_id: u32,
    subject_id: String,
    date: String,
    status: String,
) -> ActionResponse {
    let Some(status) = AttendanceStatus::parse(&status) else {
        return ActionResponse::rejected(format!("unsupported attendance status `{status}`"));
    };
    let result = store().and_then(|store| {
        store
            .update_student_data(student_id, &subject_id, &date, status)
            .map_err(|err| err.to_string())
    });
    ActionResponse::from_outcome(result, "Attendance updated.", "Student or subject not found.")
}

/// Confirms a teacher's attendance sheet for one course and date.
#[flutter_rust_bridge::frb(sync)]
pub fn take_course_attendance(
    teacher_id: u32,
    course_id: String,
    date: String,
    entries: Vec<AttendanceEntry>,
) -> ActionResponse {
    let mut parsed = Vec::with_capacity(entries.len());
    for entry in entries {
        let Some(status) = AttendanceStatus::parse(&entry.status) else {
            return ActionResponse::rejected(format!(
                "unsupported attendance status `{}`",
                entry.status
            ));
        };
        parsed.push((entry.student_id, status));
    }
    match store().and_then(|store| {
        store
            .take_course_attendance(teacher_id, &course_id, &date, &parsed)
            .map_err(|err| err.to_string())
    }) {
        Ok(changed) => ActionResponse::applied(format!("{changed} row(s) saved."), None),
        Err(err) => ActionResponse::rejected(err),
    }
}

/// Attaches a justification note to an existing absence.
#[flutter_rust_bridge::frb(sync)]
pub fn submit_justification(
    student_id: u32,
    subject_id: String,
    date: String,
    note: String,
) -> ActionResponse {
    if note.trim().is_empty() {
        return ActionResponse::rejected("Justification note is required.");
    }
    let result = store().and_then(|store| {
        store
            .submit_justification(student_id, &subject_id, &date, &note)
            .map_err(|err| err.to_string())
    });
    ActionResponse::from_outcome(
        result,
        "Justification submitted.",
        "No attendance record for that date.",
    )
}

/// Approves or rejects a submitted justification.
#[flutter_rust_bridge::frb(sync)]
pub fn review_justification(
    student_id: u32,
    subject_id: String,
    date: String,
    approved: bool,
) -> ActionResponse {
    let result = store().and_then(|store| {
        store
            .review_justification(student_id, &subject_id, &date, approved)
            .map_err(|err| err.to_string())
    });
    let done = if approved {
        "Justification approved."
    } else {
        "Justification rejected."
    };
    ActionResponse::from_outcome(result, done, "No attendance record for that date.")
}

/// Review queue over every student in the store.
#[flutter_rust_bridge::frb(sync)]
pub fn all_pending_justifications() -> Vec<PendingJustificationItem> {
    let items =
        store().and_then(|store| store.pending_justifications().map_err(|err| err.to_string()));
    pending_items(items)
}

/// Justifications waiting for review on one teacher's rosters.
#[flutter_rust_bridge::frb(sync)]
pub fn pending_justifications(teacher_id: u32) -> Vec<PendingJustificationItem> {
    let items = store().and_then(|store| {
        store
            .pending_justifications_for_teacher(teacher_id)
            .map_err(|err| err.to_string())
    });
    pending_items(items)
}

/// Per-subject attendance percentages of one student.
#[flutter_rust_bridge::frb(sync)]
pub fn attendance_summary(student_id: u32) -> Vec<SubjectAttendanceItem> {
    let Some(user) = store()
        .ok()
        .and_then(|store| store.find_user_by_id(student_id).ok().flatten())
    else {
        return Vec::new();
    };
    let Some(student) = user.as_student() else {
        return Vec::new();
    };
    student
        .subjects
        .iter()
        .map(|subject| SubjectAttendanceItem {
            subject_id: subject.id.clone(),
            subject_name: subject.name.clone(),
            percentage: attendance_percentage(subject),
            credited_percentage: credited_attendance_percentage(subject),
        })
        .collect()
}

/// Sends one chat message.
#[flutter_rust_bridge::frb(sync)]
pub fn send_message(sender_id: u32, receiver_id: u32, text: String) -> ActionResponse {
    let text = text.trim();
    if text.is_empty() {
        return ActionResponse::rejected("Message text is required.");
    }
    match store().and_then(|store| {
        store
            .add_message(sender_id, receiver_id, text)
            .map_err(|err| err.to_string())
    }) {
        Ok(message) => ActionResponse::applied("Message sent.", Some(message.id)),
        Err(err) => ActionResponse::rejected(err),
    }
}

/// Inbox of one user, latest conversation first.
#[flutter_rust_bridge::frb(sync)]
pub fn inbox(user_id: u32) -> Vec<InboxItem> {
    let Ok(store) = store() else {
        return Vec::new();
    };
    let Ok(summaries) = store.conversations_for(user_id) else {
        return Vec::new();
    };
    summaries
        .into_iter()
        .filter_map(|summary| {
            let partner = store.find_user_by_id(summary.partner_id).ok().flatten()?;
            Some(InboxItem {
                conversation_id: summary.conversation_id,
                partner_id: partner.id,
                partner_name: partner.name,
                partner_avatar: partner.avatar,
                last_message_text: summary.last_message.text,
                last_message_at: summary.last_message.timestamp.to_rfc3339(),
            })
        })
        .collect()
}

/// Conversation between two users as JSON.
#[flutter_rust_bridge::frb(sync)]
pub fn conversation_json(user_id: u32, partner_id: u32) -> Option<String> {
    let conversation = store()
        .ok()?
        .conversation_between(user_id, partner_id)
        .ok()??;
    serde_json::to_string(&conversation).ok()
}

/// Replaces a user's avatar URL.
#[flutter_rust_bridge::frb(sync)]
pub fn update_avatar(user_id: u32, avatar_url: String) -> ActionResponse {
    let avatar_url = avatar_url.trim();
    if avatar_url.is_empty() {
        return ActionResponse::rejected("Avatar URL is required.");
    }
    let result = store().and_then(|store| {
        store
            .update_user_avatar(user_id, avatar_url)
            .map_err(|err| err.to_string())
    });
    ActionResponse::from_outcome(result, "Avatar updated.", "User not found.")
}

/// Saves a custom calendar event. Title and date are required.
#[flutter_rust_bridge::frb(sync)]
pub fn add_custom_event(user_id: u32, title: String, date: String) -> ActionResponse {
    if title.trim().is_empty() || date.trim().is_empty() {
        return ActionResponse::rejected("Event title and date are required.");
    }
    let event = NewCustomEvent { title, date };
    match store().and_then(|store| {
        store
            .add_custom_event(user_id, event)
            .map_err(|err| err.to_string())
    }) {
        Ok(Some(event)) => ActionResponse::applied("Event saved.", Some(event.id)),
        Ok(None) => ActionResponse::rejected("User not found."),
        Err(err) => ActionResponse::rejected(err),
    }
}

/// Merged calendar of one user, sorted by date.
#[flutter_rust_bridge::frb(sync)]
pub fn calendar(user_id: u32) -> Vec<CalendarItem> {
    let Ok(events) = store().and_then(|store| {
        store
            .calendar_events_for(user_id)
            .map_err(|err| err.to_string())
    }) else {
        return Vec::new();
    };
    events
        .into_iter()
        .map(|event| CalendarItem {
            date: event.date.to_string(),
            title: event.title,
            kind: match event.kind {
                CalendarEventKind::Academic => "academic",
                CalendarEventKind::Custom => "custom",
            }
            .to_string(),
        })
        .collect()
}

/// Active appearance choice.
#[flutter_rust_bridge::frb(sync)]
pub fn appearance() -> AppearanceResponse {
    let current = match appearance_state() {
        Ok(state) => state.clone(),
        Err(_) => AppearancePreferences::default(),
    };
    AppearanceResponse {
        theme: current.theme,
        border_style: current.border_style,
    }
}

/// Switches theme. Returns empty string on success and error message on
/// failure.
#[flutter_rust_bridge::frb(sync)]
pub fn set_theme(theme_id: String) -> String {
    match appearance_state() {
        Ok(mut state) => state
            .set_theme(&theme_id)
            .err()
            .map(|err| err.to_string())
            .unwrap_or_default(),
        Err(err) => err,
    }
}

/// Switches border style. Returns empty string on success and error message
/// on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn set_border_style(style_id: String) -> String {
    match appearance_state() {
        Ok(mut state) => state
            .set_border_style(&style_id)
            .err()
            .map(|err| err.to_string())
            .unwrap_or_default(),
        Err(err) => err,
    }
}

fn store() -> Result<&'static InMemoryDataStore, String> {
    STORE
        .get_or_init(InMemoryDataStore::seeded)
        .as_ref()
        .map_err(|err| format!("store init failed: {err}"))
}

fn session() -> Result<MutexGuard<'static, SessionService>, String> {
    SESSION
        .lock()
        .map_err(|_| "session lock is poisoned".to_string())
}

fn appearance_state() -> Result<MutexGuard<'static, AppearancePreferences>, String> {
    APPEARANCE
        .get_or_init(|| Mutex::new(AppearancePreferences::default()))
        .lock()
        .map_err(|_| "appearance lock is poisoned".to_string())
}

fn pending_items(
    items: Result<Vec<PendingJustification>, String>,
) -> Vec<PendingJustificationItem> {
    let items = match items {
        Ok(items) => items,
        Err(err) => {
            error!("event=pending_justifications module=ffi status=error error={err}");
            return Vec::new();
        }
    };
    items
        .into_iter()
        .map(|item| PendingJustificationItem {
            student_id: item.student_id,
            student_name: item.student_name,
            subject_id: item.subject_id,
            subject_name: item.subject_name,
            date: item.record.date,
            note: item.record.justification_note,
        })
        .collect()
}

fn user_json(user: &User) -> Option<String> {
    match serde_json::to_string(user) {
        Ok(json) => Some(json),
        Err(err) => {
            error!(
                "event=user_json module=ffi status=error user_id={} error={err}",
                user.id
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        add_custom_event, all_pending_justifications, appearance, attendance_summary, calendar,
        conversation_json, core_version, current_user_json, inbox, init_logging, login, logout,
        pending_justifications, ping, review_justification, send_message, set_border_style,
        set_theme, submit_justification, take_course_attendance, update_avatar,
        update_student_attendance, AttendanceEntry,
    };

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(error.contains("unsupported log level"));
    }

    #[test]
    fn login_logout_keeps_store_data() {
        assert!(login("admin".to_string()).is_none());

        let json = login("Teacher".to_string()).expect("teacher fixture should log in");
        assert!(json.contains("\"role\":\"teacher\""));

        let saved = add_custom_event(100, "Claustro".to_string(), "2024-12-02".to_string());
        assert!(saved.ok, "{}", saved.message);

        logout();
        assert!(current_user_json().is_none());

        login("teacher".to_string()).expect("teacher fixture should log in again");
        let current = current_user_json().expect("session should resolve the teacher");
        assert!(current.contains("Claustro"));
    }

    #[test]
    fn attendance_update_rejects_unknown_status() {
        let response = update_student_attendance(
            202,
            "F2B".to_string(),
            "2024-12-06".to_string(),
            "tardy".to_string(),
        );
        assert!(!response.ok);

        let response = update_student_attendance(
            202,
            "F2B".to_string(),
            "2024-12-06".to_string(),
            "absent".to_string(),
        );
        assert!(response.ok, "{}", response.message);
    }

    #[test]
    fn justification_round_trip_through_ffi() {
        let date = "2024-12-09".to_string();
        let blank = submit_justification(103, "M1A".to_string(), date.clone(), "  ".to_string());
        assert!(!blank.ok);

        let missing =
            submit_justification(103, "M1A".to_string(), date.clone(), "nota.pdf".to_string());
        assert!(!missing.ok);

        let saved = take_course_attendance(
            100,
            "M1A".to_string(),
            date.clone(),
            vec![AttendanceEntry {
                student_id: 103,
                status: "absent".to_string(),
            }],
        );
        assert!(saved.ok, "{}", saved.message);

        let submitted = submit_justification(
            103,
            "M1A".to_string(),
            date.clone(),
            " nota.pdf ".to_string(),
        );
        assert!(submitted.ok, "{}", submitted.message);
        let queued = pending_justifications(100);
        let item = queued
            .iter()
            .find(|item| item.student_id == 103 && item.date == date)
            .expect("submission should reach the teacher queue");
        assert_eq!(item.note.as_deref(), Some(" nota.pdf "));
        assert!(all_pending_justifications()
            .iter()
            .any(|item| item.student_id == 103 && item.date == date));

        let reviewed = review_justification(103, "M1A".to_string(), date.clone(), true);
        assert!(reviewed.ok, "{}", reviewed.message);
        assert!(!pending_justifications(100)
            .iter()
            .any(|item| item.student_id == 103 && item.date == date));
    }

    #[test]
    fn messaging_through_ffi() {
        assert!(!send_message(104, 201, "   ".to_string()).ok);
        let sent = send_message(104, 201, "hola".to_string());
        assert!(sent.ok, "{}", sent.message);
        assert!(sent.id.is_some());

        let items = inbox(201);
        assert!(items.iter().any(|item| item.partner_id == 104
            && item.partner_name == "Mateo Fernandez"
            && item.last_message_text == "hola"));
        let json = conversation_json(201, 104).expect("conversation should exist");
        assert!(json.contains("hola"));
    }

    #[test]
    fn avatar_and_calendar_through_ffi() {
        assert!(!update_avatar(4242, "https://i.pravatar.cc/150?u=z".to_string()).ok);
        assert!(update_avatar(102, "https://i.pravatar.cc/150?u=z".to_string()).ok);

        assert!(!add_custom_event(102, "  ".to_string(), "2024-12-01".to_string()).ok);
        assert!(add_custom_event(102, " Feria ".to_string(), "2024-12-01".to_string()).ok);
        let items = calendar(102);
        assert!(items
            .iter()
            .any(|item| item.title == " Feria " && item.kind == "custom"));
        assert!(items.windows(2).all(|pair| pair[0].date <= pair[1].date));
    }

    #[test]
    fn attendance_summary_reports_both_percentages() {
        let summary = attendance_summary(104);
        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].subject_id, "M1A");
        assert!(summary[0].credited_percentage >= summary[0].percentage);
        assert!(attendance_summary(100).is_empty());
    }

    #[test]
    fn appearance_switches_validate_ids() {
        assert!(!set_theme("neon".to_string()).is_empty());
        assert!(set_theme("oscuro".to_string()).is_empty());
        assert!(set_border_style("redondeado".to_string()).is_empty());

        let current = appearance();
        assert_eq!(current.theme, "oscuro");
        assert_eq!(current.border_style, "redondeado");
    }
}
