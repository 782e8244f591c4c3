//! Session data store: the single source of truth for users and
//! conversations.
//!
//! # Responsibility
//! - Expose lookups and the mutation use-cases views call into.
//! - Apply each mutation as one patch under one repository writer.
//!
//! # Invariants
//! - Unknown ids and missing preconditions are no-ops (`Ok(false)` /
//!   `Ok(None)`), never errors. Errors only carry storage failures.
//! - Course rosters are resolved against the canonical user table, so a
//!   mutation of the canonical record is visible through every roster.
//! - Attendance rows are created only by patches that carry a status.
//! - Date strings and free text are stored as given.

use crate::fixtures::{seed_conversations, seed_users};
use crate::model::academic::{AttendancePatch, AttendanceStatus, JustificationStatus};
use crate::model::conversation::{Conversation, Message};
use crate::model::user::{CustomEvent, NewCustomEvent, User, UserId};
use crate::repo::conversation_repo::{ConversationRepository, InMemoryConversationRepository};
use crate::repo::user_repo::{InMemoryUserRepository, RepoError, UserRepository};
use crate::service::queries::{
    calendar_events, conversation_summaries, pending_justifications,
    pending_justifications_for_teacher, CalendarEvent, ConversationSummary, PendingJustification,
};
use chrono::Utc;
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Repository-level failure.
    Repo(RepoError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// One roster row of the take-attendance sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceSheetEntry {
    pub student_id: UserId,
    pub student_name: String,
    /// Current status for the sheet date; `Pending` when no row exists.
    pub status: AttendanceStatus,
}

/// Store backed by fixture-seeded in-memory tables.
pub type InMemoryDataStore = DataStore<InMemoryUserRepository, InMemoryConversationRepository>;

/// Store facade over user and conversation repositories.
pub struct DataStore<U: UserRepository, C: ConversationRepository> {
    users: U,
    conversations: C,
}

impl InMemoryDataStore {
    /// Creates a store seeded with the demo fixtures.
    pub fn seeded() -> StoreResult<Self> {
        let users = InMemoryUserRepository::with_users(seed_users())?;
        let conversations =
            InMemoryConversationRepository::with_conversations(seed_conversations());
        info!("event=store_seed module=store status=ok");
        Ok(Self::new(users, conversations))
    }
}

impl<U: UserRepository, C: ConversationRepository> DataStore<U, C> {
    /// Creates a store over the provided repositories.
    pub fn new(users: U, conversations: C) -> Self {
        Self {
            users,
            conversations,
        }
    }

    /// Snapshot of every user in table order.
    pub fn users(&self) -> StoreResult<Vec<User>> {
        Ok(self.users.list_users()?)
    }

    /// Snapshot of every conversation.
    pub fn conversations(&self) -> StoreResult<Vec<Conversation>> {
        Ok(self.conversations.list_conversations()?)
    }

    pub fn find_user_by_id(&self, id: UserId) -> StoreResult<Option<User>> {
        Ok(self.users.get_user(id)?)
    }

    pub fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self.users.find_user_by_email(email)?)
    }

    /// Sets the avatar of `user_id`.
    ///
    /// Roster views resolve through the canonical record, so they observe
    /// the same avatar. Returns `false` for unknown users.
    pub fn update_user_avatar(&self, user_id: UserId, avatar_url: &str) -> StoreResult<bool> {
        let updated = self
            .users
            .update_user(user_id, |user| user.avatar = avatar_url.to_string())?
            .is_some();
        log_outcome("avatar_update", user_id, updated);
        Ok(updated)
    }

    /// Appends a custom calendar event with a fresh id.
    ///
    /// Returns the stored event, or `None` for unknown users.
    pub fn add_custom_event(
        &self,
        user_id: UserId,
        event: NewCustomEvent,
    ) -> StoreResult<Option<CustomEvent>> {
        let created = CustomEvent {
            id: new_id("evt"),
            title: event.title,
            date: event.date,
        };
        let stored = self.users.update_user(user_id, |user| {
            user.custom_events.push(created.clone());
            created
        })?;
        log_outcome("custom_event_add", user_id, stored.is_some());
        Ok(stored)
    }

    /// Merges `patch` into the attendance row of `(student_id, subject_id,
    /// date)`.
    ///
    /// A missing row is created only when the patch carries a status.
    /// Returns whether a row was changed or created; unknown students,
    /// teachers and unknown subjects are no-ops.
    pub fn update_user_attendance(
        &self,
        student_id: UserId,
        subject_id: &str,
        date: &str,
        patch: &AttendancePatch,
    ) -> StoreResult<bool> {
        let applied = self
            .users
            .update_user(student_id, |user| {
                user.subject_mut(subject_id)
                    .is_some_and(|subject| subject.apply_attendance_patch(date, patch))
            })?
            .unwrap_or(false);
        if applied {
            debug!(
                "event=attendance_update module=store status=ok student_id={} subject_id={} date={}",
                student_id, subject_id, date
            );
        } else {
            warn!(
                "event=attendance_update module=store status=noop student_id={} subject_id={} date={} has_status={}",
                student_id,
                subject_id,
                date,
                patch.status.is_some()
            );
        }
        Ok(applied)
    }

    /// Sets only the status of one attendance row.
    pub fn update_student_data(
        &self,
        student_id: UserId,
        subject_id: &str,
        date: &str,
        status: AttendanceStatus,
    ) -> StoreResult<bool> {
        self.update_user_attendance(student_id, subject_id, date, &AttendancePatch::status(status))
    }

    /// Marks an absence as waiting for review with the student's note.
    ///
    /// Never creates a row: without an existing record for `date` this is a
    /// no-op.
    pub fn submit_justification(
        &self,
        student_id: UserId,
        subject_id: &str,
        date: &str,
        note: &str,
    ) -> StoreResult<bool> {
        let patch =
            AttendancePatch::justification(JustificationStatus::Pending, Some(note.to_string()));
        self.update_user_attendance(student_id, subject_id, date, &patch)
    }

    /// Approves (status becomes `justified`) or rejects (status unchanged) a
    /// submitted justification.
    pub fn review_justification(
        &self,
        student_id: UserId,
        subject_id: &str,
        date: &str,
        approved: bool,
    ) -> StoreResult<bool> {
        let patch = if approved {
            AttendancePatch {
                status: Some(AttendanceStatus::Justified),
                justification_status: Some(JustificationStatus::Approved),
                justification_note: None,
            }
        } else {
            AttendancePatch::justification(JustificationStatus::Rejected, None)
        };
        self.update_user_attendance(student_id, subject_id, date, &patch)
    }

    /// Applies one teacher attendance sheet for `date` under one writer.
    ///
    /// Entries for students not on the course roster are skipped. Returns the
    /// number of rows changed or created.
    pub fn take_course_attendance(
        &self,
        teacher_id: UserId,
        course_id: &str,
        date: &str,
        entries: &[(UserId, AttendanceStatus)],
    ) -> StoreResult<usize> {
        let changed = self.users.update_users(|users| {
            let Some(roster) = users
                .iter()
                .find(|user| user.id == teacher_id)
                .and_then(|teacher| teacher.managed_course(course_id))
                .map(|course| course.student_ids.clone())
            else {
                return 0;
            };

            let mut changed: usize = 0;
            for (student_id, status) in entries {
                if !roster.contains(student_id) {
                    continue;
                }
                let patch = AttendancePatch::status(*status);
                let applied = users
                    .iter_mut()
                    .find(|user| user.id == *student_id)
                    .and_then(|student| student.subject_mut(course_id))
                    .is_some_and(|subject| subject.apply_attendance_patch(date, &patch));
                if applied {
                    changed += 1;
                }
            }
            changed
        })?;
        info!(
            "event=course_attendance module=store status=ok teacher_id={} course_id={} date={} entries={} changed={}",
            teacher_id,
            course_id,
            date,
            entries.len(),
            changed
        );
        Ok(changed)
    }

    /// Canonical records of the students on one course roster, in roster
    /// order. Ids that do not resolve are skipped.
    pub fn course_roster(&self, teacher_id: UserId, course_id: &str) -> StoreResult<Vec<User>> {
        let users = self.users.list_users()?;
        let Some(roster) = users
            .iter()
            .find(|user| user.id == teacher_id)
            .and_then(|teacher| teacher.managed_course(course_id))
        else {
            return Ok(Vec::new());
        };
        Ok(roster
            .student_ids
            .iter()
            .filter_map(|id| users.iter().find(|user| user.id == *id))
            .cloned()
            .collect())
    }

    /// Initial take-attendance sheet for one course and date.
    pub fn course_attendance_sheet(
        &self,
        teacher_id: UserId,
        course_id: &str,
        date: &str,
    ) -> StoreResult<Vec<AttendanceSheetEntry>> {
        Ok(self
            .course_roster(teacher_id, course_id)?
            .into_iter()
            .map(|student| AttendanceSheetEntry {
                status: student
                    .subject(course_id)
                    .and_then(|subject| subject.record_for(date))
                    .map_or(AttendanceStatus::Pending, |record| record.status),
                student_id: student.id,
                student_name: student.name,
            })
            .collect())
    }

    /// Sends `text` from `sender_id` to `receiver_id`.
    ///
    /// Appends to the pair's conversation in call order, creating it when the
    /// pair has none. Participant order does not matter for matching.
    pub fn add_message(
        &self,
        sender_id: UserId,
        receiver_id: UserId,
        text: &str,
    ) -> StoreResult<Message> {
        let message = Message {
            id: new_id("msg"),
            sender_id,
            text: text.to_string(),
            timestamp: Utc::now(),
        };
        let conversation_id = self.conversations.append_message(
            sender_id,
            receiver_id,
            message.clone(),
            || new_id("conv"),
        )?;
        debug!(
            "event=message_add module=store status=ok conversation_id={} sender_id={} receiver_id={}",
            conversation_id, sender_id, receiver_id
        );
        Ok(message)
    }

    /// Conversation for the unordered pair `{a, b}`.
    pub fn conversation_between(
        &self,
        a: UserId,
        b: UserId,
    ) -> StoreResult<Option<Conversation>> {
        Ok(self.conversations.find_between(a, b)?)
    }

    /// Inbox of `user_id`, dropping partners that do not resolve to a user.
    pub fn conversations_for(&self, user_id: UserId) -> StoreResult<Vec<ConversationSummary>> {
        let users = self.users.list_users()?;
        let conversations = self.conversations.list_conversations()?;
        Ok(conversation_summaries(&conversations, user_id)
            .into_iter()
            .filter(|summary| users.iter().any(|user| user.id == summary.partner_id))
            .collect())
    }

    /// Every pending justification in the store.
    pub fn pending_justifications(&self) -> StoreResult<Vec<PendingJustification>> {
        Ok(pending_justifications(&self.users.list_users()?))
    }

    /// Pending justifications of one teacher's roster students.
    pub fn pending_justifications_for_teacher(
        &self,
        teacher_id: UserId,
    ) -> StoreResult<Vec<PendingJustification>> {
        let users = self.users.list_users()?;
        Ok(users
            .iter()
            .find(|user| user.id == teacher_id)
            .map(|teacher| pending_justifications_for_teacher(&users, teacher))
            .unwrap_or_default())
    }

    /// Merged calendar of `user_id`; empty for unknown users.
    pub fn calendar_events_for(&self, user_id: UserId) -> StoreResult<Vec<CalendarEvent>> {
        let users = self.users.list_users()?;
        Ok(users
            .iter()
            .find(|user| user.id == user_id)
            .map(|user| calendar_events(&users, user))
            .unwrap_or_default())
    }
}

fn new_id(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4())
}

fn log_outcome(event: &str, user_id: UserId, applied: bool) {
    if applied {
        debug!("event={event} module=store status=ok user_id={user_id}");
    } else {
        warn!("event={event} module=store status=noop reason=unknown_user user_id={user_id}");
    }
}
