//! Read-side derivations consumed by dashboards, inboxes and calendars.
//!
//! # Responsibility
//! - Compute attendance percentages, justification queues, conversation
//!   summaries and calendar timelines from snapshots.
//!
//! # Invariants
//! - Functions are pure: they never mutate their inputs and are recomputed
//!   on every read.
//! - Percentages are whole numbers in `0..=100`, rounding half up; an empty
//!   record list counts as 100.

use crate::model::academic::{
    AttendanceRecord, AttendanceStatus, JustificationStatus, PartialGrade, Subject,
};
use crate::model::conversation::{Conversation, Message};
use crate::model::user::{User, UserId};
use chrono::{Datelike, NaiveDate};
use log::warn;
use std::collections::HashSet;

const CALENDAR_DATE_FORMAT: &str = "%Y-%m-%d";

/// Attendance row waiting for teacher review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingJustification {
    pub student_id: UserId,
    pub student_name: String,
    pub subject_id: String,
    pub subject_name: String,
    pub record: AttendanceRecord,
}

/// Attendance row with a justification state, tagged with its subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JustificationEntry {
    pub subject_name: String,
    pub record: AttendanceRecord,
}

/// Partial exam with no grade yet.
#[derive(Debug, Clone, PartialEq)]
pub struct UngradedPartial {
    pub subject_name: String,
    pub partial: PartialGrade,
}

/// Inbox row for one conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationSummary {
    pub conversation_id: String,
    pub partner_id: UserId,
    pub last_message: Message,
}

/// Origin of a calendar entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarEventKind {
    /// Derived from a partial exam date.
    Academic,
    /// Authored by the user.
    Custom,
}

/// One entry of the merged calendar timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    pub date: NaiveDate,
    pub title: String,
    pub kind: CalendarEventKind,
}

/// Share of `present` rows in one subject.
pub fn attendance_percentage(subject: &Subject) -> u32 {
    let present = count_with_status(&subject.attendance, &[AttendanceStatus::Present]);
    rounded_percentage(present, subject.attendance.len())
}

/// Share of rows counting as attended (`present` or `justified`).
pub fn credited_attendance_percentage(subject: &Subject) -> u32 {
    let credited = count_with_status(
        &subject.attendance,
        &[AttendanceStatus::Present, AttendanceStatus::Justified],
    );
    rounded_percentage(credited, subject.attendance.len())
}

/// Share of `present` rows across every subject of a student.
///
/// Teachers have no attendance and report 100.
pub fn overall_attendance_percentage(user: &User) -> u32 {
    let Some(student) = user.as_student() else {
        return 100;
    };
    let (present, total) = student
        .subjects
        .iter()
        .fold((0, 0), |(present, total), subject| {
            (
                present + count_with_status(&subject.attendance, &[AttendanceStatus::Present]),
                total + subject.attendance.len(),
            )
        });
    rounded_percentage(present, total)
}

/// Every pending justification in the user table, in table, subject and
/// record order.
pub fn pending_justifications(users: &[User]) -> Vec<PendingJustification> {
    users.iter().flat_map(pending_for_student).collect()
}

/// Pending justifications of the students on `teacher`'s rosters.
///
/// Students listed in several courses are visited once; roster ids are
/// resolved against `users`, never against stale copies.
pub fn pending_justifications_for_teacher(
    users: &[User],
    teacher: &User,
) -> Vec<PendingJustification> {
    let Some(profile) = teacher.as_teacher() else {
        return Vec::new();
    };
    let mut seen = HashSet::new();
    profile
        .managed_courses
        .iter()
        .flat_map(|course| course.student_ids.iter().copied())
        .filter(|id| seen.insert(*id))
        .filter_map(|id| users.iter().find(|user| user.id == id))
        .flat_map(pending_for_student)
        .collect()
}

/// Justification history of a student, newest date first.
pub fn justification_history(user: &User) -> Vec<JustificationEntry> {
    let Some(student) = user.as_student() else {
        return Vec::new();
    };
    let mut entries = student
        .subjects
        .iter()
        .flat_map(|subject| {
            subject
                .attendance
                .iter()
                .filter(|record| {
                    record
                        .justification_status
                        .is_some_and(|status| status != JustificationStatus::None)
                })
                .map(|record| JustificationEntry {
                    subject_name: subject.name.clone(),
                    record: record.clone(),
                })
        })
        .collect::<Vec<_>>();
    // `YYYY-MM-DD` orders lexicographically.
    entries.sort_by(|a, b| b.record.date.cmp(&a.record.date));
    entries
}

/// Partials still waiting for a grade, in subject order.
pub fn ungraded_partials(user: &User) -> Vec<UngradedPartial> {
    let Some(student) = user.as_student() else {
        return Vec::new();
    };
    student
        .subjects
        .iter()
        .flat_map(|subject| {
            subject
                .partials
                .iter()
                .filter(|partial| partial.grade.is_none())
                .map(|partial| UngradedPartial {
                    subject_name: subject.name.clone(),
                    partial: partial.clone(),
                })
        })
        .collect()
}

/// The other participant of a two-party conversation.
pub fn conversation_partner(conversation: &Conversation, user_id: UserId) -> Option<UserId> {
    conversation.partner_of(user_id)
}

/// Inbox for `user_id`: conversations with at least one message, newest
/// last message first.
pub fn conversation_summaries(
    conversations: &[Conversation],
    user_id: UserId,
) -> Vec<ConversationSummary> {
    let mut summaries = conversations
        .iter()
        .filter_map(|conversation| {
            let partner_id = conversation_partner(conversation, user_id)?;
            let last_message = conversation.last_message()?.clone();
            Some(ConversationSummary {
                conversation_id: conversation.id.clone(),
                partner_id,
                last_message,
            })
        })
        .collect::<Vec<_>>();
    summaries.sort_by(|a, b| b.last_message.timestamp.cmp(&a.last_message.timestamp));
    summaries
}

/// Merged calendar of `user`: academic events followed by custom events,
/// then stably sorted by date.
///
/// Students see every partial of every subject. Teachers see the distinct
/// partials that roster students hold in subjects matching a managed course.
/// Entries whose date is not `YYYY-MM-DD` are skipped.
pub fn calendar_events(users: &[User], user: &User) -> Vec<CalendarEvent> {
    let mut titled = Vec::new();
    if let Some(student) = user.as_student() {
        for subject in &student.subjects {
            for partial in &subject.partials {
                titled.push((
                    partial.date.as_str(),
                    format!("{} - {}", partial.name, subject.name),
                    CalendarEventKind::Academic,
                ));
            }
        }
    }
    if let Some(teacher) = user.as_teacher() {
        let mut seen = HashSet::new();
        for course in &teacher.managed_courses {
            let subjects = course
                .student_ids
                .iter()
                .filter_map(|id| users.iter().find(|candidate| candidate.id == *id))
                .filter_map(|student| student.subject(&course.id));
            for subject in subjects {
                for partial in &subject.partials {
                    let key = (
                        course.id.as_str(),
                        partial.name.as_str(),
                        partial.date.as_str(),
                    );
                    if !seen.insert(key) {
                        continue;
                    }
                    titled.push((
                        partial.date.as_str(),
                        format!("{} - {}", partial.name, subject.name),
                        CalendarEventKind::Academic,
                    ));
                }
            }
        }
    }
    for event in &user.custom_events {
        titled.push((event.date.as_str(), event.title.clone(), CalendarEventKind::Custom));
    }

    let mut events = titled
        .into_iter()
        .filter_map(|(date, title, kind)| {
            match NaiveDate::parse_from_str(date, CALENDAR_DATE_FORMAT) {
                Ok(date) => Some(CalendarEvent { date, title, kind }),
                Err(_) => {
                    warn!(
                        "event=calendar_skip module=queries status=invalid_date user_id={} date={}",
                        user.id, date
                    );
                    None
                }
            }
        })
        .collect::<Vec<_>>();
    events.sort_by_key(|event| event.date);
    events
}

/// Events falling on `day`.
pub fn events_on(events: &[CalendarEvent], day: NaiveDate) -> Vec<CalendarEvent> {
    events
        .iter()
        .filter(|event| event.date == day)
        .cloned()
        .collect()
}

/// Events in `year`/`month` that are not before `today`, soonest first.
pub fn upcoming_events(
    events: &[CalendarEvent],
    today: NaiveDate,
    year: i32,
    month: u32,
) -> Vec<CalendarEvent> {
    let mut upcoming = events
        .iter()
        .filter(|event| {
            event.date.year() == year && event.date.month() == month && event.date >= today
        })
        .cloned()
        .collect::<Vec<_>>();
    upcoming.sort_by_key(|event| event.date);
    upcoming
}

fn pending_for_student(user: &User) -> Vec<PendingJustification> {
    let Some(student) = user.as_student() else {
        return Vec::new();
    };
    student
        .subjects
        .iter()
        .flat_map(|subject| {
            subject
                .attendance
                .iter()
                .filter(|record| record.justification_status == Some(JustificationStatus::Pending))
                .map(|record| PendingJustification {
                    student_id: user.id,
                    student_name: user.name.clone(),
                    subject_id: subject.id.clone(),
                    subject_name: subject.name.clone(),
                    record: record.clone(),
                })
        })
        .collect()
}

fn count_with_status(records: &[AttendanceRecord], statuses: &[AttendanceStatus]) -> usize {
    records
        .iter()
        .filter(|record| statuses.contains(&record.status))
        .count()
}

fn rounded_percentage(count: usize, total: usize) -> u32 {
    if total == 0 {
        return 100;
    }
    let rounded = (count * 200 + total) / (total * 2);
    u32::try_from(rounded).unwrap_or(100)
}
