//! Academic domain model: subjects, courses, attendance and partial grades.
//!
//! # Responsibility
//! - Define the student-centric (`Subject`) and teacher-centric (`Course`)
//!   views of one course offering.
//! - Own the sparse-patch merge rules for attendance rows.
//!
//! # Invariants
//! - A subject holds at most one `AttendanceRecord` per `date`.
//! - A patch without `status` never creates a new attendance row.
//! - `Course` rosters hold user ids only; student data is resolved against
//!   the canonical user table at read time.

use crate::model::user::UserId;
use serde::{Deserialize, Serialize};

/// Attendance outcome for one class day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    Present,
    Absent,
    /// Absence covered by an approved justification.
    Justified,
    /// Not taken yet.
    Pending,
    Late,
}

impl AttendanceStatus {
    /// Stable wire id.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Absent => "absent",
            Self::Justified => "justified",
            Self::Pending => "pending",
            Self::Late => "late",
        }
    }

    /// User-facing label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Present => "Presente",
            Self::Absent => "Ausente",
            Self::Justified => "Justificado",
            Self::Pending => "Pendiente",
            Self::Late => "Tarde",
        }
    }

    /// Parses one status from its wire id.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "present" => Some(Self::Present),
            "absent" => Some(Self::Absent),
            "justified" => Some(Self::Justified),
            "pending" => Some(Self::Pending),
            "late" => Some(Self::Late),
            _ => None,
        }
    }
}

/// Review state of a justification attached to an absence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JustificationStatus {
    None,
    Pending,
    Approved,
    Rejected,
}

impl JustificationStatus {
    /// Stable wire id.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

/// One attendance row for a (student, subject, date) triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// Calendar day, `YYYY-MM-DD` by convention. Not validated.
    pub date: String,
    pub status: AttendanceStatus,
    /// Meaningful when `status` is `Absent`, or `Approved` with `Justified`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub justification_status: Option<JustificationStatus>,
    /// Free-text note or attachment name submitted by the student.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub justification_note: Option<String>,
}

impl AttendanceRecord {
    /// Creates a plain record with no justification state.
    pub fn new(date: impl Into<String>, status: AttendanceStatus) -> Self {
        Self {
            date: date.into(),
            status,
            justification_status: None,
            justification_note: None,
        }
    }

    /// Builds a new row from a patch.
    ///
    /// Returns `None` when the patch carries no `status`: justification-only
    /// patches must never synthesize attendance rows.
    pub fn from_patch(date: impl Into<String>, patch: &AttendancePatch) -> Option<Self> {
        let status = patch.status?;
        let mut record = Self::new(date, status);
        record.apply_patch(patch);
        Some(record)
    }

    /// Field-level merge: only fields present in `patch` are overwritten.
    pub fn apply_patch(&mut self, patch: &AttendancePatch) {
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(justification_status) = patch.justification_status {
            self.justification_status = Some(justification_status);
        }
        if let Some(note) = &patch.justification_note {
            self.justification_note = Some(note.clone());
        }
    }
}

/// Sparse update for one attendance row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttendancePatch {
    pub status: Option<AttendanceStatus>,
    pub justification_status: Option<JustificationStatus>,
    pub justification_note: Option<String>,
}

impl AttendancePatch {
    /// Patch that only sets `status`.
    pub fn status(status: AttendanceStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Patch that only sets the justification fields.
    pub fn justification(
        justification_status: JustificationStatus,
        note: Option<String>,
    ) -> Self {
        Self {
            status: None,
            justification_status: Some(justification_status),
            justification_note: note,
        }
    }

}

/// In-term assessment. `grade` stays `None` until graded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartialGrade {
    pub name: String,
    pub date: String,
    pub grade: Option<f64>,
}

impl PartialGrade {
    pub fn new(name: impl Into<String>, date: impl Into<String>, grade: Option<f64>) -> Self {
        Self {
            name: name.into(),
            date: date.into(),
            grade,
        }
    }
}

/// A course offering from the enrolled student's point of view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub id: String,
    pub name: String,
    /// Display name of the teacher in charge.
    pub teacher: String,
    pub schedule: String,
    pub classroom: String,
    /// Ordered by insertion; new rows are appended.
    #[serde(default)]
    pub attendance: Vec<AttendanceRecord>,
    #[serde(default)]
    pub partials: Vec<PartialGrade>,
    #[serde(default)]
    pub is_registered_for_final: bool,
}

impl Subject {
    /// Returns the attendance row for `date`, if any.
    pub fn record_for(&self, date: &str) -> Option<&AttendanceRecord> {
        self.attendance.iter().find(|record| record.date == date)
    }

    /// Merges `patch` into the row for `date`, or appends a new row when the
    /// patch carries a status.
    ///
    /// Returns whether a row was changed or created.
    pub fn apply_attendance_patch(&mut self, date: &str, patch: &AttendancePatch) -> bool {
        if let Some(record) = self.attendance.iter_mut().find(|record| record.date == date) {
            record.apply_patch(patch);
            return true;
        }
        match AttendanceRecord::from_patch(date, patch) {
            Some(record) => {
                self.attendance.push(record);
                true
            }
            None => false,
        }
    }
}

/// A teacher-managed group of students taking one offering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    /// Shares its id with the matching `Subject` of enrolled students.
    pub id: String,
    pub name: String,
    pub schedule: String,
    pub classroom: String,
    /// Roster as references into the canonical user table.
    #[serde(default)]
    pub student_ids: Vec<UserId>,
}

impl Course {
    /// Returns whether `user_id` is on the roster.
    pub fn has_student(&self, user_id: UserId) -> bool {
        self.student_ids.contains(&user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::{AttendancePatch, AttendanceRecord, AttendanceStatus, JustificationStatus, Subject};

    fn subject() -> Subject {
        Subject {
            id: "M1A".to_string(),
            name: "Matemáticas".to_string(),
            teacher: "Profesora Julieta".to_string(),
            schedule: "Jueves 09:00 AM".to_string(),
            classroom: "Aula 2B".to_string(),
            attendance: vec![AttendanceRecord::new("2024-11-07", AttendanceStatus::Present)],
            partials: Vec::new(),
            is_registered_for_final: true,
        }
    }

    #[test]
    fn patch_merges_only_provided_fields() {
        let mut record = AttendanceRecord::new("2024-11-14", AttendanceStatus::Absent);
        record.justification_note = Some("old.pdf".to_string());

        record.apply_patch(&AttendancePatch::justification(
            JustificationStatus::Rejected,
            None,
        ));

        assert_eq!(record.status, AttendanceStatus::Absent);
        assert_eq!(
            record.justification_status,
            Some(JustificationStatus::Rejected)
        );
        assert_eq!(record.justification_note.as_deref(), Some("old.pdf"));
    }

    #[test]
    fn justification_only_patch_does_not_create_rows() {
        let mut subject = subject();
        let patch = AttendancePatch::justification(
            JustificationStatus::Pending,
            Some("note.pdf".to_string()),
        );

        assert!(!subject.apply_attendance_patch("2024-11-21", &patch));
        assert_eq!(subject.attendance.len(), 1);
    }

    #[test]
    fn status_patch_creates_exactly_one_row() {
        let mut subject = subject();
        let patch = AttendancePatch::status(AttendanceStatus::Absent);

        assert!(subject.apply_attendance_patch("2024-11-21", &patch));
        assert!(subject.apply_attendance_patch("2024-11-21", &patch));

        let rows = subject
            .attendance
            .iter()
            .filter(|record| record.date == "2024-11-21")
            .count();
        assert_eq!(rows, 1);
        assert_eq!(
            subject.record_for("2024-11-21").map(|record| record.status),
            Some(AttendanceStatus::Absent)
        );
    }

    #[test]
    fn status_parse_matches_wire_ids() {
        for status in [
            AttendanceStatus::Present,
            AttendanceStatus::Absent,
            AttendanceStatus::Justified,
            AttendanceStatus::Pending,
            AttendanceStatus::Late,
        ] {
            assert_eq!(AttendanceStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(AttendanceStatus::parse("tardy"), None);
    }
}
