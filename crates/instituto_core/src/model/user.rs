//! User domain model.
//!
//! # Responsibility
//! - Define the canonical user record shared by both roles.
//! - Keep role-specific data in one tagged `UserProfile`.
//!
//! # Invariants
//! - `id` is unique across the user table and never reused.
//! - Custom events are append-only during a session.

use crate::model::academic::{Course, Subject};
use serde::{Deserialize, Serialize};

/// Stable numeric user identifier.
pub type UserId = u32;

/// Role discriminant for a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Student,
    Teacher,
}

impl UserRole {
    /// Stable wire id.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Teacher => "teacher",
        }
    }

    /// Parses one role from its wire id, ignoring case and padding.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "student" => Some(Self::Student),
            "teacher" => Some(Self::Teacher),
            _ => None,
        }
    }
}

/// User-authored calendar entry, distinct from academic events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomEvent {
    pub id: String,
    pub title: String,
    /// Calendar day, `YYYY-MM-DD` by convention.
    pub date: String,
}

/// Input for creating a custom event; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCustomEvent {
    pub title: String,
    pub date: String,
}

/// Student-only data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentProfile {
    /// Enrolled subjects in display order.
    #[serde(default)]
    pub subjects: Vec<Subject>,
    /// Legajo: the institution's external student record number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
}

/// Teacher-only data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeacherProfile {
    #[serde(default)]
    pub managed_courses: Vec<Course>,
}

/// Role-specific payload, serialized with a `role` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum UserProfile {
    Student(StudentProfile),
    Teacher(TeacherProfile),
}

/// Canonical user record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    /// Avatar image URL.
    pub avatar: String,
    #[serde(default)]
    pub custom_events: Vec<CustomEvent>,
    #[serde(flatten)]
    pub profile: UserProfile,
}

impl User {
    /// Returns the role derived from the profile variant.
    pub fn role(&self) -> UserRole {
        match self.profile {
            UserProfile::Student(_) => UserRole::Student,
            UserProfile::Teacher(_) => UserRole::Teacher,
        }
    }

    pub fn as_student(&self) -> Option<&StudentProfile> {
        match &self.profile {
            UserProfile::Student(profile) => Some(profile),
            UserProfile::Teacher(_) => None,
        }
    }

    pub fn as_student_mut(&mut self) -> Option<&mut StudentProfile> {
        match &mut self.profile {
            UserProfile::Student(profile) => Some(profile),
            UserProfile::Teacher(_) => None,
        }
    }

    pub fn as_teacher(&self) -> Option<&TeacherProfile> {
        match &self.profile {
            UserProfile::Teacher(profile) => Some(profile),
            UserProfile::Student(_) => None,
        }
    }

    /// Returns the enrolled subject with `subject_id`, students only.
    pub fn subject(&self, subject_id: &str) -> Option<&Subject> {
        self.as_student()?
            .subjects
            .iter()
            .find(|subject| subject.id == subject_id)
    }

    /// Mutable variant of [`User::subject`].
    pub fn subject_mut(&mut self, subject_id: &str) -> Option<&mut Subject> {
        self.as_student_mut()?
            .subjects
            .iter_mut()
            .find(|subject| subject.id == subject_id)
    }

    /// Returns the managed course with `course_id`, teachers only.
    pub fn managed_course(&self, course_id: &str) -> Option<&Course> {
        self.as_teacher()?
            .managed_courses
            .iter()
            .find(|course| course.id == course_id)
    }
}
