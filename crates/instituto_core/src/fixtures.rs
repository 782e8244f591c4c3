//! Seed data loaded at process start.
//!
//! # Responsibility
//! - Provide the demo accounts, courses and conversations of one session.
//!
//! # Invariants
//! - User ids are unique across `seed_users()`.
//! - Every roster id in a seeded course resolves to a seeded student.
//! - The two login accounts use `STUDENT_LOGIN_EMAIL` and
//!   `TEACHER_LOGIN_EMAIL`.

use crate::model::academic::{
    AttendanceRecord, AttendanceStatus, Course, JustificationStatus, PartialGrade, Subject,
};
use crate::model::conversation::{Conversation, Message};
use crate::model::user::{StudentProfile, TeacherProfile, User, UserId, UserProfile};
use chrono::{DateTime, NaiveDate, Utc};

/// Email of the account used by the student login button.
pub const STUDENT_LOGIN_EMAIL: &str = "alumno@test.com";
/// Email of the account used by the teacher login button.
pub const TEACHER_LOGIN_EMAIL: &str = "preceptor@test.com";

/// Avatars offered by the profile picture picker.
pub const SAMPLE_AVATARS: &[&str] = &[
    "https://i.pravatar.cc/150?u=a",
    "https://i.pravatar.cc/150?u=b",
    "https://i.pravatar.cc/150?u=c",
    "https://i.pravatar.cc/150?u=d",
    "https://i.pravatar.cc/150?u=e",
    "https://i.pravatar.cc/150?u=f",
    "https://i.pravatar.cc/150?u=g",
    "https://i.pravatar.cc/150?u=h",
];

const MATH_TEACHER: &str = "Profesora Julieta";
const MATH_SCHEDULE: &str = "Jueves 09:00 AM";
const PHYSICS_TEACHER: &str = "Profesor Ricardo";
const PHYSICS_SCHEDULE: &str = "Viernes 11:00 AM";

/// Returns every seeded user in table order.
pub fn seed_users() -> Vec<User> {
    let mut users = vec![login_student(), login_teacher()];
    users.extend(math_students());
    users.extend(physics_students());
    users
}

/// Returns the seeded conversations.
pub fn seed_conversations() -> Vec<Conversation> {
    vec![
        Conversation {
            id: "conv1".to_string(),
            participant_ids: [100, 101],
            messages: vec![
                message(
                    "msg1",
                    101,
                    "Hola profe, ¿puedo justificar la falta de la semana pasada?",
                    utc(2024, 11, 18, 10, 0),
                ),
                message(
                    "msg2",
                    100,
                    "Hola Lautaro. Sí, por favor tráeme el certificado médico.",
                    utc(2024, 11, 18, 10, 5),
                ),
            ],
        },
        Conversation {
            id: "conv2".to_string(),
            participant_ids: [100, 102],
            messages: vec![message(
                "msg3",
                100,
                "Sofia, recordá que mañana es la entrega del trabajo práctico.",
                utc(2024, 11, 19, 15, 30),
            )],
        },
        Conversation {
            id: "conv3".to_string(),
            participant_ids: [100, 1],
            messages: vec![message(
                "msg4",
                1,
                "Hola, quería saber la nota del último parcial.",
                utc(2024, 11, 20, 9, 0),
            )],
        },
    ]
}

fn login_student() -> User {
    student(
        1,
        "Lautaro",
        STUDENT_LOGIN_EMAIL,
        "lautaro",
        None,
        vec![
            subject(
                ("M1", "Matemáticas", "Julieta Martinez"),
                (MATH_SCHEDULE, "Aula 2B"),
                vec![
                    record("2024-11-07", AttendanceStatus::Present),
                    record("2024-10-31", AttendanceStatus::Present),
                    unjustified_absence("2024-10-24"),
                    record("2024-10-17", AttendanceStatus::Present),
                ],
                vec![
                    PartialGrade::new("Parcial 1", "2024-10-15", Some(8.0)),
                    PartialGrade::new("Parcial 2", "2024-11-20", None),
                ],
                true,
            ),
            subject(
                ("P1", "Física", "Ricardo Gomez"),
                (PHYSICS_SCHEDULE, "Aula 3A"),
                vec![
                    record("2024-11-08", AttendanceStatus::Present),
                    record("2024-11-01", AttendanceStatus::Present),
                    record("2024-10-25", AttendanceStatus::Present),
                    record("2024-10-18", AttendanceStatus::Present),
                ],
                vec![
                    PartialGrade::new("Parcial 1", "2024-10-20", Some(7.0)),
                    PartialGrade::new("Parcial 2", "2024-11-22", None),
                ],
                false,
            ),
            subject(
                ("Q1", "Química", "Ana Lopez"),
                ("Lunes 08:00 AM", "Laboratorio 1"),
                Vec::new(),
                Vec::new(),
                false,
            ),
        ],
    )
}

fn login_teacher() -> User {
    User {
        id: 100,
        name: "Julieta".to_string(),
        email: TEACHER_LOGIN_EMAIL.to_string(),
        avatar: avatar_url("julieta"),
        custom_events: Vec::new(),
        profile: UserProfile::Teacher(TeacherProfile {
            managed_courses: vec![
                Course {
                    id: "M1A".to_string(),
                    name: "1er Año A - Matemáticas".to_string(),
                    schedule: MATH_SCHEDULE.to_string(),
                    classroom: "Aula 2B".to_string(),
                    student_ids: vec![101, 102, 103, 104],
                },
                Course {
                    id: "F2B".to_string(),
                    name: "2do Año B - Física".to_string(),
                    schedule: PHYSICS_SCHEDULE.to_string(),
                    classroom: "Aula 3A".to_string(),
                    student_ids: vec![201, 202],
                },
            ],
        }),
    }
}

fn math_students() -> Vec<User> {
    let mut pending_absence = record("2024-11-14", AttendanceStatus::Absent);
    pending_absence.justification_status = Some(JustificationStatus::Pending);
    pending_absence.justification_note = Some("Certificado Medico.pdf".to_string());

    let mut approved_absence = record("2024-11-14", AttendanceStatus::Justified);
    approved_absence.justification_status = Some(JustificationStatus::Approved);

    vec![
        student(
            101,
            "Lautaro Perez",
            "lautaro@test.com",
            "lautaro",
            Some("12346"),
            vec![
                math_subject(
                    vec![record("2024-11-07", AttendanceStatus::Present), pending_absence],
                    8.0,
                    true,
                ),
                physics_subject(
                    vec![record("2024-11-08", AttendanceStatus::Present)],
                    7.0,
                    false,
                ),
            ],
        ),
        student(
            102,
            "Sofia Rodriguez",
            "sofia@test.com",
            "sofia",
            Some("12346"),
            vec![
                math_subject(
                    vec![
                        record("2024-11-07", AttendanceStatus::Present),
                        record("2024-11-14", AttendanceStatus::Present),
                    ],
                    9.0,
                    true,
                ),
                subject(
                    ("H3C", "Historia", "Profesor Suarez"),
                    ("Lunes 08:00 AM", "Aula 1C"),
                    vec![record("2024-11-04", AttendanceStatus::Late)],
                    vec![PartialGrade::new("Parcial 1", "2024-10-14", Some(10.0))],
                    true,
                ),
            ],
        ),
        student(
            103,
            "Martina Gomez",
            "martina@test.com",
            "martina",
            Some("12347"),
            vec![math_subject(
                vec![
                    unjustified_absence("2024-11-07"),
                    unjustified_absence("2024-11-14"),
                ],
                4.0,
                false,
            )],
        ),
        student(
            104,
            "Mateo Fernandez",
            "mateo@test.com",
            "mateo",
            Some("12349"),
            vec![math_subject(
                vec![record("2024-11-07", AttendanceStatus::Present), approved_absence],
                6.0,
                true,
            )],
        ),
    ]
}

fn physics_students() -> Vec<User> {
    vec![
        student(
            201,
            "Valentina Sanchez",
            "valentina@test.com",
            "valentina",
            Some("22345"),
            vec![
                physics_subject(
                    vec![record("2024-11-08", AttendanceStatus::Present)],
                    9.0,
                    true,
                ),
                subject(
                    ("Q2C", "Química", "Profesora Ana"),
                    ("Martes 10:00 AM", "Lab 2"),
                    vec![record("2024-11-05", AttendanceStatus::Present)],
                    vec![PartialGrade::new("Parcial 1", "2024-10-15", Some(8.0))],
                    false,
                ),
            ],
        ),
        student(
            202,
            "Matias Rodriguez",
            "matias@test.com",
            "matias",
            Some("22346"),
            vec![physics_subject(
                vec![record("2024-11-08", AttendanceStatus::Late)],
                5.0,
                false,
            )],
        ),
    ]
}

fn math_subject(attendance: Vec<AttendanceRecord>, grade: f64, final_exam: bool) -> Subject {
    subject(
        ("M1A", "Matemáticas", MATH_TEACHER),
        (MATH_SCHEDULE, "Aula 2B"),
        attendance,
        vec![PartialGrade::new("Parcial 1", "2024-10-15", Some(grade))],
        final_exam,
    )
}

fn physics_subject(attendance: Vec<AttendanceRecord>, grade: f64, final_exam: bool) -> Subject {
    subject(
        ("F2B", "Física", PHYSICS_TEACHER),
        (PHYSICS_SCHEDULE, "Aula 3A"),
        attendance,
        vec![PartialGrade::new("Parcial 1", "2024-10-18", Some(grade))],
        final_exam,
    )
}

fn student(
    id: UserId,
    name: &str,
    email: &str,
    avatar_seed: &str,
    student_id: Option<&str>,
    subjects: Vec<Subject>,
) -> User {
    User {
        id,
        name: name.to_string(),
        email: email.to_string(),
        avatar: avatar_url(avatar_seed),
        custom_events: Vec::new(),
        profile: UserProfile::Student(StudentProfile {
            subjects,
            student_id: student_id.map(str::to_string),
        }),
    }
}

fn subject(
    (id, name, teacher): (&str, &str, &str),
    (schedule, classroom): (&str, &str),
    attendance: Vec<AttendanceRecord>,
    partials: Vec<PartialGrade>,
    is_registered_for_final: bool,
) -> Subject {
    Subject {
        id: id.to_string(),
        name: name.to_string(),
        teacher: teacher.to_string(),
        schedule: schedule.to_string(),
        classroom: classroom.to_string(),
        attendance,
        partials,
        is_registered_for_final,
    }
}

fn record(date: &str, status: AttendanceStatus) -> AttendanceRecord {
    AttendanceRecord::new(date, status)
}

fn unjustified_absence(date: &str) -> AttendanceRecord {
    let mut absence = record(date, AttendanceStatus::Absent);
    absence.justification_status = Some(JustificationStatus::None);
    absence
}

fn avatar_url(seed: &str) -> String {
    format!("https://i.pravatar.cc/150?u={seed}")
}

fn message(id: &str, sender_id: UserId, text: &str, timestamp: DateTime<Utc>) -> Message {
    Message {
        id: id.to_string(),
        sender_id,
        text: text.to_string(),
        timestamp,
    }
}

fn utc(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    // Seed constants are valid calendar values; the epoch fallback is unreachable.
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, 0))
        .map(|naive| naive.and_utc())
        .unwrap_or_default()
}
