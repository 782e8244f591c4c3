use instituto_core::{
    AttendancePatch, AttendanceRecord, AttendanceStatus, InMemoryDataStore, JustificationStatus,
    User,
};

fn store() -> InMemoryDataStore {
    InMemoryDataStore::seeded().unwrap()
}

fn record(
    store: &InMemoryDataStore,
    student_id: u32,
    subject_id: &str,
    date: &str,
) -> Option<AttendanceRecord> {
    store.find_user_by_id(student_id).unwrap().and_then(|user| {
        user.subject(subject_id)
            .and_then(|s| s.record_for(date))
            .cloned()
    })
}

fn roster_student(store: &InMemoryDataStore, course_id: &str, student_id: u32) -> User {
    store
        .course_roster(100, course_id)
        .unwrap()
        .into_iter()
        .find(|user| user.id == student_id)
        .unwrap()
}

#[test]
fn status_update_converges_between_canonical_and_roster_views() {
    let store = store();

    for student_id in [101, 102, 103, 104] {
        let applied = store
            .update_student_data(student_id, "M1A", "2024-11-21", AttendanceStatus::Late)
            .unwrap();
        assert!(applied);

        let canonical = record(&store, student_id, "M1A", "2024-11-21").unwrap();
        assert_eq!(canonical.status, AttendanceStatus::Late);

        let roster = roster_student(&store, "M1A", student_id);
        let roster_record = roster.subject("M1A").unwrap().record_for("2024-11-21").unwrap();
        assert_eq!(roster_record, &canonical);
    }
}

#[test]
fn justification_only_patch_never_creates_rows() {
    let store = store();
    let before = store.find_user_by_id(101).unwrap().unwrap();

    let patch = AttendancePatch::justification(JustificationStatus::Pending, None);
    let applied = store
        .update_user_attendance(101, "M1A", "2024-11-28", &patch)
        .unwrap();

    assert!(!applied);
    assert!(record(&store, 101, "M1A", "2024-11-28").is_none());
    assert_eq!(store.find_user_by_id(101).unwrap().unwrap(), before);
}

#[test]
fn absent_patch_creates_exactly_one_row() {
    let store = store();
    let before_len = store
        .find_user_by_id(101)
        .unwrap()
        .unwrap()
        .subject("M1A")
        .unwrap()
        .attendance
        .len();

    let patch = AttendancePatch::status(AttendanceStatus::Absent);
    assert!(store.update_user_attendance(101, "M1A", "2024-11-28", &patch).unwrap());

    let user = store.find_user_by_id(101).unwrap().unwrap();
    let subject = user.subject("M1A").unwrap();
    assert_eq!(subject.attendance.len(), before_len + 1);
    let created = subject.attendance.last().unwrap();
    assert_eq!(created.date, "2024-11-28");
    assert_eq!(created.status, AttendanceStatus::Absent);
    assert_eq!(created.justification_status, None);
}

#[test]
fn unknown_ids_and_subjects_are_noops() {
    let store = store();
    let snapshot = store.users().unwrap();

    assert!(!store
        .update_student_data(999, "M1A", "2024-11-28", AttendanceStatus::Present)
        .unwrap());
    assert!(!store
        .update_student_data(101, "ZZZ", "2024-11-28", AttendanceStatus::Present)
        .unwrap());
    // Teachers have no subjects.
    assert!(!store
        .update_student_data(100, "M1A", "2024-11-28", AttendanceStatus::Present)
        .unwrap());

    assert_eq!(store.users().unwrap(), snapshot);
}

#[test]
fn submit_then_approve_justification() {
    let store = store();
    store
        .update_user_attendance(
            101,
            "M1A",
            "2024-11-14",
            &AttendancePatch {
                status: Some(AttendanceStatus::Absent),
                justification_status: Some(JustificationStatus::None),
                justification_note: None,
            },
        )
        .unwrap();

    assert!(store
        .submit_justification(101, "M1A", "2024-11-14", "note.pdf")
        .unwrap());
    let submitted = record(&store, 101, "M1A", "2024-11-14").unwrap();
    assert_eq!(submitted.status, AttendanceStatus::Absent);
    assert_eq!(
        submitted.justification_status,
        Some(JustificationStatus::Pending)
    );
    assert_eq!(submitted.justification_note.as_deref(), Some("note.pdf"));

    assert!(store
        .review_justification(101, "M1A", "2024-11-14", true)
        .unwrap());
    let approved = record(&store, 101, "M1A", "2024-11-14").unwrap();
    assert_eq!(approved.status, AttendanceStatus::Justified);
    assert_eq!(
        approved.justification_status,
        Some(JustificationStatus::Approved)
    );
    assert_eq!(approved.justification_note.as_deref(), Some("note.pdf"));
    assert!(store.pending_justifications().unwrap().is_empty());
}

#[test]
fn rejection_keeps_absent_status() {
    let store = store();

    assert!(store
        .review_justification(101, "M1A", "2024-11-14", false)
        .unwrap());

    let rejected = record(&store, 101, "M1A", "2024-11-14").unwrap();
    assert_eq!(rejected.status, AttendanceStatus::Absent);
    assert_eq!(
        rejected.justification_status,
        Some(JustificationStatus::Rejected)
    );
}

#[test]
fn submitting_without_a_record_is_a_noop() {
    let store = store();

    assert!(!store
        .submit_justification(103, "M1A", "2024-12-05", "certificado.pdf")
        .unwrap());
    assert!(record(&store, 103, "M1A", "2024-12-05").is_none());
    assert_eq!(store.pending_justifications().unwrap().len(), 1);
}

#[test]
fn new_submission_shows_up_in_teacher_queue() {
    let store = store();
    store
        .submit_justification(103, "M1A", "2024-11-07", "turno.pdf")
        .unwrap();

    let queue = store.pending_justifications_for_teacher(100).unwrap();
    let students = queue.iter().map(|entry| entry.student_id).collect::<Vec<_>>();
    assert_eq!(students, vec![101, 103]);
    assert!(store.pending_justifications_for_teacher(999).unwrap().is_empty());
}

#[test]
fn take_course_attendance_skips_students_off_roster() {
    let store = store();

    let changed = store
        .take_course_attendance(
            100,
            "F2B",
            "2024-11-15",
            &[
                (201, AttendanceStatus::Present),
                (202, AttendanceStatus::Absent),
                (101, AttendanceStatus::Absent),
            ],
        )
        .unwrap();

    assert_eq!(changed, 2);
    assert_eq!(
        record(&store, 202, "F2B", "2024-11-15").map(|r| r.status),
        Some(AttendanceStatus::Absent)
    );
    assert!(record(&store, 101, "F2B", "2024-11-15").is_none());

    let sheet = store.course_attendance_sheet(100, "F2B", "2024-11-15").unwrap();
    assert_eq!(sheet[0].status, AttendanceStatus::Present);
    assert_eq!(sheet[1].status, AttendanceStatus::Absent);
}

#[test]
fn take_course_attendance_for_unknown_course_changes_nothing() {
    let store = store();
    let snapshot = store.users().unwrap();

    let changed = store
        .take_course_attendance(100, "NOPE", "2024-11-15", &[(101, AttendanceStatus::Present)])
        .unwrap();

    assert_eq!(changed, 0);
    assert_eq!(store.users().unwrap(), snapshot);
}
