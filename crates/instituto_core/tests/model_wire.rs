use instituto_core::fixtures::{seed_conversations, seed_users};
use instituto_core::{AttendanceStatus, JustificationStatus, PartialGrade, User, UserRole};

#[test]
fn student_serializes_with_role_tag_and_snake_case_enums() {
    let users = seed_users();
    let lautaro = users.iter().find(|user| user.id == 101).unwrap();

    let json = serde_json::to_value(lautaro).unwrap();
    assert_eq!(json["role"], "student");
    assert_eq!(json["student_id"], "12346");
    assert_eq!(json["subjects"][0]["id"], "M1A");

    let pending = &json["subjects"][0]["attendance"][1];
    assert_eq!(pending["status"], "absent");
    assert_eq!(pending["justification_status"], "pending");
    assert_eq!(pending["justification_note"], "Certificado Medico.pdf");

    let present = &json["subjects"][0]["attendance"][0];
    assert!(present.get("justification_status").is_none());

    let decoded: User = serde_json::from_value(json).unwrap();
    assert_eq!(&decoded, lautaro);
}

#[test]
fn teacher_roster_serializes_as_ids() {
    let users = seed_users();
    let teacher = users.iter().find(|user| user.role() == UserRole::Teacher).unwrap();

    let json = serde_json::to_value(teacher).unwrap();
    assert_eq!(json["role"], "teacher");
    assert_eq!(
        json["managed_courses"][0]["student_ids"],
        serde_json::json!([101, 102, 103, 104])
    );
}

#[test]
fn message_timestamps_are_iso_8601() {
    let conversations = seed_conversations();
    let json = serde_json::to_value(&conversations[0]).unwrap();
    assert_eq!(json["participant_ids"], serde_json::json!([100, 101]));
    assert_eq!(json["messages"][0]["timestamp"], "2024-11-18T10:00:00Z");
}

#[test]
fn enums_decode_from_wire_ids() {
    let status: AttendanceStatus = serde_json::from_str("\"late\"").unwrap();
    assert_eq!(status, AttendanceStatus::Late);
    let review: JustificationStatus = serde_json::from_str("\"rejected\"").unwrap();
    assert_eq!(review, JustificationStatus::Rejected);
    assert!(serde_json::from_str::<AttendanceStatus>("\"tardy\"").is_err());
}

#[test]
fn partial_grades_accept_fractional_values() {
    let graded: PartialGrade =
        serde_json::from_str(r#"{"name":"Parcial 1","date":"2024-10-15","grade":7.5}"#).unwrap();
    assert_eq!(graded.grade, Some(7.5));

    let whole: PartialGrade =
        serde_json::from_str(r#"{"name":"Parcial 1","date":"2024-10-15","grade":8}"#).unwrap();
    assert_eq!(whole.grade, Some(8.0));

    let pending: PartialGrade =
        serde_json::from_str(r#"{"name":"Parcial 2","date":"2024-11-20","grade":null}"#).unwrap();
    assert_eq!(pending.grade, None);
    assert_eq!(serde_json::to_value(&graded).unwrap()["grade"], 7.5);
}
