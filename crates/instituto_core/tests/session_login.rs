use instituto_core::{
    AttendanceStatus, DataStore, InMemoryConversationRepository, InMemoryDataStore,
    InMemoryUserRepository, SessionService, UserRole,
};

#[test]
fn login_maps_roles_to_fixture_accounts() {
    let store = InMemoryDataStore::seeded().unwrap();
    let mut session = SessionService::new();

    let student = session.login(&store, UserRole::Student).unwrap().unwrap();
    assert_eq!(student.id, 1);
    assert_eq!(student.role(), UserRole::Student);

    let teacher = session.login(&store, UserRole::Teacher).unwrap().unwrap();
    assert_eq!(teacher.id, 100);
    assert_eq!(session.current_user_id(), Some(100));
}

#[test]
fn data_survives_logout_and_login() {
    let store = InMemoryDataStore::seeded().unwrap();
    let mut session = SessionService::new();

    session.login(&store, UserRole::Student).unwrap();
    store
        .update_student_data(1, "Q1", "2024-11-25", AttendanceStatus::Present)
        .unwrap();
    session.logout();
    assert_eq!(session.current_user_id(), None);
    assert!(session.current_user(&store).unwrap().is_none());

    session.login(&store, UserRole::Student).unwrap();
    let student = session.current_user(&store).unwrap().unwrap();
    assert_eq!(
        student
            .subject("Q1")
            .and_then(|subject| subject.record_for("2024-11-25"))
            .map(|record| record.status),
        Some(AttendanceStatus::Present)
    );
}

#[test]
fn login_without_fixture_account_stays_logged_out() {
    let store = DataStore::new(
        InMemoryUserRepository::new(),
        InMemoryConversationRepository::new(),
    );
    let mut session = SessionService::new();

    assert!(session.login(&store, UserRole::Teacher).unwrap().is_none());
    assert_eq!(session.current_user_id(), None);
}
