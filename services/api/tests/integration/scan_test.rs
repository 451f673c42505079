use eventsync_api::error::ApiServiceError;
use eventsync_api::usecase::scan::{CheckAttendanceUseCase, VerifyAttendanceUseCase};
use uuid::Uuid;

use crate::helpers::{TestStore, test_attendance, test_event, test_user};

fn check_usecase(
    store: &TestStore,
) -> CheckAttendanceUseCase<
    crate::helpers::MockEventRepo,
    crate::helpers::MockAttendanceRepo,
    crate::helpers::MockUserRepo,
> {
    CheckAttendanceUseCase {
        events: store.event_repo(),
        attendances: store.attendance_repo(),
        users: store.user_repo(),
    }
}

fn verify_usecase(
    store: &TestStore,
) -> VerifyAttendanceUseCase<crate::helpers::MockEventRepo, crate::helpers::MockAttendanceRepo> {
    VerifyAttendanceUseCase {
        events: store.event_repo(),
        attendances: store.attendance_repo(),
    }
}

/// One organizer, one registered attendee. Returns (organizer, event,
/// attendee, attendance).
fn seed(store: &TestStore) -> (Uuid, Uuid, Uuid, Uuid) {
    let organizer = store.add_user(test_user("organizer@example.com"));
    let event_id = store.add_event(test_event(organizer));
    let attendee = store.add_user(test_user("attendee@example.com"));
    let attendance_id = store.add_attendance(test_attendance(attendee, event_id));
    (organizer, event_id, attendee, attendance_id)
}

// ── Check ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_return_attendee_identity_on_check() {
    let store = TestStore::new();
    let (_, event_id, _, attendance_id) = seed(&store);

    let identity = check_usecase(&store)
        .execute(event_id, attendance_id)
        .await
        .unwrap();
    assert_eq!(identity.name, "attendee");
    assert_eq!(identity.email, "attendee@example.com");
    // Check never mutates.
    assert!(!store.attendances.lock().unwrap()[0].verified);
}

#[tokio::test]
async fn should_return_not_found_for_unknown_event_or_attendance() {
    let store = TestStore::new();
    let (_, event_id, _, attendance_id) = seed(&store);

    let no_event = check_usecase(&store)
        .execute(Uuid::new_v4(), attendance_id)
        .await;
    assert!(matches!(no_event, Err(ApiServiceError::EventNotFound)));

    let no_attendance = check_usecase(&store).execute(event_id, Uuid::new_v4()).await;
    assert!(matches!(
        no_attendance,
        Err(ApiServiceError::AttendanceNotFound)
    ));
}

#[tokio::test]
async fn should_treat_attendance_of_other_event_as_not_found() {
    let store = TestStore::new();
    let (organizer, _, _, attendance_id) = seed(&store);
    let other_event = store.add_event(test_event(organizer));

    let result = check_usecase(&store).execute(other_event, attendance_id).await;
    assert!(matches!(
        result,
        Err(ApiServiceError::AttendanceNotFound)
    ));
}

#[tokio::test]
async fn should_return_conflict_on_check_of_verified_attendance() {
    let store = TestStore::new();
    let (_, event_id, _, attendance_id) = seed(&store);
    store.attendances.lock().unwrap()[0].verified = true;

    let result = check_usecase(&store).execute(event_id, attendance_id).await;
    assert!(matches!(result, Err(ApiServiceError::AlreadyVerified)));
}

#[tokio::test]
async fn should_return_not_found_when_attendee_account_vanished() {
    let store = TestStore::new();
    let (_, event_id, attendee, attendance_id) = seed(&store);
    store.users.lock().unwrap().retain(|u| u.id != attendee);

    let result = check_usecase(&store).execute(event_id, attendance_id).await;
    assert!(matches!(result, Err(ApiServiceError::UserNotFound)));
}

// ── Verify ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_verify_once_then_conflict_on_retry() {
    let store = TestStore::new();
    let (organizer, event_id, _, attendance_id) = seed(&store);
    let usecase = verify_usecase(&store);

    usecase
        .execute(organizer, event_id, attendance_id)
        .await
        .unwrap();
    assert!(store.attendances.lock().unwrap()[0].verified);

    // The one-way transition has fired; a retried verify must not silently
    // succeed a second time.
    let retry = usecase.execute(organizer, event_id, attendance_id).await;
    assert!(matches!(retry, Err(ApiServiceError::AlreadyVerified)));

    // And the unauthenticated check agrees.
    let check = check_usecase(&store).execute(event_id, attendance_id).await;
    assert!(matches!(check, Err(ApiServiceError::AlreadyVerified)));
}

#[tokio::test]
async fn should_allow_admin_to_verify() {
    let store = TestStore::new();
    let (_, event_id, _, attendance_id) = seed(&store);
    let admin = store.add_user(test_user("admin@example.com"));
    store.add_admin(event_id, admin);

    verify_usecase(&store)
        .execute(admin, event_id, attendance_id)
        .await
        .unwrap();
    assert!(store.attendances.lock().unwrap()[0].verified);
}

#[tokio::test]
async fn should_forbid_verify_without_ownership() {
    let store = TestStore::new();
    let (_, event_id, _, attendance_id) = seed(&store);
    let stranger = store.add_user(test_user("stranger@example.com"));

    let result = verify_usecase(&store)
        .execute(stranger, event_id, attendance_id)
        .await;
    assert!(matches!(result, Err(ApiServiceError::Forbidden)));
    assert!(!store.attendances.lock().unwrap()[0].verified);
}

#[tokio::test]
async fn should_return_not_found_on_verify_of_unknown_attendance() {
    let store = TestStore::new();
    let (organizer, event_id, _, _) = seed(&store);

    let result = verify_usecase(&store)
        .execute(organizer, event_id, Uuid::new_v4())
        .await;
    assert!(matches!(
        result,
        Err(ApiServiceError::AttendanceNotFound)
    ));
}
