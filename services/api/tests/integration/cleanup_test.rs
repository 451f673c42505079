use chrono::{Duration, Utc};
use eventsync_api::usecase::cleanup::CleanupUseCase;
use eventsync_domain::field::FieldType;
use rust_decimal::Decimal;

use crate::helpers::{TestStore, test_attendance, test_event, test_field, test_otp, test_user};

fn usecase(
    store: &TestStore,
) -> CleanupUseCase<crate::helpers::MockEventRepo, crate::helpers::MockOtpRepo> {
    CleanupUseCase {
        events: store.event_repo(),
        otps: store.otp_repo(),
    }
}

#[tokio::test]
async fn should_remove_expired_event_with_all_dependent_rows() {
    let store = TestStore::new();
    let organizer = store.add_user(test_user("organizer@example.com"));

    let mut past_event = test_event(organizer);
    past_event.date_time = Utc::now() - Duration::days(1);
    let past_id = store.add_event(past_event);
    store.add_field(test_field(past_id, "college", FieldType::Text));
    store.add_field(test_field(past_id, "team size", FieldType::Number));
    for n in 0..3 {
        let attendee = store.add_user(test_user(&format!("attendee{n}@example.com")));
        store.add_attendance(test_attendance(attendee, past_id));
    }
    store
        .reviews
        .lock()
        .unwrap()
        .push(eventsync_api::domain::types::ReviewSummary {
            event_id: past_id,
            rating: Decimal::from(4),
            participants: 2,
        });

    let future_id = store.add_event(test_event(organizer));
    store.add_field(test_field(future_id, "college", FieldType::Text));

    let stats = usecase(&store).execute().await.unwrap();

    assert_eq!(stats.events_deleted, 1);
    // The expired event and every dependent row are gone in one sweep.
    assert!(store.events.lock().unwrap().iter().all(|e| e.id == future_id));
    assert!(
        store
            .fields
            .lock()
            .unwrap()
            .iter()
            .all(|f| f.event_id == future_id)
    );
    assert!(store.attendances.lock().unwrap().is_empty());
    assert!(store.reviews.lock().unwrap().is_empty());
    // The future event kept its custom field.
    assert_eq!(store.fields.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_purge_only_expired_otps() {
    let store = TestStore::new();
    let mut stale = test_otp("stale@example.com", "111111");
    stale.expires_at = Utc::now() - Duration::seconds(1);
    store.add_otp(stale);
    store.add_otp(test_otp("fresh@example.com", "222222"));

    let stats = usecase(&store).execute().await.unwrap();

    assert_eq!(stats.otps_deleted, 1);
    let otps = store.otps.lock().unwrap();
    assert_eq!(otps.len(), 1);
    assert_eq!(otps[0].email, "fresh@example.com");
}

#[tokio::test]
async fn should_report_zero_counts_when_nothing_expired() {
    let store = TestStore::new();
    let organizer = store.add_user(test_user("organizer@example.com"));
    store.add_event(test_event(organizer));
    store.add_otp(test_otp("fresh@example.com", "222222"));

    let stats = usecase(&store).execute().await.unwrap();

    assert_eq!(stats.events_deleted, 0);
    assert_eq!(stats.otps_deleted, 0);
    assert_eq!(store.events.lock().unwrap().len(), 1);
    assert_eq!(store.otps.lock().unwrap().len(), 1);
}
