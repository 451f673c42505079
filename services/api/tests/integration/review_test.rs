use eventsync_api::error::ApiServiceError;
use eventsync_api::usecase::review::RateEventUseCase;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::helpers::{TestStore, test_event, test_user};

fn usecase(
    store: &TestStore,
) -> RateEventUseCase<
    crate::helpers::MockUserRepo,
    crate::helpers::MockEventRepo,
    crate::helpers::MockReviewRepo,
> {
    RateEventUseCase {
        users: store.user_repo(),
        events: store.event_repo(),
        reviews: store.review_repo(),
    }
}

#[tokio::test]
async fn should_create_aggregate_on_first_rating() {
    let store = TestStore::new();
    let user_id = store.add_user(test_user("rater@example.com"));
    let event_id = store.add_event(test_event(user_id));

    let summary = usecase(&store)
        .execute(user_id, event_id, Decimal::from(4))
        .await
        .unwrap();

    assert_eq!(summary.rating, Decimal::from(4));
    assert_eq!(summary.participants, 1);
}

#[tokio::test]
async fn should_fold_ratings_into_decimal_exact_running_average() {
    let store = TestStore::new();
    let organizer = store.add_user(test_user("organizer@example.com"));
    let event_id = store.add_event(test_event(organizer));
    let usecase = usecase(&store);

    // Any authenticated user may rate; no ownership restriction.
    let first = store.add_user(test_user("first@example.com"));
    let second = store.add_user(test_user("second@example.com"));
    let third = store.add_user(test_user("third@example.com"));

    usecase
        .execute(first, event_id, Decimal::from(4))
        .await
        .unwrap();
    let after_two = usecase
        .execute(second, event_id, Decimal::from(5))
        .await
        .unwrap();
    assert_eq!(after_two.rating, Decimal::new(45, 1)); // 4.5 exactly
    assert_eq!(after_two.participants, 2);

    let after_three = usecase
        .execute(third, event_id, Decimal::from(3))
        .await
        .unwrap();
    assert_eq!(after_three.rating, Decimal::from(4)); // (4.5*2 + 3) / 3 = 4.0
    assert_eq!(after_three.participants, 3);
}

#[tokio::test]
async fn should_reject_out_of_bounds_ratings() {
    let store = TestStore::new();
    let user_id = store.add_user(test_user("rater@example.com"));
    let event_id = store.add_event(test_event(user_id));
    let usecase = usecase(&store);

    for rating in [Decimal::ZERO, Decimal::from(6), Decimal::from(-1)] {
        let result = usecase.execute(user_id, event_id, rating).await;
        assert!(matches!(result, Err(ApiServiceError::InvalidRating)));
    }
    assert!(store.reviews.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_accept_boundary_ratings() {
    let store = TestStore::new();
    let user_id = store.add_user(test_user("rater@example.com"));
    let event_id = store.add_event(test_event(user_id));
    let usecase = usecase(&store);

    usecase
        .execute(user_id, event_id, Decimal::from(1))
        .await
        .unwrap();
    usecase
        .execute(user_id, event_id, Decimal::from(5))
        .await
        .unwrap();
    let summary = store.reviews.lock().unwrap()[0].clone();
    assert_eq!(summary.rating, Decimal::from(3));
    assert_eq!(summary.participants, 2);
}

#[tokio::test]
async fn should_return_not_found_for_unknown_user_or_event() {
    let store = TestStore::new();
    let user_id = store.add_user(test_user("rater@example.com"));
    let event_id = store.add_event(test_event(user_id));
    let usecase = usecase(&store);

    let no_user = usecase
        .execute(Uuid::new_v4(), event_id, Decimal::from(4))
        .await;
    assert!(matches!(no_user, Err(ApiServiceError::UserNotFound)));

    let no_event = usecase
        .execute(user_id, Uuid::new_v4(), Decimal::from(4))
        .await;
    assert!(matches!(no_event, Err(ApiServiceError::EventNotFound)));
}
