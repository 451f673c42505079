use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::repository::{EventRepository, ReviewRepository, UserRepository};
use crate::domain::types::ReviewSummary;
use crate::error::ApiServiceError;

/// Inclusive rating bounds, matching the frontend's 5-star widget.
pub const RATING_MIN: Decimal = Decimal::ONE;
pub const RATING_MAX: Decimal = Decimal::from_parts(5, 0, 0, false, 0);

pub struct RateEventUseCase<U, E, R>
where
    U: UserRepository,
    E: EventRepository,
    R: ReviewRepository,
{
    pub users: U,
    pub events: E,
    pub reviews: R,
}

impl<U, E, R> RateEventUseCase<U, E, R>
where
    U: UserRepository,
    E: EventRepository,
    R: ReviewRepository,
{
    /// Folds one rating into the event's running average. Any authenticated
    /// user may rate; there is no ownership restriction. The aggregate is
    /// decimal-exact: `(old * n + rating) / (n + 1)` computed on `Decimal`,
    /// so repeated folds do not drift.
    pub async fn execute(
        &self,
        user_id: Uuid,
        event_id: Uuid,
        rating: Decimal,
    ) -> Result<ReviewSummary, ApiServiceError> {
        if !(RATING_MIN..=RATING_MAX).contains(&rating) {
            return Err(ApiServiceError::InvalidRating);
        }

        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(ApiServiceError::UserNotFound)?;
        self.events
            .find_by_id(event_id)
            .await?
            .ok_or(ApiServiceError::EventNotFound)?;

        self.reviews
            .record_rating(event_id, rating)
            .await?
            .ok_or(ApiServiceError::EventNotFound)
    }
}
