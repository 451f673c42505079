use chrono::Utc;
use tracing::info;

use crate::domain::repository::{EventRepository, OtpRepository};
use crate::domain::types::CleanupStats;
use crate::error::ApiServiceError;

pub struct CleanupUseCase<E: EventRepository, O: OtpRepository> {
    pub events: E,
    pub otps: O,
}

impl<E: EventRepository, O: OtpRepository> CleanupUseCase<E, O> {
    /// One maintenance sweep, externally triggered: drop events whose
    /// date has passed (their custom fields, attendances, reviews and admin
    /// links cascade at the database layer) and purge expired OTPs.
    pub async fn execute(&self) -> Result<CleanupStats, ApiServiceError> {
        let now = Utc::now();
        let events_deleted = self.events.delete_expired(now).await?;
        let otps_deleted = self.otps.delete_expired(now).await?;

        info!(events_deleted, otps_deleted, "cleanup sweep finished");
        Ok(CleanupStats {
            events_deleted,
            otps_deleted,
        })
    }
}
