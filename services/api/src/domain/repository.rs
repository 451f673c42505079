#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use eventsync_domain::pagination::PageRequest;

use crate::domain::types::{
    Attendance, CustomField, Event, EventAccess, EventPatch, Otp, OutboxEvent,
    RegistrationOutcome, ReviewSummary, User, VerifyOutcome,
};
use crate::error::ApiServiceError;

/// Repository for user accounts.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiServiceError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiServiceError>;

    async fn create(&self, user: &User) -> Result<(), ApiServiceError>;

    /// Partial profile update (name and/or image URL); bumps `updated_at`.
    async fn update_profile(
        &self,
        id: Uuid,
        name: Option<&str>,
        img_url: Option<&str>,
    ) -> Result<(), ApiServiceError>;
}

/// Repository for events, their custom-field definitions and admin set.
pub trait EventRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Event>, ApiServiceError>;

    /// Insert the event and its custom-field definitions atomically
    /// (same transaction).
    async fn create_with_fields(
        &self,
        event: &Event,
        fields: &[CustomField],
    ) -> Result<(), ApiServiceError>;

    /// Apply a partial update; bumps `updated_at`.
    async fn update(&self, id: Uuid, patch: &EventPatch) -> Result<(), ApiServiceError>;

    /// Creator id + admin id set, for ownership checks.
    async fn access(&self, event_id: Uuid) -> Result<Option<EventAccess>, ApiServiceError>;

    async fn list_fields(&self, event_id: Uuid) -> Result<Vec<CustomField>, ApiServiceError>;

    /// Profiles of the admin set (creator excluded).
    async fn list_admins(&self, event_id: Uuid) -> Result<Vec<User>, ApiServiceError>;

    /// Add a user to the admin set. Returns `false` if already an admin
    /// (no-op), `true` if the grant was inserted.
    async fn add_admin(&self, event_id: Uuid, user_id: Uuid) -> Result<bool, ApiServiceError>;

    /// Events created by a user, newest first.
    async fn list_created_by(&self, user_id: Uuid) -> Result<Vec<Event>, ApiServiceError>;

    /// Events a user holds an attendance row for, soonest first.
    async fn list_registered_by(&self, user_id: Uuid) -> Result<Vec<Event>, ApiServiceError>;

    /// Delete events whose `date_time` has passed. Dependent rows go with
    /// them via FK cascade. Returns the number of events removed.
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, ApiServiceError>;
}

/// Repository for attendance rows.
pub trait AttendanceRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Attendance>, ApiServiceError>;

    async fn find_by_user_and_event(
        &self,
        user_id: Uuid,
        event_id: Uuid,
    ) -> Result<Option<Attendance>, ApiServiceError>;

    async fn list_by_event(
        &self,
        event_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<Attendance>, ApiServiceError>;

    async fn count_by_event(&self, event_id: Uuid) -> Result<u64, ApiServiceError>;

    /// The atomic registration transaction: row-lock the event, re-check the
    /// duplicate and capacity preconditions under the lock, then insert the
    /// attendance row and the ticket outbox event together. Concurrent
    /// registrations for one event serialize on the lock, so the capacity
    /// cap cannot be overcommitted and the (user, event) pair stays unique.
    async fn register(
        &self,
        attendance: &Attendance,
        ticket_email: &OutboxEvent,
    ) -> Result<RegistrationOutcome, ApiServiceError>;

    /// The one-way verified transition as a single conditional update
    /// (`SET verified = true WHERE id = ? AND event_id = ? AND verified =
    /// false`). Zero affected rows is classified by a follow-up read into
    /// `NotFound` vs `AlreadyVerified`, so two concurrent scans of one QR
    /// code cannot both report success.
    async fn verify(
        &self,
        attendance_id: Uuid,
        event_id: Uuid,
    ) -> Result<VerifyOutcome, ApiServiceError>;
}

/// Repository for the per-event rating aggregate.
pub trait ReviewRepository: Send + Sync {
    async fn get(&self, event_id: Uuid) -> Result<Option<ReviewSummary>, ApiServiceError>;

    /// Fold one rating into the aggregate inside a transaction that
    /// row-locks the parent event, serializing concurrent ratings: the first
    /// rating creates the row with `participants = 1`, later ratings apply
    /// the decimal running-average formula. Returns the post-fold summary,
    /// or `None` if the event vanished before the lock was taken.
    async fn record_rating(
        &self,
        event_id: Uuid,
        rating: Decimal,
    ) -> Result<Option<ReviewSummary>, ApiServiceError>;
}

/// Repository for one-time signup codes.
pub trait OtpRepository: Send + Sync {
    /// Insert the OTP row and its delivery outbox event atomically
    /// (same transaction).
    async fn create_with_outbox(
        &self,
        otp: &Otp,
        event: &OutboxEvent,
    ) -> Result<(), ApiServiceError>;

    /// Most recently created OTP for an email, if any.
    async fn find_latest_by_email(&self, email: &str) -> Result<Option<Otp>, ApiServiceError>;

    async fn delete(&self, id: Uuid) -> Result<(), ApiServiceError>;

    /// Delete OTPs past their expiry. Returns the number removed.
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, ApiServiceError>;
}
