use uuid::Uuid;

use crate::domain::repository::{AttendanceRepository, EventRepository, UserRepository};
use crate::domain::types::VerifyOutcome;
use crate::error::ApiServiceError;

// ── CheckAttendance (unauthenticated lookup) ─────────────────────────────────

/// What the scanning UI shows in its confirmation dialog.
#[derive(Debug)]
pub struct AttendeeIdentity {
    pub name: String,
    pub email: String,
}

pub struct CheckAttendanceUseCase<E, A, U>
where
    E: EventRepository,
    A: AttendanceRepository,
    U: UserRepository,
{
    pub events: E,
    pub attendances: A,
    pub users: U,
}

impl<E, A, U> CheckAttendanceUseCase<E, A, U>
where
    E: EventRepository,
    A: AttendanceRepository,
    U: UserRepository,
{
    /// Pure lookup — never mutates. An attendance row from a different
    /// event is indistinguishable from a missing one on purpose: a QR code
    /// scanned at the wrong venue reads as "not found", not as a hint that
    /// the id exists elsewhere.
    pub async fn execute(
        &self,
        event_id: Uuid,
        attendance_id: Uuid,
    ) -> Result<AttendeeIdentity, ApiServiceError> {
        self.events
            .find_by_id(event_id)
            .await?
            .ok_or(ApiServiceError::EventNotFound)?;

        let attendance = self
            .attendances
            .find_by_id(attendance_id)
            .await?
            .filter(|a| a.event_id == event_id)
            .ok_or(ApiServiceError::AttendanceNotFound)?;

        if attendance.verified {
            return Err(ApiServiceError::AlreadyVerified);
        }

        let user = self
            .users
            .find_by_id(attendance.user_id)
            .await?
            .ok_or(ApiServiceError::UserNotFound)?;

        Ok(AttendeeIdentity {
            name: user.name,
            email: user.email,
        })
    }
}

// ── VerifyAttendance (authorized one-way transition) ─────────────────────────

pub struct VerifyAttendanceUseCase<E, A>
where
    E: EventRepository,
    A: AttendanceRepository,
{
    pub events: E,
    pub attendances: A,
}

impl<E, A> VerifyAttendanceUseCase<E, A>
where
    E: EventRepository,
    A: AttendanceRepository,
{
    /// Flips `verified` false→true exactly once. The write is a conditional
    /// update keyed on the guard column, so a retried or concurrent verify
    /// reports `AlreadyVerified` instead of silently succeeding twice.
    pub async fn execute(
        &self,
        requester: Uuid,
        event_id: Uuid,
        attendance_id: Uuid,
    ) -> Result<(), ApiServiceError> {
        let access = self
            .events
            .access(event_id)
            .await?
            .ok_or(ApiServiceError::EventNotFound)?;
        if !access.allows(requester) {
            return Err(ApiServiceError::Forbidden);
        }

        match self.attendances.verify(attendance_id, event_id).await? {
            VerifyOutcome::Verified => Ok(()),
            VerifyOutcome::AlreadyVerified => Err(ApiServiceError::AlreadyVerified),
            VerifyOutcome::NotFound => Err(ApiServiceError::AttendanceNotFound),
        }
    }
}
