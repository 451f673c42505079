use std::collections::HashMap;

use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use eventsync_domain::field::{FieldValue, validate_fields};

use crate::domain::repository::{AttendanceRepository, EventRepository, UserRepository};
use crate::domain::types::{Attendance, OutboxEvent, RegistrationOutcome};
use crate::error::ApiServiceError;

// ── RegisterAttendance ───────────────────────────────────────────────────────

pub struct RegisterAttendanceInput {
    pub event_id: Uuid,
    pub fields: HashMap<Uuid, FieldValue>,
}

pub struct RegisterAttendanceUseCase<U, E, A>
where
    U: UserRepository,
    E: EventRepository,
    A: AttendanceRepository,
{
    pub users: U,
    pub events: E,
    pub attendances: A,
}

impl<U, E, A> RegisterAttendanceUseCase<U, E, A>
where
    U: UserRepository,
    E: EventRepository,
    A: AttendanceRepository,
{
    /// Registers the caller for an event. The submitted field map is
    /// validated against the event's definitions before anything is written;
    /// the duplicate and capacity preconditions are re-checked inside the
    /// repository transaction, which also writes the ticket outbox event.
    /// Returns the created attendance row (its id is the QR payload).
    pub async fn execute(
        &self,
        user_id: Uuid,
        input: RegisterAttendanceInput,
    ) -> Result<Attendance, ApiServiceError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(ApiServiceError::UserNotFound)?;
        let event = self
            .events
            .find_by_id(input.event_id)
            .await?
            .ok_or(ApiServiceError::EventNotFound)?;

        let defs: Vec<_> = self
            .events
            .list_fields(input.event_id)
            .await?
            .iter()
            .map(|f| f.as_def())
            .collect();
        validate_fields(&defs, &input.fields)
            .map_err(|e| ApiServiceError::InvalidFields(e.to_string()))?;

        let attendance = Attendance {
            id: Uuid::new_v4(),
            user_id,
            event_id: input.event_id,
            fields: input.fields,
            verified: false,
            created_at: Utc::now(),
        };
        // The attendance id doubles as the QR payload on the emailed ticket.
        let ticket_email = OutboxEvent {
            id: Uuid::new_v4(),
            kind: "ticket_issued".to_owned(),
            payload: json!({
                "email": user.email,
                "event_name": event.name,
                "event_date": event.date_time.to_rfc3339(),
                "location": event.location,
                "attendance_id": attendance.id,
            }),
            idempotency_key: format!("ticket_issued:{}", attendance.id),
        };

        match self.attendances.register(&attendance, &ticket_email).await? {
            RegistrationOutcome::Registered => Ok(attendance),
            RegistrationOutcome::AlreadyRegistered => Err(ApiServiceError::AlreadyRegistered),
            RegistrationOutcome::Full => Err(ApiServiceError::EventFull),
            RegistrationOutcome::EventMissing => Err(ApiServiceError::EventNotFound),
        }
    }
}

// ── GetMyRegistration ────────────────────────────────────────────────────────

pub struct GetMyRegistrationUseCase<A: AttendanceRepository> {
    pub attendances: A,
}

impl<A: AttendanceRepository> GetMyRegistrationUseCase<A> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        event_id: Uuid,
    ) -> Result<Attendance, ApiServiceError> {
        self.attendances
            .find_by_user_and_event(user_id, event_id)
            .await?
            .ok_or(ApiServiceError::AttendanceNotFound)
    }
}
