use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use eventsync_domain::field::FieldType;
use eventsync_domain::pagination::PageRequest;

use crate::domain::repository::{AttendanceRepository, EventRepository, ReviewRepository, UserRepository};
use crate::domain::types::{
    Attendance, CustomField, Event, EventPatch, ReviewSummary, User,
};
use crate::error::ApiServiceError;

/// Combine the form's separate date (`YYYY-MM-DD`) and time (`HH:MM`) inputs
/// into a UTC timestamp.
pub fn parse_event_date_time(date: &str, time: &str) -> Result<DateTime<Utc>, ApiServiceError> {
    let date =
        NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| ApiServiceError::InvalidDateTime)?;
    let time = NaiveTime::parse_from_str(time, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M:%S"))
        .map_err(|_| ApiServiceError::InvalidDateTime)?;
    Ok(Utc.from_utc_datetime(&date.and_time(time)))
}

// ── CreateEvent ──────────────────────────────────────────────────────────────

pub struct CustomFieldInput {
    pub name: String,
    pub field_type: FieldType,
}

pub struct CreateEventInput {
    pub name: String,
    pub description: String,
    pub organization: String,
    pub location: String,
    pub date: String,
    pub time: String,
    pub tickets: Option<i32>,
    pub price: Option<Decimal>,
    pub org_img_url: Option<String>,
    pub additional_data: Option<String>,
    pub custom_fields: Vec<CustomFieldInput>,
}

pub struct CreateEventUseCase<U: UserRepository, E: EventRepository> {
    pub users: U,
    pub events: E,
}

impl<U: UserRepository, E: EventRepository> CreateEventUseCase<U, E> {
    pub async fn execute(
        &self,
        creator_id: Uuid,
        input: CreateEventInput,
    ) -> Result<(Event, Vec<CustomField>), ApiServiceError> {
        let date_time = parse_event_date_time(&input.date, &input.time)?;

        self.users
            .find_by_id(creator_id)
            .await?
            .ok_or(ApiServiceError::UserNotFound)?;

        let now = Utc::now();
        let event = Event {
            id: Uuid::new_v4(),
            name: input.name,
            description: input.description,
            organization: input.organization,
            location: input.location,
            date_time,
            tickets: input.tickets,
            price: input.price.unwrap_or(Decimal::ZERO),
            org_img_url: input.org_img_url,
            additional_data: input.additional_data,
            created_by: creator_id,
            created_at: now,
            updated_at: now,
        };
        let fields: Vec<CustomField> = input
            .custom_fields
            .into_iter()
            .map(|f| CustomField {
                id: Uuid::new_v4(),
                event_id: event.id,
                name: f.name,
                field_type: f.field_type,
            })
            .collect();

        self.events.create_with_fields(&event, &fields).await?;
        Ok((event, fields))
    }
}

// ── GetEvent (organizer view) ────────────────────────────────────────────────

#[derive(Debug)]
pub struct OrganizerEventView {
    pub event: Event,
    pub attendee_count: u64,
    pub review: Option<ReviewSummary>,
    pub admin_ids: Vec<Uuid>,
}

pub struct GetEventUseCase<E, A, R>
where
    E: EventRepository,
    A: AttendanceRepository,
    R: ReviewRepository,
{
    pub events: E,
    pub attendances: A,
    pub reviews: R,
}

impl<E, A, R> GetEventUseCase<E, A, R>
where
    E: EventRepository,
    A: AttendanceRepository,
    R: ReviewRepository,
{
    pub async fn execute(
        &self,
        requester: Uuid,
        event_id: Uuid,
    ) -> Result<OrganizerEventView, ApiServiceError> {
        let access = self
            .events
            .access(event_id)
            .await?
            .ok_or(ApiServiceError::EventNotFound)?;
        if !access.allows(requester) {
            return Err(ApiServiceError::Forbidden);
        }

        let event = self
            .events
            .find_by_id(event_id)
            .await?
            .ok_or(ApiServiceError::EventNotFound)?;
        let attendee_count = self.attendances.count_by_event(event_id).await?;
        let review = self.reviews.get(event_id).await?;

        Ok(OrganizerEventView {
            event,
            attendee_count,
            review,
            admin_ids: access.admin_ids,
        })
    }
}

// ── GetPublicEvent (attendee-facing view) ────────────────────────────────────

#[derive(Debug)]
pub struct PublicEventView {
    pub event: Event,
    pub attendee_count: u64,
    pub review: Option<ReviewSummary>,
}

pub struct GetPublicEventUseCase<E, A, R>
where
    E: EventRepository,
    A: AttendanceRepository,
    R: ReviewRepository,
{
    pub events: E,
    pub attendances: A,
    pub reviews: R,
}

impl<E, A, R> GetPublicEventUseCase<E, A, R>
where
    E: EventRepository,
    A: AttendanceRepository,
    R: ReviewRepository,
{
    pub async fn execute(&self, event_id: Uuid) -> Result<PublicEventView, ApiServiceError> {
        let event = self
            .events
            .find_by_id(event_id)
            .await?
            .ok_or(ApiServiceError::EventNotFound)?;
        let attendee_count = self.attendances.count_by_event(event_id).await?;
        let review = self.reviews.get(event_id).await?;
        Ok(PublicEventView {
            event,
            attendee_count,
            review,
        })
    }
}

// ── GetEventFields ───────────────────────────────────────────────────────────

pub struct GetEventFieldsUseCase<E: EventRepository> {
    pub events: E,
}

impl<E: EventRepository> GetEventFieldsUseCase<E> {
    pub async fn execute(
        &self,
        event_id: Uuid,
    ) -> Result<(Event, Vec<CustomField>), ApiServiceError> {
        let event = self
            .events
            .find_by_id(event_id)
            .await?
            .ok_or(ApiServiceError::EventNotFound)?;
        let fields = self.events.list_fields(event_id).await?;
        Ok((event, fields))
    }
}

// ── UpdateEvent ──────────────────────────────────────────────────────────────

pub struct UpdateEventInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub organization: Option<String>,
    pub location: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub tickets: Option<i32>,
    pub price: Option<Decimal>,
    pub org_img_url: Option<String>,
    pub additional_data: Option<String>,
}

pub struct UpdateEventUseCase<E: EventRepository> {
    pub events: E,
}

impl<E: EventRepository> UpdateEventUseCase<E> {
    pub async fn execute(
        &self,
        requester: Uuid,
        event_id: Uuid,
        input: UpdateEventInput,
    ) -> Result<(), ApiServiceError> {
        let access = self
            .events
            .access(event_id)
            .await?
            .ok_or(ApiServiceError::EventNotFound)?;
        if !access.allows(requester) {
            return Err(ApiServiceError::Forbidden);
        }

        // The schedule only moves when both halves of the form are supplied.
        let date_time = match (input.date.as_deref(), input.time.as_deref()) {
            (Some(date), Some(time)) => Some(parse_event_date_time(date, time)?),
            _ => None,
        };

        let patch = EventPatch {
            name: input.name,
            description: input.description,
            organization: input.organization,
            location: input.location,
            date_time,
            tickets: input.tickets,
            price: input.price,
            org_img_url: input.org_img_url,
            additional_data: input.additional_data,
        };
        if patch.is_empty() {
            return Err(ApiServiceError::MissingData);
        }

        self.events.update(event_id, &patch).await
    }
}

// ── GrantAdmin (ownership) ───────────────────────────────────────────────────

pub struct GrantAdminUseCase<E: EventRepository, U: UserRepository> {
    pub events: E,
    pub users: U,
}

impl<E: EventRepository, U: UserRepository> GrantAdminUseCase<E, U> {
    /// Granting to an existing admin is a no-op success — the returned flag
    /// only reports whether a new grant was inserted.
    pub async fn execute(
        &self,
        requester: Uuid,
        event_id: Uuid,
        target_user_id: Uuid,
    ) -> Result<bool, ApiServiceError> {
        let access = self
            .events
            .access(event_id)
            .await?
            .ok_or(ApiServiceError::EventNotFound)?;
        if !access.allows(requester) {
            return Err(ApiServiceError::Forbidden);
        }

        self.users
            .find_by_id(target_user_id)
            .await?
            .ok_or(ApiServiceError::UserNotFound)?;

        self.events.add_admin(event_id, target_user_id).await
    }
}

// ── ListAdmins ───────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct AdminListView {
    pub creator: User,
    pub admins: Vec<User>,
}

pub struct ListAdminsUseCase<E: EventRepository, U: UserRepository> {
    pub events: E,
    pub users: U,
}

impl<E: EventRepository, U: UserRepository> ListAdminsUseCase<E, U> {
    pub async fn execute(
        &self,
        requester: Uuid,
        event_id: Uuid,
    ) -> Result<AdminListView, ApiServiceError> {
        let access = self
            .events
            .access(event_id)
            .await?
            .ok_or(ApiServiceError::EventNotFound)?;
        if !access.allows(requester) {
            return Err(ApiServiceError::Forbidden);
        }

        let creator = self
            .users
            .find_by_id(access.created_by)
            .await?
            .ok_or(ApiServiceError::UserNotFound)?;
        let admins = self.events.list_admins(event_id).await?;

        Ok(AdminListView { creator, admins })
    }
}

// ── ListAttendees ────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct AttendeeListView {
    pub fields: Vec<CustomField>,
    pub attendees: Vec<Attendance>,
}

pub struct ListAttendeesUseCase<E: EventRepository, A: AttendanceRepository> {
    pub events: E,
    pub attendances: A,
}

impl<E: EventRepository, A: AttendanceRepository> ListAttendeesUseCase<E, A> {
    pub async fn execute(
        &self,
        requester: Uuid,
        event_id: Uuid,
        page: PageRequest,
    ) -> Result<AttendeeListView, ApiServiceError> {
        let access = self
            .events
            .access(event_id)
            .await?
            .ok_or(ApiServiceError::EventNotFound)?;
        if !access.allows(requester) {
            return Err(ApiServiceError::Forbidden);
        }

        let fields = self.events.list_fields(event_id).await?;
        let attendees = self.attendances.list_by_event(event_id, page).await?;
        Ok(AttendeeListView { fields, attendees })
    }
}
