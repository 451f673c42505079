use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use eventsync_auth_types::identity::Identity;
use eventsync_domain::field::{FieldType, FieldValue};
use eventsync_domain::pagination::PageRequest;

use crate::domain::types::{Attendance, CustomField, Event, ReviewSummary};
use crate::error::ApiServiceError;
use crate::state::AppState;
use crate::usecase::event::{
    CreateEventInput, CreateEventUseCase, CustomFieldInput, GetEventFieldsUseCase,
    GetEventUseCase, GetPublicEventUseCase, GrantAdminUseCase, ListAdminsUseCase,
    ListAttendeesUseCase, UpdateEventInput, UpdateEventUseCase,
};
use crate::usecase::review::RateEventUseCase;

use super::user::UserResponse;

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct EventResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub organization: String,
    pub location: String,
    #[serde(serialize_with = "eventsync_core::serde::to_rfc3339_ms")]
    pub date_time: chrono::DateTime<chrono::Utc>,
    pub tickets: Option<i32>,
    pub price: Decimal,
    pub org_img_url: Option<String>,
    pub additional_data: Option<String>,
    pub created_by: String,
    #[serde(serialize_with = "eventsync_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<Event> for EventResponse {
    fn from(event: Event) -> Self {
        Self {
            id: event.id.to_string(),
            name: event.name,
            description: event.description,
            organization: event.organization,
            location: event.location,
            date_time: event.date_time,
            tickets: event.tickets,
            price: event.price,
            org_img_url: event.org_img_url,
            additional_data: event.additional_data,
            created_by: event.created_by.to_string(),
            created_at: event.created_at,
        }
    }
}

#[derive(Serialize)]
pub struct CustomFieldResponse {
    pub id: String,
    pub field_name: String,
    pub field_type: FieldType,
}

impl From<CustomField> for CustomFieldResponse {
    fn from(field: CustomField) -> Self {
        Self {
            id: field.id.to_string(),
            field_name: field.name,
            field_type: field.field_type,
        }
    }
}

#[derive(Serialize)]
pub struct ReviewResponse {
    pub rating: Decimal,
    pub participants: i32,
}

impl From<ReviewSummary> for ReviewResponse {
    fn from(summary: ReviewSummary) -> Self {
        Self {
            rating: summary.rating,
            participants: summary.participants,
        }
    }
}

#[derive(Serialize)]
pub struct AttendanceResponse {
    pub id: String,
    pub user_id: String,
    pub fields: HashMap<Uuid, FieldValue>,
    pub verified: bool,
    #[serde(serialize_with = "eventsync_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<Attendance> for AttendanceResponse {
    fn from(attendance: Attendance) -> Self {
        Self {
            id: attendance.id.to_string(),
            user_id: attendance.user_id.to_string(),
            fields: attendance.fields,
            verified: attendance.verified,
            created_at: attendance.created_at,
        }
    }
}

// ── POST /events ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CustomFieldRequest {
    pub field_name: String,
    pub field_type: FieldType,
}

#[derive(Deserialize)]
pub struct CreateEventRequest {
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
    #[serde(default)]
    pub custom_fields: Vec<CustomFieldRequest>,
}

#[derive(Serialize)]
pub struct CreateEventResponse {
    pub event: EventResponse,
    pub fields: Vec<CustomFieldResponse>,
}

pub async fn create_event(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<CreateEventResponse>), ApiServiceError> {
    let usecase = CreateEventUseCase {
        users: state.user_repo(),
        events: state.event_repo(),
    };
    let (event, fields) = usecase
        .execute(
            identity.user_id,
            CreateEventInput {
                name: body.name,
                description: body.description,
                organization: body.organization,
                location: body.location,
                date: body.date,
                time: body.time,
                tickets: body.tickets,
                price: body.price,
                org_img_url: body.org_img_url,
                additional_data: body.additional_data,
                custom_fields: body
                    .custom_fields
                    .into_iter()
                    .map(|f| CustomFieldInput {
                        name: f.field_name,
                        field_type: f.field_type,
                    })
                    .collect(),
            },
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(CreateEventResponse {
            event: event.into(),
            fields: fields.into_iter().map(Into::into).collect(),
        }),
    ))
}

// ── GET /events/{event_id} ───────────────────────────────────────────────────

#[derive(Serialize)]
pub struct OrganizerEventResponse {
    #[serde(flatten)]
    pub event: EventResponse,
    pub attendee_count: u64,
    pub review: Option<ReviewResponse>,
    pub admin_ids: Vec<String>,
}

pub async fn get_event(
    identity: Identity,
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<OrganizerEventResponse>, ApiServiceError> {
    let usecase = GetEventUseCase {
        events: state.event_repo(),
        attendances: state.attendance_repo(),
        reviews: state.review_repo(),
    };
    let view = usecase.execute(identity.user_id, event_id).await?;
    Ok(Json(OrganizerEventResponse {
        event: view.event.into(),
        attendee_count: view.attendee_count,
        review: view.review.map(Into::into),
        admin_ids: view.admin_ids.iter().map(Uuid::to_string).collect(),
    }))
}

// ── GET /events/{event_id}/public ────────────────────────────────────────────

#[derive(Serialize)]
pub struct PublicEventResponse {
    #[serde(flatten)]
    pub event: EventResponse,
    pub attendee_count: u64,
    pub review: Option<ReviewResponse>,
}

pub async fn get_public_event(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<PublicEventResponse>, ApiServiceError> {
    let usecase = GetPublicEventUseCase {
        events: state.event_repo(),
        attendances: state.attendance_repo(),
        reviews: state.review_repo(),
    };
    let view = usecase.execute(event_id).await?;
    Ok(Json(PublicEventResponse {
        event: view.event.into(),
        attendee_count: view.attendee_count,
        review: view.review.map(Into::into),
    }))
}

// ── GET /events/{event_id}/fields ────────────────────────────────────────────

#[derive(Serialize)]
pub struct EventFieldsResponse {
    pub event: EventResponse,
    pub fields: Vec<CustomFieldResponse>,
}

pub async fn get_event_fields(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<EventFieldsResponse>, ApiServiceError> {
    let usecase = GetEventFieldsUseCase {
        events: state.event_repo(),
    };
    let (event, fields) = usecase.execute(event_id).await?;
    Ok(Json(EventFieldsResponse {
        event: event.into(),
        fields: fields.into_iter().map(Into::into).collect(),
    }))
}

// ── PATCH /events/{event_id} ─────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateEventRequest {
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

pub async fn update_event(
    identity: Identity,
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    Json(body): Json<UpdateEventRequest>,
) -> Result<StatusCode, ApiServiceError> {
    let usecase = UpdateEventUseCase {
        events: state.event_repo(),
    };
    usecase
        .execute(
            identity.user_id,
            event_id,
            UpdateEventInput {
                name: body.name,
                description: body.description,
                organization: body.organization,
                location: body.location,
                date: body.date,
                time: body.time,
                tickets: body.tickets,
                price: body.price,
                org_img_url: body.org_img_url,
                additional_data: body.additional_data,
            },
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── POST /events/{event_id}/admins ───────────────────────────────────────────

#[derive(Deserialize)]
pub struct GrantAdminRequest {
    pub user_id: Uuid,
}

pub async fn grant_admin(
    identity: Identity,
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    Json(body): Json<GrantAdminRequest>,
) -> Result<StatusCode, ApiServiceError> {
    let usecase = GrantAdminUseCase {
        events: state.event_repo(),
        users: state.user_repo(),
    };
    usecase
        .execute(identity.user_id, event_id, body.user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── GET /events/{event_id}/admins ────────────────────────────────────────────

#[derive(Serialize)]
pub struct AdminListResponse {
    pub creator: UserResponse,
    pub admins: Vec<UserResponse>,
}

pub async fn list_admins(
    identity: Identity,
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<AdminListResponse>, ApiServiceError> {
    let usecase = ListAdminsUseCase {
        events: state.event_repo(),
        users: state.user_repo(),
    };
    let view = usecase.execute(identity.user_id, event_id).await?;
    Ok(Json(AdminListResponse {
        creator: view.creator.into(),
        admins: view.admins.into_iter().map(Into::into).collect(),
    }))
}

// ── GET /events/{event_id}/attendees ─────────────────────────────────────────

#[derive(Serialize)]
pub struct AttendeeListResponse {
    pub fields: Vec<CustomFieldResponse>,
    pub attendees: Vec<AttendanceResponse>,
}

pub async fn list_attendees(
    identity: Identity,
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    Query(page): Query<PageRequest>,
) -> Result<Json<AttendeeListResponse>, ApiServiceError> {
    let usecase = ListAttendeesUseCase {
        events: state.event_repo(),
        attendances: state.attendance_repo(),
    };
    let view = usecase.execute(identity.user_id, event_id, page).await?;
    Ok(Json(AttendeeListResponse {
        fields: view.fields.into_iter().map(Into::into).collect(),
        attendees: view.attendees.into_iter().map(Into::into).collect(),
    }))
}

// ── POST /events/{event_id}/reviews ──────────────────────────────────────────

#[derive(Deserialize)]
pub struct RateEventRequest {
    pub rating: Decimal,
}

pub async fn rate_event(
    identity: Identity,
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    Json(body): Json<RateEventRequest>,
) -> Result<Json<ReviewResponse>, ApiServiceError> {
    let usecase = RateEventUseCase {
        users: state.user_repo(),
        events: state.event_repo(),
        reviews: state.review_repo(),
    };
    let summary = usecase
        .execute(identity.user_id, event_id, body.rating)
        .await?;
    Ok(Json(summary.into()))
}
