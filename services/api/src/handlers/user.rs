use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use eventsync_auth_types::identity::Identity;

use crate::domain::types::{Event, User};
use crate::error::ApiServiceError;
use crate::state::AppState;
use crate::usecase::user::{
    GetProfileUseCase, ListCreatedEventsUseCase, ListRegisteredEventsUseCase, UpdateProfileInput,
    UpdateProfileUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub name: String,
    pub img_url: Option<String>,
    #[serde(serialize_with = "eventsync_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "eventsync_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email,
            name: user.name,
            img_url: user.img_url,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Event subset for the caller's own lists (created / registered).
#[derive(Serialize)]
pub struct EventSummaryResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub organization: String,
    pub location: String,
    #[serde(serialize_with = "eventsync_core::serde::to_rfc3339_ms")]
    pub date_time: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "eventsync_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<Event> for EventSummaryResponse {
    fn from(event: Event) -> Self {
        Self {
            id: event.id.to_string(),
            name: event.name,
            description: event.description,
            organization: event.organization,
            location: event.location,
            date_time: event.date_time,
            created_at: event.created_at,
        }
    }
}

// ── GET /users/@me ───────────────────────────────────────────────────────────

pub async fn get_me(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<UserResponse>, ApiServiceError> {
    let usecase = GetProfileUseCase {
        users: state.user_repo(),
    };
    let user = usecase.execute(identity.user_id).await?;
    Ok(Json(user.into()))
}

// ── PATCH /users/@me ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateMeRequest {
    pub name: Option<String>,
    pub img_url: Option<String>,
}

pub async fn update_me(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<UpdateMeRequest>,
) -> Result<StatusCode, ApiServiceError> {
    let usecase = UpdateProfileUseCase {
        users: state.user_repo(),
    };
    usecase
        .execute(
            identity.user_id,
            UpdateProfileInput {
                name: body.name,
                img_url: body.img_url,
            },
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── GET /users/@me/events ────────────────────────────────────────────────────

pub async fn get_my_events(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<Vec<EventSummaryResponse>>, ApiServiceError> {
    let usecase = ListCreatedEventsUseCase {
        users: state.user_repo(),
        events: state.event_repo(),
    };
    let events = usecase.execute(identity.user_id).await?;
    Ok(Json(events.into_iter().map(Into::into).collect()))
}

// ── GET /users/@me/registrations ─────────────────────────────────────────────

pub async fn get_my_registrations(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<Vec<EventSummaryResponse>>, ApiServiceError> {
    let usecase = ListRegisteredEventsUseCase {
        users: state.user_repo(),
        events: state.event_repo(),
    };
    let events = usecase.execute(identity.user_id).await?;
    Ok(Json(events.into_iter().map(Into::into).collect()))
}
