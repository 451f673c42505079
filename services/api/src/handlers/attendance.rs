use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use uuid::Uuid;

use eventsync_auth_types::identity::Identity;
use eventsync_domain::field::FieldValue;

use crate::error::ApiServiceError;
use crate::state::AppState;
use crate::usecase::attendance::{
    GetMyRegistrationUseCase, RegisterAttendanceInput, RegisterAttendanceUseCase,
};

use super::event::AttendanceResponse;

// ── POST /events/{event_id}/register ─────────────────────────────────────────

#[derive(Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub fields: HashMap<Uuid, FieldValue>,
}

pub async fn register(
    identity: Identity,
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AttendanceResponse>), ApiServiceError> {
    let usecase = RegisterAttendanceUseCase {
        users: state.user_repo(),
        events: state.event_repo(),
        attendances: state.attendance_repo(),
    };
    let attendance = usecase
        .execute(
            identity.user_id,
            RegisterAttendanceInput {
                event_id,
                fields: body.fields,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(attendance.into())))
}

// ── GET /events/{event_id}/registrations/@me ─────────────────────────────────

pub async fn get_my_registration(
    identity: Identity,
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<AttendanceResponse>, ApiServiceError> {
    let usecase = GetMyRegistrationUseCase {
        attendances: state.attendance_repo(),
    };
    let attendance = usecase.execute(identity.user_id, event_id).await?;
    Ok(Json(attendance.into()))
}
