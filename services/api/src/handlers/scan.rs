use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use eventsync_auth_types::identity::Identity;

use crate::error::ApiServiceError;
use crate::state::AppState;
use crate::usecase::scan::{CheckAttendanceUseCase, VerifyAttendanceUseCase};

// ── POST /scan/check ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ScanRequest {
    pub event_id: Uuid,
    pub attendance_id: Uuid,
}

#[derive(Serialize)]
pub struct ScanCheckResponse {
    pub name: String,
    pub email: String,
}

/// Unauthenticated by design: the scanner shows the attendee's identity in a
/// confirmation dialog before the (authenticated) verify call mutates state.
pub async fn check(
    State(state): State<AppState>,
    Json(body): Json<ScanRequest>,
) -> Result<Json<ScanCheckResponse>, ApiServiceError> {
    let usecase = CheckAttendanceUseCase {
        events: state.event_repo(),
        attendances: state.attendance_repo(),
        users: state.user_repo(),
    };
    let attendee = usecase.execute(body.event_id, body.attendance_id).await?;
    Ok(Json(ScanCheckResponse {
        name: attendee.name,
        email: attendee.email,
    }))
}

// ── POST /scan/verify ────────────────────────────────────────────────────────

pub async fn verify(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<ScanRequest>,
) -> Result<StatusCode, ApiServiceError> {
    let usecase = VerifyAttendanceUseCase {
        events: state.event_repo(),
        attendances: state.attendance_repo(),
    };
    usecase
        .execute(identity.user_id, body.event_id, body.attendance_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
