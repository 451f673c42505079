use axum::{Json, extract::State};

use crate::domain::types::CleanupStats;
use crate::error::ApiServiceError;
use crate::state::AppState;
use crate::usecase::cleanup::CleanupUseCase;

// ── POST /cleanup ────────────────────────────────────────────────────────────

/// Maintenance sweep, invoked externally (e.g. by a cron trigger).
pub async fn run_cleanup(
    State(state): State<AppState>,
) -> Result<Json<CleanupStats>, ApiServiceError> {
    let usecase = CleanupUseCase {
        events: state.event_repo(),
        otps: state.otp_repo(),
    };
    let stats = usecase.execute().await?;
    Ok(Json(stats))
}
