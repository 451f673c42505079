use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Api service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum ApiServiceError {
    #[error("user not found")]
    UserNotFound,
    #[error("event not found")]
    EventNotFound,
    #[error("attendance not found")]
    AttendanceNotFound,
    #[error("otp not found")]
    OtpNotFound,
    #[error("user already exists")]
    UserAlreadyExists,
    #[error("user already registered for this event")]
    AlreadyRegistered,
    #[error("event registration is full")]
    EventFull,
    #[error("attendee already verified")]
    AlreadyVerified,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("unauthorized")]
    Unauthorized,
    #[error("invalid or expired otp")]
    InvalidOtp,
    #[error("invalid date or time format")]
    InvalidDateTime,
    #[error("invalid registration fields: {0}")]
    InvalidFields(String),
    #[error("rating must be between 1 and 5")]
    InvalidRating,
    #[error("missing data")]
    MissingData,
    #[error("forbidden")]
    Forbidden,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl ApiServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::EventNotFound => "EVENT_NOT_FOUND",
            Self::AttendanceNotFound => "ATTENDANCE_NOT_FOUND",
            Self::OtpNotFound => "OTP_NOT_FOUND",
            Self::UserAlreadyExists => "USER_ALREADY_EXISTS",
            Self::AlreadyRegistered => "ALREADY_REGISTERED",
            Self::EventFull => "EVENT_FULL",
            Self::AlreadyVerified => "ALREADY_VERIFIED",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::InvalidOtp => "INVALID_OTP",
            Self::InvalidDateTime => "INVALID_DATE_TIME",
            Self::InvalidFields(_) => "INVALID_FIELDS",
            Self::InvalidRating => "INVALID_RATING",
            Self::MissingData => "MISSING_DATA",
            Self::Forbidden => "FORBIDDEN",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for ApiServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::UserNotFound
            | Self::EventNotFound
            | Self::AttendanceNotFound
            | Self::OtpNotFound => StatusCode::NOT_FOUND,
            Self::UserAlreadyExists
            | Self::AlreadyRegistered
            | Self::EventFull
            | Self::AlreadyVerified => StatusCode::CONFLICT,
            Self::InvalidCredentials | Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::InvalidOtp
            | Self::InvalidDateTime
            | Self::InvalidFields(_)
            | Self::InvalidRating
            | Self::MissingData => StatusCode::BAD_REQUEST,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // Log 500s only — tower-http TraceLayer already records method/uri/status for all
        // requests. 4xx are expected client errors; logging them here would be noise.
        // Internal errors need the anyhow chain logged so the root cause is traceable.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
