use axum::{Json, extract::State, http::StatusCode};
use axum_extra::TypedHeader;
use axum_extra::headers::{Authorization, authorization::Bearer};
use serde::{Deserialize, Serialize};

use crate::error::ApiServiceError;
use crate::state::AppState;
use crate::usecase::auth::{
    AuthTokenOutput, LoginInput, LoginUseCase, SignupInput, SignupUseCase, ValidateTokenUseCase,
    VerifySignupOtpInput, VerifySignupOtpUseCase,
};

#[derive(Serialize)]
pub struct TokenResponse {
    pub user_id: String,
    pub access_token: String,
    pub access_token_exp: u64,
}

impl From<AuthTokenOutput> for TokenResponse {
    fn from(out: AuthTokenOutput) -> Self {
        Self {
            user_id: out.user_id.to_string(),
            access_token: out.access_token,
            access_token_exp: out.access_token_exp,
        }
    }
}

// ── POST /auth/signup ────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

pub async fn signup(
    State(state): State<AppState>,
    Json(body): Json<SignupRequest>,
) -> Result<StatusCode, ApiServiceError> {
    let usecase = SignupUseCase {
        users: state.user_repo(),
        otps: state.otp_repo(),
    };
    usecase
        .execute(SignupInput {
            email: body.email,
            password: body.password,
            name: body.name,
        })
        .await?;
    Ok(StatusCode::CREATED)
}

// ── POST /auth/otp ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct VerifyOtpRequest {
    pub email: String,
    pub otp: String,
}

pub async fn verify_signup_otp(
    State(state): State<AppState>,
    Json(body): Json<VerifyOtpRequest>,
) -> Result<Json<TokenResponse>, ApiServiceError> {
    let usecase = VerifySignupOtpUseCase {
        users: state.user_repo(),
        otps: state.otp_repo(),
        jwt_secret: state.jwt_secret.clone(),
    };
    let out = usecase
        .execute(VerifySignupOtpInput {
            email: body.email,
            otp: body.otp,
        })
        .await?;
    Ok(Json(out.into()))
}

// ── POST /auth/login ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiServiceError> {
    let usecase = LoginUseCase {
        users: state.user_repo(),
        jwt_secret: state.jwt_secret.clone(),
    };
    let out = usecase
        .execute(LoginInput {
            email: body.email,
            password: body.password,
        })
        .await?;
    Ok(Json(out.into()))
}

// ── GET /auth/token ──────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct TokenCheckResponse {
    pub user_id: String,
    pub access_token_exp: u64,
}

pub async fn check_token(
    State(state): State<AppState>,
    TypedHeader(Authorization(bearer)): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<TokenCheckResponse>, ApiServiceError> {
    let usecase = ValidateTokenUseCase {
        users: state.user_repo(),
        jwt_secret: state.jwt_secret.clone(),
    };
    let out = usecase.execute(bearer.token()).await?;
    Ok(Json(TokenCheckResponse {
        user_id: out.user_id.to_string(),
        access_token_exp: out.access_token_exp,
    }))
}
