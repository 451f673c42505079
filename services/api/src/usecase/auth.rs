use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::password_hash::rand_core::OsRng;
use argon2::Argon2;
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use rand::RngExt;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use eventsync_auth_types::token::validate_access_token;

use crate::domain::repository::{OtpRepository, UserRepository};
use crate::domain::types::{
    OTP_CODE_LEN, OTP_KIND_SIGNUP, OTP_TTL_SECS, Otp, OtpPayload, OutboxEvent, TOKEN_TTL_SECS,
    User,
};
use crate::error::ApiServiceError;

/// JWT claims for issued access tokens. `sub` is the user id.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    pub exp: u64,
}

fn now_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("system clock before UNIX epoch")
        .as_secs()
}

pub fn issue_access_token(
    user_id: Uuid,
    secret: &str,
) -> Result<(String, u64), ApiServiceError> {
    let exp = now_secs() + TOKEN_TTL_SECS;
    let claims = TokenClaims {
        sub: user_id.to_string(),
        exp,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ApiServiceError::Internal(e.into()))?;
    Ok((token, exp))
}

/// Argon2id hash with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, ApiServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiServiceError::Internal(anyhow::anyhow!("hash password: {e}")))
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, ApiServiceError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| ApiServiceError::Internal(anyhow::anyhow!("parse password hash: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

fn generate_otp_code() -> String {
    let mut rng = rand::rng();
    (0..OTP_CODE_LEN)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect()
}

/// Token payload returned by login and OTP verification.
#[derive(Debug)]
pub struct AuthTokenOutput {
    pub user_id: Uuid,
    pub access_token: String,
    pub access_token_exp: u64,
}

// ── Signup (request OTP) ─────────────────────────────────────────────────────

pub struct SignupInput {
    pub email: String,
    pub password: String,
    pub name: String,
}

pub struct SignupUseCase<U: UserRepository, O: OtpRepository> {
    pub users: U,
    pub otps: O,
}

impl<U: UserRepository, O: OtpRepository> SignupUseCase<U, O> {
    /// Account creation is deferred: the password is hashed immediately and
    /// parked in the OTP payload together with the display name; the user
    /// row appears only once the emailed code is verified.
    pub async fn execute(&self, input: SignupInput) -> Result<(), ApiServiceError> {
        if self.users.find_by_email(&input.email).await?.is_some() {
            return Err(ApiServiceError::UserAlreadyExists);
        }

        let password_hash = hash_password(&input.password)?;
        let code = generate_otp_code();
        let now = Utc::now();
        let otp = Otp {
            id: Uuid::new_v4(),
            email: input.email.clone(),
            code: code.clone(),
            payload: OtpPayload {
                password_hash,
                name: input.name,
            },
            kind: OTP_KIND_SIGNUP.to_owned(),
            expires_at: now + Duration::seconds(OTP_TTL_SECS),
            created_at: now,
        };

        let event = OutboxEvent {
            id: Uuid::new_v4(),
            kind: "signup_otp_created".to_owned(),
            payload: json!({ "email": input.email, "code": code }),
            idempotency_key: format!("signup_otp_created:{}", otp.id),
        };

        self.otps.create_with_outbox(&otp, &event).await?;
        Ok(())
    }
}

// ── Verify signup OTP ────────────────────────────────────────────────────────

pub struct VerifySignupOtpInput {
    pub email: String,
    pub otp: String,
}

pub struct VerifySignupOtpUseCase<U: UserRepository, O: OtpRepository> {
    pub users: U,
    pub otps: O,
    pub jwt_secret: String,
}

impl<U: UserRepository, O: OtpRepository> VerifySignupOtpUseCase<U, O> {
    pub async fn execute(
        &self,
        input: VerifySignupOtpInput,
    ) -> Result<AuthTokenOutput, ApiServiceError> {
        if self.users.find_by_email(&input.email).await?.is_some() {
            return Err(ApiServiceError::UserAlreadyExists);
        }

        let otp = self
            .otps
            .find_latest_by_email(&input.email)
            .await?
            .ok_or(ApiServiceError::OtpNotFound)?;

        if !otp.accepts(&input.otp, Utc::now()) {
            return Err(ApiServiceError::InvalidOtp);
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: input.email,
            password_hash: otp.payload.password_hash.clone(),
            name: otp.payload.name.clone(),
            img_url: None,
            created_at: now,
            updated_at: now,
        };
        self.users.create(&user).await?;
        self.otps.delete(otp.id).await?;

        let (access_token, access_token_exp) = issue_access_token(user.id, &self.jwt_secret)?;
        Ok(AuthTokenOutput {
            user_id: user.id,
            access_token,
            access_token_exp,
        })
    }
}

// ── Login ────────────────────────────────────────────────────────────────────

pub struct LoginInput {
    pub email: String,
    pub password: String,
}

pub struct LoginUseCase<U: UserRepository> {
    pub users: U,
    pub jwt_secret: String,
}

impl<U: UserRepository> LoginUseCase<U> {
    pub async fn execute(&self, input: LoginInput) -> Result<AuthTokenOutput, ApiServiceError> {
        let user = self
            .users
            .find_by_email(&input.email)
            .await?
            .ok_or(ApiServiceError::UserNotFound)?;

        if !verify_password(&input.password, &user.password_hash)? {
            return Err(ApiServiceError::InvalidCredentials);
        }

        let (access_token, access_token_exp) = issue_access_token(user.id, &self.jwt_secret)?;
        Ok(AuthTokenOutput {
            user_id: user.id,
            access_token,
            access_token_exp,
        })
    }
}

// ── Validate token ───────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct TokenCheckOutput {
    pub user_id: Uuid,
    pub access_token_exp: u64,
}

pub struct ValidateTokenUseCase<U: UserRepository> {
    pub users: U,
    pub jwt_secret: String,
}

impl<U: UserRepository> ValidateTokenUseCase<U> {
    /// Confirms both the signature/expiry and that the account still exists.
    pub async fn execute(&self, token: &str) -> Result<TokenCheckOutput, ApiServiceError> {
        let info = validate_access_token(token, &self.jwt_secret)
            .map_err(|_| ApiServiceError::Unauthorized)?;

        self.users
            .find_by_id(info.user_id)
            .await?
            .ok_or(ApiServiceError::UserNotFound)?;

        Ok(TokenCheckOutput {
            user_id: info.user_id,
            access_token_exp: info.access_token_exp,
        })
    }
}
