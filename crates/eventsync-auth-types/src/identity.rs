//! Bearer-token identity extractor.

use axum::extract::FromRequestParts;
use http::StatusCode;
use http::request::Parts;
use uuid::Uuid;

use crate::token::validate_access_token;

/// Anything that can hand the extractor the JWT signing secret.
/// The service `AppState` implements this.
pub trait JwtSecretSource {
    fn jwt_secret(&self) -> &str;
}

/// Verified caller identity, extracted from `Authorization: Bearer <jwt>`.
///
/// Validation happens exactly once, here — handlers receive the already
/// verified `user_id` instead of re-decoding the token per call.
/// Returns 401 if the header is absent, not a bearer token, or the JWT
/// fails validation.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: Uuid,
    pub access_token_exp: u64,
}

impl<S> FromRequestParts<S> for Identity
where
    S: JwtSecretSource + Send + Sync,
{
    type Rejection = StatusCode;

    // axum-core 0.5 defines this as `fn -> impl Future + Send` (not `async fn`).
    // In Rust 1.82+ precise capturing, `async fn` captures lifetimes differently,
    // causing E0195. Fix: extract values synchronously, return a 'static async move block.
    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let token = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.strip_prefix("Bearer "))
            .map(str::to_owned);
        let secret = state.jwt_secret().to_owned();

        async move {
            let token = token.ok_or(StatusCode::UNAUTHORIZED)?;
            let info = validate_access_token(&token, &secret)
                .map_err(|_| StatusCode::UNAUTHORIZED)?;
            Ok(Self {
                user_id: info.user_id,
                access_token_exp: info.access_token_exp,
            })
        }
    }
}
