//! Bearer-token helpers for integration tests.
//!
//! Handlers authenticate via the `Identity` extractor, which validates a
//! real JWT against the state's secret. `TestIdentity` mints tokens signed
//! with a test secret so router-level tests need no running auth flow.

use http::{HeaderMap, HeaderValue};
use serde::Serialize;
use uuid::Uuid;

#[derive(Serialize)]
struct TestClaims {
    sub: String,
    exp: u64,
}

/// Configurable identity for test requests.
pub struct TestIdentity {
    pub user_id: Uuid,
}

impl TestIdentity {
    pub fn new(user_id: Uuid) -> Self {
        Self { user_id }
    }

    /// Mint a valid access token for this identity, signed with `secret`.
    pub fn token(&self, secret: &str) -> String {
        let exp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("system clock before UNIX epoch")
            .as_secs()
            + 3600;
        let claims = TestClaims {
            sub: self.user_id.to_string(),
            exp,
        };
        jsonwebtoken::encode(
            &jsonwebtoken::Header::default(),
            &claims,
            &jsonwebtoken::EncodingKey::from_secret(secret.as_bytes()),
        )
        .expect("failed to encode test token")
    }

    /// Return headers carrying this identity as a bearer token.
    pub fn headers(&self, secret: &str) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(
            http::header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.token(secret))).unwrap(),
        );
        map
    }
}
