/// Api service configuration loaded from environment variables.
///
/// Required variables have no fallback values — a missing secret aborts
/// startup instead of silently running with a known default.
#[derive(Debug)]
pub struct ApiConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// HMAC secret for signing bearer tokens.
    pub jwt_secret: String,
    /// Frontend origin allowed by CORS (e.g. "https://eventsync.example.com").
    pub frontend_url: String,
    /// TCP port to listen on (default 3100). Env var: `API_PORT`.
    pub api_port: u16,
}

impl ApiConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            jwt_secret: std::env::var("JWT_SECRET").expect("JWT_SECRET"),
            frontend_url: std::env::var("FRONTEND_URL").expect("FRONTEND_URL"),
            api_port: std::env::var("API_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3100),
        }
    }
}
