use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{get, patch, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use eventsync_core::health::{healthz, readyz};
use eventsync_core::middleware::request_id_layer;

use crate::handlers::{
    attendance::{get_my_registration, register},
    auth::{check_token, login, signup, verify_signup_otp},
    cleanup::run_cleanup,
    event::{
        create_event, get_event, get_event_fields, get_public_event, grant_admin, list_admins,
        list_attendees, rate_event, update_event,
    },
    scan::{check, verify},
    user::{get_me, get_my_events, get_my_registrations, update_me},
};
use crate::state::AppState;

pub fn build_router(state: AppState, frontend_url: &str) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(
            frontend_url
                .parse::<HeaderValue>()
                .expect("invalid FRONTEND_URL"),
        )
        .allow_methods([Method::GET, Method::POST, Method::PATCH])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Auth
        .route("/auth/signup", post(signup))
        .route("/auth/otp", post(verify_signup_otp))
        .route("/auth/login", post(login))
        .route("/auth/token", get(check_token))
        // Events
        .route("/events", post(create_event))
        .route("/events/{event_id}", get(get_event))
        .route("/events/{event_id}", patch(update_event))
        .route("/events/{event_id}/public", get(get_public_event))
        .route("/events/{event_id}/fields", get(get_event_fields))
        .route("/events/{event_id}/admins", get(list_admins))
        .route("/events/{event_id}/admins", post(grant_admin))
        .route("/events/{event_id}/attendees", get(list_attendees))
        .route("/events/{event_id}/reviews", post(rate_event))
        // Attendance
        .route("/events/{event_id}/register", post(register))
        .route(
            "/events/{event_id}/registrations/@me",
            get(get_my_registration),
        )
        // Scan
        .route("/scan/check", post(check))
        .route("/scan/verify", post(verify))
        // Users
        .route("/users/@me", get(get_me))
        .route("/users/@me", patch(update_me))
        .route("/users/@me/events", get(get_my_events))
        .route("/users/@me/registrations", get(get_my_registrations))
        // Maintenance
        .route("/cleanup", post(run_cleanup))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
