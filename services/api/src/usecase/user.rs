use uuid::Uuid;

use crate::domain::repository::{EventRepository, UserRepository};
use crate::domain::types::{Event, User};
use crate::error::ApiServiceError;

// ── GetProfile ───────────────────────────────────────────────────────────────

pub struct GetProfileUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> GetProfileUseCase<U> {
    pub async fn execute(&self, user_id: Uuid) -> Result<User, ApiServiceError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(ApiServiceError::UserNotFound)
    }
}

// ── UpdateProfile ────────────────────────────────────────────────────────────

pub struct UpdateProfileInput {
    pub name: Option<String>,
    pub img_url: Option<String>,
}

pub struct UpdateProfileUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> UpdateProfileUseCase<U> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        input: UpdateProfileInput,
    ) -> Result<(), ApiServiceError> {
        if input.name.is_none() && input.img_url.is_none() {
            return Err(ApiServiceError::MissingData);
        }
        self.users
            .update_profile(user_id, input.name.as_deref(), input.img_url.as_deref())
            .await
    }
}

// ── ListCreatedEvents ────────────────────────────────────────────────────────

pub struct ListCreatedEventsUseCase<U: UserRepository, E: EventRepository> {
    pub users: U,
    pub events: E,
}

impl<U: UserRepository, E: EventRepository> ListCreatedEventsUseCase<U, E> {
    pub async fn execute(&self, user_id: Uuid) -> Result<Vec<Event>, ApiServiceError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(ApiServiceError::UserNotFound)?;
        self.events.list_created_by(user_id).await
    }
}

// ── ListRegisteredEvents ─────────────────────────────────────────────────────

pub struct ListRegisteredEventsUseCase<U: UserRepository, E: EventRepository> {
    pub users: U,
    pub events: E,
}

impl<U: UserRepository, E: EventRepository> ListRegisteredEventsUseCase<U, E> {
    pub async fn execute(&self, user_id: Uuid) -> Result<Vec<Event>, ApiServiceError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(ApiServiceError::UserNotFound)?;
        self.events.list_registered_by(user_id).await
    }
}
