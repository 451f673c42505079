use anyhow::Context as _;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
    sea_query::{Expr, OnConflict},
};
use uuid::Uuid;

use eventsync_domain::field::FieldType;
use eventsync_domain::pagination::PageRequest;
use eventsync_schema::{
    attendances, custom_fields, event_admins, events, otps, outbox_events, reviews, users,
};

use crate::domain::repository::{
    AttendanceRepository, EventRepository, OtpRepository, ReviewRepository, UserRepository,
};
use crate::domain::types::{
    Attendance, CustomField, Event, EventAccess, EventPatch, Otp, OutboxEvent,
    RegistrationOutcome, ReviewSummary, User, VerifyOutcome,
};
use crate::error::ApiServiceError;

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiServiceError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiServiceError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        Ok(model.map(user_from_model))
    }

    async fn create(&self, user: &User) -> Result<(), ApiServiceError> {
        users::ActiveModel {
            id: Set(user.id),
            email: Set(user.email.clone()),
            password_hash: Set(user.password_hash.clone()),
            name: Set(user.name.clone()),
            img_url: Set(user.img_url.clone()),
            created_at: Set(user.created_at),
            updated_at: Set(user.updated_at),
        }
        .insert(&self.db)
        .await
        .context("create user")?;
        Ok(())
    }

    async fn update_profile(
        &self,
        id: Uuid,
        name: Option<&str>,
        img_url: Option<&str>,
    ) -> Result<(), ApiServiceError> {
        let mut am = users::ActiveModel {
            id: Set(id),
            ..Default::default()
        };
        if let Some(new_name) = name {
            am.name = Set(new_name.to_owned());
        }
        if let Some(new_img_url) = img_url {
            am.img_url = Set(Some(new_img_url.to_owned()));
        }
        am.updated_at = Set(Utc::now());
        am.update(&self.db)
            .await
            .context("update user profile")?;
        Ok(())
    }
}

fn user_from_model(model: users::Model) -> User {
    User {
        id: model.id,
        email: model.email,
        password_hash: model.password_hash,
        name: model.name,
        img_url: model.img_url,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Event repository ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbEventRepository {
    pub db: DatabaseConnection,
}

impl EventRepository for DbEventRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Event>, ApiServiceError> {
        let model = events::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find event by id")?;
        Ok(model.map(event_from_model))
    }

    async fn create_with_fields(
        &self,
        event: &Event,
        fields: &[CustomField],
    ) -> Result<(), ApiServiceError> {
        let event = event.clone();
        let fields = fields.to_vec();
        self.db
            .transaction::<_, (), sea_orm::DbErr>(|txn| {
                Box::pin(async move {
                    insert_event(txn, &event).await?;
                    for field in &fields {
                        insert_custom_field(txn, field).await?;
                    }
                    Ok(())
                })
            })
            .await
            .context("create event with fields")?;
        Ok(())
    }

    async fn update(&self, id: Uuid, patch: &EventPatch) -> Result<(), ApiServiceError> {
        let mut am = events::ActiveModel {
            id: Set(id),
            ..Default::default()
        };
        if let Some(ref v) = patch.name {
            am.name = Set(v.clone());
        }
        if let Some(ref v) = patch.description {
            am.description = Set(v.clone());
        }
        if let Some(ref v) = patch.organization {
            am.organization = Set(v.clone());
        }
        if let Some(ref v) = patch.location {
            am.location = Set(v.clone());
        }
        if let Some(v) = patch.date_time {
            am.date_time = Set(v);
        }
        if let Some(v) = patch.tickets {
            am.tickets = Set(Some(v));
        }
        if let Some(v) = patch.price {
            am.price = Set(v);
        }
        if let Some(ref v) = patch.org_img_url {
            am.org_img_url = Set(Some(v.clone()));
        }
        if let Some(ref v) = patch.additional_data {
            am.additional_data = Set(Some(v.clone()));
        }
        am.updated_at = Set(Utc::now());
        am.update(&self.db).await.context("update event")?;
        Ok(())
    }

    async fn access(&self, event_id: Uuid) -> Result<Option<EventAccess>, ApiServiceError> {
        let event = events::Entity::find_by_id(event_id)
            .one(&self.db)
            .await
            .context("find event for access check")?;
        let Some(event) = event else {
            return Ok(None);
        };
        let admin_ids = event_admins::Entity::find()
            .filter(event_admins::Column::EventId.eq(event_id))
            .all(&self.db)
            .await
            .context("list event admin ids")?
            .into_iter()
            .map(|m| m.user_id)
            .collect();
        Ok(Some(EventAccess {
            created_by: event.created_by,
            admin_ids,
        }))
    }

    async fn list_fields(&self, event_id: Uuid) -> Result<Vec<CustomField>, ApiServiceError> {
        let models = custom_fields::Entity::find()
            .filter(custom_fields::Column::EventId.eq(event_id))
            .all(&self.db)
            .await
            .context("list custom fields")?;
        models.into_iter().map(custom_field_from_model).collect()
    }

    async fn list_admins(&self, event_id: Uuid) -> Result<Vec<User>, ApiServiceError> {
        let admin_ids: Vec<Uuid> = event_admins::Entity::find()
            .filter(event_admins::Column::EventId.eq(event_id))
            .all(&self.db)
            .await
            .context("list event admin ids")?
            .into_iter()
            .map(|m| m.user_id)
            .collect();
        if admin_ids.is_empty() {
            return Ok(vec![]);
        }
        let models = users::Entity::find()
            .filter(users::Column::Id.is_in(admin_ids))
            .all(&self.db)
            .await
            .context("list event admin profiles")?;
        Ok(models.into_iter().map(user_from_model).collect())
    }

    async fn add_admin(&self, event_id: Uuid, user_id: Uuid) -> Result<bool, ApiServiceError> {
        let inserted = event_admins::Entity::insert(event_admins::ActiveModel {
            event_id: Set(event_id),
            user_id: Set(user_id),
            created_at: Set(Utc::now()),
        })
        .on_conflict(
            OnConflict::columns([event_admins::Column::EventId, event_admins::Column::UserId])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(&self.db)
        .await
        .context("add event admin")?;
        Ok(inserted > 0)
    }

    async fn list_created_by(&self, user_id: Uuid) -> Result<Vec<Event>, ApiServiceError> {
        let models = events::Entity::find()
            .filter(events::Column::CreatedBy.eq(user_id))
            .order_by_desc(events::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list events created by user")?;
        Ok(models.into_iter().map(event_from_model).collect())
    }

    async fn list_registered_by(&self, user_id: Uuid) -> Result<Vec<Event>, ApiServiceError> {
        let event_ids: Vec<Uuid> = attendances::Entity::find()
            .filter(attendances::Column::UserId.eq(user_id))
            .all(&self.db)
            .await
            .context("list registrations for user")?
            .into_iter()
            .map(|m| m.event_id)
            .collect();
        if event_ids.is_empty() {
            return Ok(vec![]);
        }
        let models = events::Entity::find()
            .filter(events::Column::Id.is_in(event_ids))
            .order_by_asc(events::Column::DateTime)
            .all(&self.db)
            .await
            .context("list registered events")?;
        Ok(models.into_iter().map(event_from_model).collect())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, ApiServiceError> {
        let result = events::Entity::delete_many()
            .filter(events::Column::DateTime.lt(now))
            .exec(&self.db)
            .await
            .context("delete expired events")?;
        Ok(result.rows_affected)
    }
}

async fn insert_event(txn: &DatabaseTransaction, event: &Event) -> Result<(), sea_orm::DbErr> {
    events::ActiveModel {
        id: Set(event.id),
        name: Set(event.name.clone()),
        description: Set(event.description.clone()),
        organization: Set(event.organization.clone()),
        location: Set(event.location.clone()),
        date_time: Set(event.date_time),
        tickets: Set(event.tickets),
        price: Set(event.price),
        org_img_url: Set(event.org_img_url.clone()),
        additional_data: Set(event.additional_data.clone()),
        created_by: Set(event.created_by),
        created_at: Set(event.created_at),
        updated_at: Set(event.updated_at),
    }
    .insert(txn)
    .await?;
    Ok(())
}

async fn insert_custom_field(
    txn: &DatabaseTransaction,
    field: &CustomField,
) -> Result<(), sea_orm::DbErr> {
    custom_fields::ActiveModel {
        id: Set(field.id),
        event_id: Set(field.event_id),
        field_name: Set(field.name.clone()),
        field_type: Set(field.field_type.as_str().to_owned()),
    }
    .insert(txn)
    .await?;
    Ok(())
}

fn event_from_model(model: events::Model) -> Event {
    Event {
        id: model.id,
        name: model.name,
        description: model.description,
        organization: model.organization,
        location: model.location,
        date_time: model.date_time,
        tickets: model.tickets,
        price: model.price,
        org_img_url: model.org_img_url,
        additional_data: model.additional_data,
        created_by: model.created_by,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

fn custom_field_from_model(model: custom_fields::Model) -> Result<CustomField, ApiServiceError> {
    let field_type = FieldType::from_str(&model.field_type).ok_or_else(|| {
        ApiServiceError::Internal(anyhow::anyhow!(
            "unknown field_type {:?} on custom field {}",
            model.field_type,
            model.id
        ))
    })?;
    Ok(CustomField {
        id: model.id,
        event_id: model.event_id,
        name: model.field_name,
        field_type,
    })
}

// ── Attendance repository ────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbAttendanceRepository {
    pub db: DatabaseConnection,
}

impl AttendanceRepository for DbAttendanceRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Attendance>, ApiServiceError> {
        let model = attendances::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find attendance by id")?;
        model.map(attendance_from_model).transpose()
    }

    async fn find_by_user_and_event(
        &self,
        user_id: Uuid,
        event_id: Uuid,
    ) -> Result<Option<Attendance>, ApiServiceError> {
        let model = attendances::Entity::find()
            .filter(attendances::Column::UserId.eq(user_id))
            .filter(attendances::Column::EventId.eq(event_id))
            .one(&self.db)
            .await
            .context("find attendance by user and event")?;
        model.map(attendance_from_model).transpose()
    }

    async fn list_by_event(
        &self,
        event_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<Attendance>, ApiServiceError> {
        let page = page.clamped();
        let models = attendances::Entity::find()
            .filter(attendances::Column::EventId.eq(event_id))
            .order_by_asc(attendances::Column::CreatedAt)
            .limit(u64::from(page.per_page))
            .offset(page.offset())
            .all(&self.db)
            .await
            .context("list attendances by event")?;
        models.into_iter().map(attendance_from_model).collect()
    }

    async fn count_by_event(&self, event_id: Uuid) -> Result<u64, ApiServiceError> {
        let count = attendances::Entity::find()
            .filter(attendances::Column::EventId.eq(event_id))
            .count(&self.db)
            .await
            .context("count attendances by event")?;
        Ok(count)
    }

    async fn register(
        &self,
        attendance: &Attendance,
        ticket_email: &OutboxEvent,
    ) -> Result<RegistrationOutcome, ApiServiceError> {
        let fields_json =
            serde_json::to_value(&attendance.fields).context("serialize attendance fields")?;
        let attendance = attendance.clone();
        let ticket_email = ticket_email.clone();
        let outcome = self
            .db
            .transaction::<_, RegistrationOutcome, sea_orm::DbErr>(|txn| {
                Box::pin(async move {
                    // Exclusive lock on the event row: concurrent registrations
                    // for the same event serialize here, so the duplicate and
                    // capacity checks below read settled state.
                    let event = events::Entity::find_by_id(attendance.event_id)
                        .lock_exclusive()
                        .one(txn)
                        .await?;
                    let Some(event) = event else {
                        return Ok(RegistrationOutcome::EventMissing);
                    };

                    let duplicate = attendances::Entity::find()
                        .filter(attendances::Column::UserId.eq(attendance.user_id))
                        .filter(attendances::Column::EventId.eq(attendance.event_id))
                        .one(txn)
                        .await?;
                    if duplicate.is_some() {
                        return Ok(RegistrationOutcome::AlreadyRegistered);
                    }

                    if let Some(capacity) = event.tickets {
                        let registered = attendances::Entity::find()
                            .filter(attendances::Column::EventId.eq(attendance.event_id))
                            .count(txn)
                            .await?;
                        if registered >= capacity.max(0) as u64 {
                            return Ok(RegistrationOutcome::Full);
                        }
                    }

                    attendances::ActiveModel {
                        id: Set(attendance.id),
                        user_id: Set(attendance.user_id),
                        event_id: Set(attendance.event_id),
                        fields: Set(fields_json),
                        verified: Set(false),
                        created_at: Set(attendance.created_at),
                    }
                    .insert(txn)
                    .await?;
                    insert_outbox_event(txn, &ticket_email).await?;
                    Ok(RegistrationOutcome::Registered)
                })
            })
            .await
            .context("register attendance")?;
        Ok(outcome)
    }

    async fn verify(
        &self,
        attendance_id: Uuid,
        event_id: Uuid,
    ) -> Result<VerifyOutcome, ApiServiceError> {
        let result = attendances::Entity::update_many()
            .col_expr(attendances::Column::Verified, Expr::value(true))
            .filter(attendances::Column::Id.eq(attendance_id))
            .filter(attendances::Column::EventId.eq(event_id))
            .filter(attendances::Column::Verified.eq(false))
            .exec(&self.db)
            .await
            .context("verify attendance")?;
        if result.rows_affected > 0 {
            return Ok(VerifyOutcome::Verified);
        }
        // Zero rows: either the row is missing or someone verified it first.
        let row = attendances::Entity::find_by_id(attendance_id)
            .filter(attendances::Column::EventId.eq(event_id))
            .one(&self.db)
            .await
            .context("classify verify miss")?;
        Ok(match row {
            Some(_) => VerifyOutcome::AlreadyVerified,
            None => VerifyOutcome::NotFound,
        })
    }
}

fn attendance_from_model(model: attendances::Model) -> Result<Attendance, ApiServiceError> {
    let fields =
        serde_json::from_value(model.fields).context("deserialize attendance fields")?;
    Ok(Attendance {
        id: model.id,
        user_id: model.user_id,
        event_id: model.event_id,
        fields,
        verified: model.verified,
        created_at: model.created_at,
    })
}

// ── Review repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbReviewRepository {
    pub db: DatabaseConnection,
}

impl ReviewRepository for DbReviewRepository {
    async fn get(&self, event_id: Uuid) -> Result<Option<ReviewSummary>, ApiServiceError> {
        let model = reviews::Entity::find_by_id(event_id)
            .one(&self.db)
            .await
            .context("find review by event")?;
        Ok(model.map(review_from_model))
    }

    async fn record_rating(
        &self,
        event_id: Uuid,
        rating: Decimal,
    ) -> Result<Option<ReviewSummary>, ApiServiceError> {
        let summary = self
            .db
            .transaction::<_, Option<ReviewSummary>, sea_orm::DbErr>(|txn| {
                Box::pin(async move {
                    // Lock the event row, not the aggregate: the first-rating
                    // case has no aggregate row to lock yet.
                    let event = events::Entity::find_by_id(event_id)
                        .lock_exclusive()
                        .one(txn)
                        .await?;
                    if event.is_none() {
                        return Ok(None);
                    }

                    let now = Utc::now();
                    let existing = reviews::Entity::find_by_id(event_id).one(txn).await?;
                    match existing {
                        None => {
                            reviews::ActiveModel {
                                event_id: Set(event_id),
                                rating: Set(rating),
                                participants: Set(1),
                                created_at: Set(now),
                                updated_at: Set(now),
                            }
                            .insert(txn)
                            .await?;
                            Ok(Some(ReviewSummary {
                                event_id,
                                rating,
                                participants: 1,
                            }))
                        }
                        Some(row) => {
                            let participants = row.participants + 1;
                            let folded = (row.rating * Decimal::from(row.participants)
                                + rating)
                                / Decimal::from(participants);
                            reviews::ActiveModel {
                                event_id: Set(event_id),
                                rating: Set(folded),
                                participants: Set(participants),
                                updated_at: Set(now),
                                ..Default::default()
                            }
                            .update(txn)
                            .await?;
                            Ok(Some(ReviewSummary {
                                event_id,
                                rating: folded,
                                participants,
                            }))
                        }
                    }
                })
            })
            .await
            .context("record rating")?;
        Ok(summary)
    }
}

fn review_from_model(model: reviews::Model) -> ReviewSummary {
    ReviewSummary {
        event_id: model.event_id,
        rating: model.rating,
        participants: model.participants,
    }
}

// ── Otp repository ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbOtpRepository {
    pub db: DatabaseConnection,
}

impl OtpRepository for DbOtpRepository {
    async fn create_with_outbox(
        &self,
        otp: &Otp,
        event: &OutboxEvent,
    ) -> Result<(), ApiServiceError> {
        let payload = serde_json::to_value(&otp.payload).context("serialize otp payload")?;
        let otp = otp.clone();
        let event = event.clone();
        self.db
            .transaction::<_, (), sea_orm::DbErr>(|txn| {
                Box::pin(async move {
                    otps::ActiveModel {
                        id: Set(otp.id),
                        email: Set(otp.email.clone()),
                        code: Set(otp.code.clone()),
                        payload: Set(payload),
                        kind: Set(otp.kind.clone()),
                        expires_at: Set(otp.expires_at),
                        created_at: Set(otp.created_at),
                    }
                    .insert(txn)
                    .await?;
                    insert_outbox_event(txn, &event).await?;
                    Ok(())
                })
            })
            .await
            .context("create otp with outbox")?;
        Ok(())
    }

    async fn find_latest_by_email(&self, email: &str) -> Result<Option<Otp>, ApiServiceError> {
        let model = otps::Entity::find()
            .filter(otps::Column::Email.eq(email))
            .order_by_desc(otps::Column::CreatedAt)
            .one(&self.db)
            .await
            .context("find latest otp by email")?;
        model.map(otp_from_model).transpose()
    }

    async fn delete(&self, id: Uuid) -> Result<(), ApiServiceError> {
        otps::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete otp")?;
        Ok(())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, ApiServiceError> {
        let result = otps::Entity::delete_many()
            .filter(otps::Column::ExpiresAt.lt(now))
            .exec(&self.db)
            .await
            .context("delete expired otps")?;
        Ok(result.rows_affected)
    }
}

fn otp_from_model(model: otps::Model) -> Result<Otp, ApiServiceError> {
    let payload = serde_json::from_value(model.payload).context("deserialize otp payload")?;
    Ok(Otp {
        id: model.id,
        email: model.email,
        code: model.code,
        payload,
        kind: model.kind,
        expires_at: model.expires_at,
        created_at: model.created_at,
    })
}

// ── Shared helpers ───────────────────────────────────────────────────────────

async fn insert_outbox_event(
    txn: &DatabaseTransaction,
    event: &OutboxEvent,
) -> Result<(), sea_orm::DbErr> {
    let now = Utc::now();
    outbox_events::ActiveModel {
        id: Set(event.id),
        kind: Set(event.kind.clone()),
        payload: Set(event.payload.clone()),
        idempotency_key: Set(event.idempotency_key.clone()),
        attempts: Set(0),
        last_error: Set(None),
        created_at: Set(now),
        next_attempt_at: Set(now),
        processed_at: Set(None),
        failed_at: Set(None),
    }
    .insert(txn)
    .await?;
    Ok(())
}
