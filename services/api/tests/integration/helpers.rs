use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use eventsync_api::domain::repository::{
    AttendanceRepository, EventRepository, OtpRepository, ReviewRepository, UserRepository,
};
use eventsync_api::domain::types::{
    Attendance, CustomField, Event, EventAccess, EventPatch, OTP_KIND_SIGNUP, OTP_TTL_SECS, Otp,
    OtpPayload, OutboxEvent, RegistrationOutcome, ReviewSummary, User, VerifyOutcome,
};
use eventsync_api::error::ApiServiceError;
use eventsync_domain::field::{FieldDef, FieldType, FieldValue};
use eventsync_domain::pagination::PageRequest;

pub const TEST_JWT_SECRET: &str = "test-jwt-secret-for-integration-tests";

/// In-memory stand-in for the database. All mock repositories built from one
/// store share the same row vectors, so cross-table effects (FK cascade,
/// outbox writes) are observable exactly as they would be in Postgres.
#[derive(Default, Clone)]
pub struct TestStore {
    pub users: Arc<Mutex<Vec<User>>>,
    pub events: Arc<Mutex<Vec<Event>>>,
    pub fields: Arc<Mutex<Vec<CustomField>>>,
    /// (event_id, user_id) admin grants.
    pub admins: Arc<Mutex<Vec<(Uuid, Uuid)>>>,
    pub attendances: Arc<Mutex<Vec<Attendance>>>,
    pub reviews: Arc<Mutex<Vec<ReviewSummary>>>,
    pub otps: Arc<Mutex<Vec<Otp>>>,
    pub outbox: Arc<Mutex<Vec<OutboxEvent>>>,
}

impl TestStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_repo(&self) -> MockUserRepo {
        MockUserRepo {
            store: self.clone(),
        }
    }

    pub fn event_repo(&self) -> MockEventRepo {
        MockEventRepo {
            store: self.clone(),
        }
    }

    pub fn attendance_repo(&self) -> MockAttendanceRepo {
        MockAttendanceRepo {
            store: self.clone(),
        }
    }

    pub fn review_repo(&self) -> MockReviewRepo {
        MockReviewRepo {
            store: self.clone(),
        }
    }

    pub fn otp_repo(&self) -> MockOtpRepo {
        MockOtpRepo {
            store: self.clone(),
        }
    }

    // Seeding helpers.

    pub fn add_user(&self, user: User) -> Uuid {
        let id = user.id;
        self.users.lock().unwrap().push(user);
        id
    }

    pub fn add_event(&self, event: Event) -> Uuid {
        let id = event.id;
        self.events.lock().unwrap().push(event);
        id
    }

    pub fn add_field(&self, field: CustomField) -> Uuid {
        let id = field.id;
        self.fields.lock().unwrap().push(field);
        id
    }

    pub fn add_admin(&self, event_id: Uuid, user_id: Uuid) {
        self.admins.lock().unwrap().push((event_id, user_id));
    }

    pub fn add_attendance(&self, attendance: Attendance) -> Uuid {
        let id = attendance.id;
        self.attendances.lock().unwrap().push(attendance);
        id
    }

    pub fn add_otp(&self, otp: Otp) -> Uuid {
        let id = otp.id;
        self.otps.lock().unwrap().push(otp);
        id
    }
}

// ── MockUserRepo ─────────────────────────────────────────────────────────────

pub struct MockUserRepo {
    store: TestStore,
}

impl UserRepository for MockUserRepo {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiServiceError> {
        Ok(self
            .store
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiServiceError> {
        Ok(self
            .store
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn create(&self, user: &User) -> Result<(), ApiServiceError> {
        self.store.users.lock().unwrap().push(user.clone());
        Ok(())
    }

    async fn update_profile(
        &self,
        id: Uuid,
        name: Option<&str>,
        img_url: Option<&str>,
    ) -> Result<(), ApiServiceError> {
        let mut users = self.store.users.lock().unwrap();
        if let Some(user) = users.iter_mut().find(|u| u.id == id) {
            if let Some(new_name) = name {
                user.name = new_name.to_owned();
            }
            if let Some(new_img_url) = img_url {
                user.img_url = Some(new_img_url.to_owned());
            }
            user.updated_at = Utc::now();
        }
        Ok(())
    }
}

// ── MockEventRepo ────────────────────────────────────────────────────────────

pub struct MockEventRepo {
    store: TestStore,
}

impl EventRepository for MockEventRepo {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Event>, ApiServiceError> {
        Ok(self
            .store
            .events
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.id == id)
            .cloned())
    }

    async fn create_with_fields(
        &self,
        event: &Event,
        fields: &[CustomField],
    ) -> Result<(), ApiServiceError> {
        self.store.events.lock().unwrap().push(event.clone());
        self.store.fields.lock().unwrap().extend_from_slice(fields);
        Ok(())
    }

    async fn update(&self, id: Uuid, patch: &EventPatch) -> Result<(), ApiServiceError> {
        let mut events = self.store.events.lock().unwrap();
        if let Some(event) = events.iter_mut().find(|e| e.id == id) {
            if let Some(ref v) = patch.name {
                event.name = v.clone();
            }
            if let Some(ref v) = patch.description {
                event.description = v.clone();
            }
            if let Some(ref v) = patch.organization {
                event.organization = v.clone();
            }
            if let Some(ref v) = patch.location {
                event.location = v.clone();
            }
            if let Some(v) = patch.date_time {
                event.date_time = v;
            }
            if let Some(v) = patch.tickets {
                event.tickets = Some(v);
            }
            if let Some(v) = patch.price {
                event.price = v;
            }
            if let Some(ref v) = patch.org_img_url {
                event.org_img_url = Some(v.clone());
            }
            if let Some(ref v) = patch.additional_data {
                event.additional_data = Some(v.clone());
            }
            event.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn access(&self, event_id: Uuid) -> Result<Option<EventAccess>, ApiServiceError> {
        let created_by = match self
            .store
            .events
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.id == event_id)
        {
            Some(event) => event.created_by,
            None => return Ok(None),
        };
        let admin_ids = self
            .store
            .admins
            .lock()
            .unwrap()
            .iter()
            .filter(|(eid, _)| *eid == event_id)
            .map(|(_, uid)| *uid)
            .collect();
        Ok(Some(EventAccess {
            created_by,
            admin_ids,
        }))
    }

    async fn list_fields(&self, event_id: Uuid) -> Result<Vec<CustomField>, ApiServiceError> {
        Ok(self
            .store
            .fields
            .lock()
            .unwrap()
            .iter()
            .filter(|f| f.event_id == event_id)
            .cloned()
            .collect())
    }

    async fn list_admins(&self, event_id: Uuid) -> Result<Vec<User>, ApiServiceError> {
        let admin_ids: Vec<Uuid> = self
            .store
            .admins
            .lock()
            .unwrap()
            .iter()
            .filter(|(eid, _)| *eid == event_id)
            .map(|(_, uid)| *uid)
            .collect();
        Ok(self
            .store
            .users
            .lock()
            .unwrap()
            .iter()
            .filter(|u| admin_ids.contains(&u.id))
            .cloned()
            .collect())
    }

    async fn add_admin(&self, event_id: Uuid, user_id: Uuid) -> Result<bool, ApiServiceError> {
        let mut admins = self.store.admins.lock().unwrap();
        if admins.contains(&(event_id, user_id)) {
            return Ok(false);
        }
        admins.push((event_id, user_id));
        Ok(true)
    }

    async fn list_created_by(&self, user_id: Uuid) -> Result<Vec<Event>, ApiServiceError> {
        Ok(self
            .store
            .events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.created_by == user_id)
            .cloned()
            .collect())
    }

    async fn list_registered_by(&self, user_id: Uuid) -> Result<Vec<Event>, ApiServiceError> {
        let event_ids: Vec<Uuid> = self
            .store
            .attendances
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.user_id == user_id)
            .map(|a| a.event_id)
            .collect();
        Ok(self
            .store
            .events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| event_ids.contains(&e.id))
            .cloned()
            .collect())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, ApiServiceError> {
        let expired_ids: Vec<Uuid> = {
            let events = self.store.events.lock().unwrap();
            events
                .iter()
                .filter(|e| e.date_time < now)
                .map(|e| e.id)
                .collect()
        };
        // Emulate the ON DELETE CASCADE of the real schema.
        self.store
            .events
            .lock()
            .unwrap()
            .retain(|e| !expired_ids.contains(&e.id));
        self.store
            .fields
            .lock()
            .unwrap()
            .retain(|f| !expired_ids.contains(&f.event_id));
        self.store
            .attendances
            .lock()
            .unwrap()
            .retain(|a| !expired_ids.contains(&a.event_id));
        self.store
            .reviews
            .lock()
            .unwrap()
            .retain(|r| !expired_ids.contains(&r.event_id));
        self.store
            .admins
            .lock()
            .unwrap()
            .retain(|(eid, _)| !expired_ids.contains(eid));
        Ok(expired_ids.len() as u64)
    }
}

// ── MockAttendanceRepo ───────────────────────────────────────────────────────

pub struct MockAttendanceRepo {
    store: TestStore,
}

impl AttendanceRepository for MockAttendanceRepo {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Attendance>, ApiServiceError> {
        Ok(self
            .store
            .attendances
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id == id)
            .cloned())
    }

    async fn find_by_user_and_event(
        &self,
        user_id: Uuid,
        event_id: Uuid,
    ) -> Result<Option<Attendance>, ApiServiceError> {
        Ok(self
            .store
            .attendances
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.user_id == user_id && a.event_id == event_id)
            .cloned())
    }

    async fn list_by_event(
        &self,
        event_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<Attendance>, ApiServiceError> {
        let page = page.clamped();
        Ok(self
            .store
            .attendances
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.event_id == event_id)
            .skip(page.offset() as usize)
            .take(page.per_page as usize)
            .cloned()
            .collect())
    }

    async fn count_by_event(&self, event_id: Uuid) -> Result<u64, ApiServiceError> {
        Ok(self
            .store
            .attendances
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.event_id == event_id)
            .count() as u64)
    }

    async fn register(
        &self,
        attendance: &Attendance,
        ticket_email: &OutboxEvent,
    ) -> Result<RegistrationOutcome, ApiServiceError> {
        // Same decision order as the real transaction: event, duplicate,
        // capacity, insert.
        let capacity = match self
            .store
            .events
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.id == attendance.event_id)
        {
            Some(event) => event.tickets,
            None => return Ok(RegistrationOutcome::EventMissing),
        };

        let mut attendances = self.store.attendances.lock().unwrap();
        if attendances
            .iter()
            .any(|a| a.user_id == attendance.user_id && a.event_id == attendance.event_id)
        {
            return Ok(RegistrationOutcome::AlreadyRegistered);
        }
        if let Some(capacity) = capacity {
            let registered = attendances
                .iter()
                .filter(|a| a.event_id == attendance.event_id)
                .count();
            if registered >= capacity.max(0) as usize {
                return Ok(RegistrationOutcome::Full);
            }
        }
        attendances.push(attendance.clone());
        self.store.outbox.lock().unwrap().push(ticket_email.clone());
        Ok(RegistrationOutcome::Registered)
    }

    async fn verify(
        &self,
        attendance_id: Uuid,
        event_id: Uuid,
    ) -> Result<VerifyOutcome, ApiServiceError> {
        let mut attendances = self.store.attendances.lock().unwrap();
        match attendances
            .iter_mut()
            .find(|a| a.id == attendance_id && a.event_id == event_id)
        {
            None => Ok(VerifyOutcome::NotFound),
            Some(a) if a.verified => Ok(VerifyOutcome::AlreadyVerified),
            Some(a) => {
                a.verified = true;
                Ok(VerifyOutcome::Verified)
            }
        }
    }
}

// ── MockReviewRepo ───────────────────────────────────────────────────────────

pub struct MockReviewRepo {
    store: TestStore,
}

impl ReviewRepository for MockReviewRepo {
    async fn get(&self, event_id: Uuid) -> Result<Option<ReviewSummary>, ApiServiceError> {
        Ok(self
            .store
            .reviews
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.event_id == event_id)
            .cloned())
    }

    async fn record_rating(
        &self,
        event_id: Uuid,
        rating: Decimal,
    ) -> Result<Option<ReviewSummary>, ApiServiceError> {
        if !self
            .store
            .events
            .lock()
            .unwrap()
            .iter()
            .any(|e| e.id == event_id)
        {
            return Ok(None);
        }
        let mut reviews = self.store.reviews.lock().unwrap();
        match reviews.iter_mut().find(|r| r.event_id == event_id) {
            None => {
                let summary = ReviewSummary {
                    event_id,
                    rating,
                    participants: 1,
                };
                reviews.push(summary.clone());
                Ok(Some(summary))
            }
            Some(row) => {
                let participants = row.participants + 1;
                row.rating = (row.rating * Decimal::from(row.participants) + rating)
                    / Decimal::from(participants);
                row.participants = participants;
                Ok(Some(row.clone()))
            }
        }
    }
}

// ── MockOtpRepo ──────────────────────────────────────────────────────────────

pub struct MockOtpRepo {
    store: TestStore,
}

impl OtpRepository for MockOtpRepo {
    async fn create_with_outbox(
        &self,
        otp: &Otp,
        event: &OutboxEvent,
    ) -> Result<(), ApiServiceError> {
        self.store.otps.lock().unwrap().push(otp.clone());
        self.store.outbox.lock().unwrap().push(event.clone());
        Ok(())
    }

    async fn find_latest_by_email(&self, email: &str) -> Result<Option<Otp>, ApiServiceError> {
        Ok(self
            .store
            .otps
            .lock()
            .unwrap()
            .iter()
            .filter(|o| o.email == email)
            .max_by_key(|o| o.created_at)
            .cloned())
    }

    async fn delete(&self, id: Uuid) -> Result<(), ApiServiceError> {
        self.store.otps.lock().unwrap().retain(|o| o.id != id);
        Ok(())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, ApiServiceError> {
        let mut otps = self.store.otps.lock().unwrap();
        let before = otps.len();
        otps.retain(|o| o.expires_at >= now);
        Ok((before - otps.len()) as u64)
    }
}

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub fn test_user(email: &str) -> User {
    let now = Utc::now();
    User {
        id: Uuid::new_v4(),
        email: email.to_owned(),
        password_hash: "$argon2id$unused-in-most-tests".to_owned(),
        name: email.split('@').next().unwrap_or("user").to_owned(),
        img_url: None,
        created_at: now,
        updated_at: now,
    }
}

/// An event a week in the future with unlimited capacity.
pub fn test_event(created_by: Uuid) -> Event {
    let now = Utc::now();
    Event {
        id: Uuid::new_v4(),
        name: "RustConf Community Day".to_owned(),
        description: "Talks and hallway track".to_owned(),
        organization: "RustConf".to_owned(),
        location: "Hall B".to_owned(),
        date_time: now + Duration::days(7),
        tickets: None,
        price: Decimal::ZERO,
        org_img_url: None,
        additional_data: None,
        created_by,
        created_at: now,
        updated_at: now,
    }
}

pub fn test_event_with_capacity(created_by: Uuid, tickets: i32) -> Event {
    Event {
        tickets: Some(tickets),
        ..test_event(created_by)
    }
}

pub fn test_field(event_id: Uuid, name: &str, field_type: FieldType) -> CustomField {
    CustomField {
        id: Uuid::new_v4(),
        event_id,
        name: name.to_owned(),
        field_type,
    }
}

pub fn test_attendance(user_id: Uuid, event_id: Uuid) -> Attendance {
    Attendance {
        id: Uuid::new_v4(),
        user_id,
        event_id,
        fields: HashMap::new(),
        verified: false,
        created_at: Utc::now(),
    }
}

pub fn test_otp(email: &str, code: &str) -> Otp {
    let now = Utc::now();
    Otp {
        id: Uuid::new_v4(),
        email: email.to_owned(),
        code: code.to_owned(),
        payload: OtpPayload {
            password_hash: "$argon2id$pending".to_owned(),
            name: "pending user".to_owned(),
        },
        kind: OTP_KIND_SIGNUP.to_owned(),
        expires_at: now + Duration::seconds(OTP_TTL_SECS),
        created_at: now,
    }
}

/// A valid submission for a set of field definitions.
pub fn submission_for(defs: &[FieldDef]) -> HashMap<Uuid, FieldValue> {
    defs.iter()
        .map(|def| {
            let value = match def.field_type {
                FieldType::Text => FieldValue::Text("sample".to_owned()),
                FieldType::Number => FieldValue::Number(1.0),
                FieldType::Date => FieldValue::Date(
                    chrono::NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
                ),
            };
            (def.id, value)
        })
        .collect()
}
