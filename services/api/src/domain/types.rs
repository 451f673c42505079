use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use eventsync_domain::field::{FieldDef, FieldType, FieldValue};

/// Account record.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub img_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An event and its registration settings. `tickets = None` means unlimited
/// capacity.
#[derive(Debug, Clone)]
pub struct Event {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub organization: String,
    pub location: String,
    pub date_time: DateTime<Utc>,
    pub tickets: Option<i32>,
    pub price: Decimal,
    pub org_img_url: Option<String>,
    pub additional_data: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial event update. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct EventPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub organization: Option<String>,
    pub location: Option<String>,
    pub date_time: Option<DateTime<Utc>>,
    pub tickets: Option<i32>,
    pub price: Option<Decimal>,
    pub org_img_url: Option<String>,
    pub additional_data: Option<String>,
}

impl EventPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.organization.is_none()
            && self.location.is_none()
            && self.date_time.is_none()
            && self.tickets.is_none()
            && self.price.is_none()
            && self.org_img_url.is_none()
            && self.additional_data.is_none()
    }
}

/// Who may act as an organizer for an event: the creator plus the admin set.
#[derive(Debug, Clone)]
pub struct EventAccess {
    pub created_by: Uuid,
    pub admin_ids: Vec<Uuid>,
}

impl EventAccess {
    pub fn allows(&self, user_id: Uuid) -> bool {
        self.created_by == user_id || self.admin_ids.contains(&user_id)
    }
}

/// One field definition of an event's registration form.
#[derive(Debug, Clone)]
pub struct CustomField {
    pub id: Uuid,
    pub event_id: Uuid,
    pub name: String,
    pub field_type: FieldType,
}

impl CustomField {
    pub fn as_def(&self) -> FieldDef {
        FieldDef {
            id: self.id,
            name: self.name.clone(),
            field_type: self.field_type,
        }
    }
}

/// One user's registration for one event. The row id is the ticket's QR
/// payload; `verified` transitions false→true exactly once.
#[derive(Debug, Clone)]
pub struct Attendance {
    pub id: Uuid,
    pub user_id: Uuid,
    pub event_id: Uuid,
    pub fields: HashMap<Uuid, FieldValue>,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
}

/// Result of the atomic registration transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationOutcome {
    Registered,
    /// The (user, event) pair already has an attendance row.
    AlreadyRegistered,
    /// Ticket capacity reached.
    Full,
    /// The event vanished between the precondition check and the transaction.
    EventMissing,
}

/// Result of the conditional verified-flag update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyOutcome {
    Verified,
    AlreadyVerified,
    NotFound,
}

/// Aggregate rating for an event.
#[derive(Debug, Clone)]
pub struct ReviewSummary {
    pub event_id: Uuid,
    pub rating: Decimal,
    pub participants: i32,
}

/// Pending-signup payload stashed in the OTP row until the code is verified.
/// Holds the Argon2id hash, never the raw password.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpPayload {
    pub password_hash: String,
    pub name: String,
}

/// One-time signup code, keyed by email (the account does not exist yet).
#[derive(Debug, Clone)]
pub struct Otp {
    pub id: Uuid,
    pub email: String,
    pub code: String,
    pub payload: OtpPayload,
    pub kind: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Otp {
    /// A code matches only if it is byte-equal and not past its expiry.
    pub fn accepts(&self, code: &str, now: DateTime<Utc>) -> bool {
        self.code == code && self.expires_at > now
    }
}

/// Outbox event for async delivery (OTP and ticket emails).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboxEvent {
    pub id: Uuid,
    pub kind: String,
    pub payload: serde_json::Value,
    pub idempotency_key: String,
}

/// Counts reported by one cleanup sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CleanupStats {
    pub events_deleted: u64,
    pub otps_deleted: u64,
}

/// OTP code length in digits.
pub const OTP_CODE_LEN: usize = 6;

/// OTP time-to-live in seconds.
pub const OTP_TTL_SECS: i64 = 300;

/// OTP `kind` discriminator for deferred signup.
pub const OTP_KIND_SIGNUP: &str = "user_signup";

/// Access-token lifetime in seconds (24 hours).
pub const TOKEN_TTL_SECS: u64 = 86400;
