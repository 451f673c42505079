//! Custom registration fields.
//!
//! Each event defines the shape of its registration form as a list of
//! [`FieldDef`]s; attendees submit a map of field-definition id to a tagged
//! [`FieldValue`]. Submitted maps are validated against the definitions at
//! write time — unknown ids, missing fields, and type mismatches are all
//! rejected before anything is persisted.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The type of a custom registration field.
///
/// Wire format: lowercase string (`text` / `number` / `date`), both in the
/// JSON API and in the `custom_fields.field_type` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Number,
    Date,
}

impl FieldType {
    /// Parse from the stored column value. Returns `None` for unknown values.
    pub fn from_str(v: &str) -> Option<Self> {
        match v {
            "text" => Some(Self::Text),
            "number" => Some(Self::Number),
            "date" => Some(Self::Date),
            _ => None,
        }
    }

    /// The stored column value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Date => "date",
        }
    }
}

/// A value submitted for one custom field.
///
/// Wire format: `{"type": "text", "value": "..."}` — the tag must match the
/// [`FieldType`] of the field definition it is submitted for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Date(NaiveDate),
}

impl FieldValue {
    pub fn field_type(&self) -> FieldType {
        match self {
            Self::Text(_) => FieldType::Text,
            Self::Number(_) => FieldType::Number,
            Self::Date(_) => FieldType::Date,
        }
    }
}

/// The validation view of one custom-field definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    pub id: Uuid,
    pub name: String,
    pub field_type: FieldType,
}

/// Why a submitted field map was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldValidationError {
    #[error("unknown field {0}")]
    UnknownField(Uuid),
    #[error("missing field \"{0}\"")]
    MissingField(String),
    #[error("field \"{field}\" expects a {expected} value")]
    TypeMismatch {
        field: String,
        expected: &'static str,
    },
}

/// Validate a submitted field map against an event's definitions.
///
/// Every definition must be present exactly once with a value of the matching
/// variant, and no key may refer to a field the event does not define.
pub fn validate_fields(
    defs: &[FieldDef],
    submitted: &HashMap<Uuid, FieldValue>,
) -> Result<(), FieldValidationError> {
    for (id, _) in submitted {
        if !defs.iter().any(|d| d.id == *id) {
            return Err(FieldValidationError::UnknownField(*id));
        }
    }
    for def in defs {
        match submitted.get(&def.id) {
            None => return Err(FieldValidationError::MissingField(def.name.clone())),
            Some(value) if value.field_type() != def.field_type => {
                return Err(FieldValidationError::TypeMismatch {
                    field: def.name.clone(),
                    expected: def.field_type.as_str(),
                });
            }
            Some(_) => {}
        }
    }
    Ok(())
}
