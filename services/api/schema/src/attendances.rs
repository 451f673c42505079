use sea_orm::entity::prelude::*;

/// One user's registration for one event. The row id is the QR payload on
/// the attendee's ticket; `verified` flips false→true exactly once at
/// check-in and never reverts.
///
/// `fields` holds the submitted field-value map keyed by custom-field id,
/// values tagged as `{"type": ..., "value": ...}`. At most one row per
/// (user_id, event_id) — enforced by the registration transaction.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "attendances")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub event_id: Uuid,
    pub fields: Json,
    pub verified: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::events::Entity",
        from = "Column::EventId",
        to = "super::events::Column::Id"
    )]
    Event,
}

impl Related<super::events::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Event.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
