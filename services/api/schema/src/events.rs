use sea_orm::entity::prelude::*;

/// An event and its registration settings.
///
/// `tickets` is the capacity cap; `NULL` means unlimited. The review
/// aggregate, custom-field definitions, attendances, and admin links are all
/// owned rows removed with the event (`ON DELETE CASCADE`).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "events")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub organization: String,
    pub location: String,
    pub date_time: chrono::DateTime<chrono::Utc>,
    pub tickets: Option<i32>,
    pub price: Decimal,
    pub org_img_url: Option<String>,
    pub additional_data: Option<String>,
    pub created_by: Uuid,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::CreatedBy",
        to = "super::users::Column::Id"
    )]
    Creator,
    #[sea_orm(has_many = "super::custom_fields::Entity")]
    CustomFields,
    #[sea_orm(has_many = "super::attendances::Entity")]
    Attendances,
    #[sea_orm(has_many = "super::event_admins::Entity")]
    EventAdmins,
    #[sea_orm(has_one = "super::reviews::Entity")]
    Review,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Creator.def()
    }
}

impl Related<super::custom_fields::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CustomFields.def()
    }
}

impl Related<super::attendances::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attendances.def()
    }
}

impl Related<super::event_admins::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EventAdmins.def()
    }
}

impl Related<super::reviews::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Review.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
