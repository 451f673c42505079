use sea_orm_migration::prelude::*;

mod m20260401_000001_create_users;
mod m20260401_000002_create_events;
mod m20260401_000003_create_event_admins;
mod m20260401_000004_create_custom_fields;
mod m20260401_000005_create_attendances;
mod m20260401_000006_create_reviews;
mod m20260401_000007_create_otps;
mod m20260401_000008_create_outbox_events;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260401_000001_create_users::Migration),
            Box::new(m20260401_000002_create_events::Migration),
            Box::new(m20260401_000003_create_event_admins::Migration),
            Box::new(m20260401_000004_create_custom_fields::Migration),
            Box::new(m20260401_000005_create_attendances::Migration),
            Box::new(m20260401_000006_create_reviews::Migration),
            Box::new(m20260401_000007_create_otps::Migration),
            Box::new(m20260401_000008_create_outbox_events::Migration),
        ]
    }
}
