//! Schema migrations, written with the SeaQuery builder so they run on
//! Postgres in production and on SQLite in the test suite.

pub use sea_orm_migration::prelude::*;

mod m20250101_000001_create_users;
mod m20250101_000002_create_parking_zones;
mod m20250101_000003_create_parking_spots;
mod m20250101_000004_create_reservations;
mod m20250101_000005_create_payments;
mod m20250101_000006_create_audit_logs;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_users::Migration),
            Box::new(m20250101_000002_create_parking_zones::Migration),
            Box::new(m20250101_000003_create_parking_spots::Migration),
            Box::new(m20250101_000004_create_reservations::Migration),
            Box::new(m20250101_000005_create_payments::Migration),
            Box::new(m20250101_000006_create_audit_logs::Migration),
        ]
    }
}
