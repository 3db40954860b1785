//! SeaORM database migrations.

pub use sea_orm_migration::prelude::*;

mod m20260301_000001_create_users;
mod m20260301_000002_create_repositories;
mod m20260301_000003_create_issues;
mod m20260301_000004_create_external_logins;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_users::Migration),
            Box::new(m20260301_000002_create_repositories::Migration),
            Box::new(m20260301_000003_create_issues::Migration),
            Box::new(m20260301_000004_create_external_logins::Migration),
        ]
    }
}
