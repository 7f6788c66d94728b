pub use sea_orm_migration::prelude::*;

mod m20260807_000001_users;
mod m20260807_000002_projects;
mod m20260807_000003_project_members;
mod m20260807_000004_costs;
mod m20260807_000005_budget_allocations;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260807_000001_users::Migration),
            Box::new(m20260807_000002_projects::Migration),
            Box::new(m20260807_000003_project_members::Migration),
            Box::new(m20260807_000004_costs::Migration),
            Box::new(m20260807_000005_budget_allocations::Migration),
        ]
    }
}
