pub use sea_orm_migration::prelude::*;

mod m20241201_000000_init;
mod m20241215_000000_financial_aggregates;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20241201_000000_init::Migration),
            Box::new(m20241215_000000_financial_aggregates::Migration),
        ]
    }
}
