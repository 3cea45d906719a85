//! Ledger aggregates on the financial profile.
//!
//! `total_income_minor` / `total_outcome_minor` are derived from
//! `transactions` and rewritten by the engine after every ledger mutation.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // SQLite accepts a single column per ALTER TABLE.
        manager
            .alter_table(
                Table::alter()
                    .table(UserFinancialProfile::Table)
                    .add_column(
                        ColumnDef::new(UserFinancialProfile::TotalIncomeMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(UserFinancialProfile::Table)
                    .add_column(
                        ColumnDef::new(UserFinancialProfile::TotalOutcomeMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(UserFinancialProfile::Table)
                    .drop_column(UserFinancialProfile::TotalOutcomeMinor)
                    .to_owned(),
            )
            .await?;
        manager
            .alter_table(
                Table::alter()
                    .table(UserFinancialProfile::Table)
                    .drop_column(UserFinancialProfile::TotalIncomeMinor)
                    .to_owned(),
            )
            .await?;
        Ok(())
    }
}

#[derive(Iden)]
enum UserFinancialProfile {
    Table,
    TotalIncomeMinor,
    TotalOutcomeMinor,
}
