use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DepreciationSettings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DepreciationSettings::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(DepreciationSettings::CompanyId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DepreciationSettings::DepreciationMethod)
                            .string()
                            .not_null()
                            .default("straight-line"),
                    )
                    .col(
                        ColumnDef::new(DepreciationSettings::DepreciationYears)
                            .integer()
                            .not_null()
                            .default(5),
                    )
                    .col(
                        ColumnDef::new(DepreciationSettings::SalvagePercentage)
                            .decimal_len(5, 2)
                            .not_null()
                            .default(0.00),
                    )
                    .col(
                        ColumnDef::new(DepreciationSettings::RoundToNearestDollar)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(DepreciationSettings::IncludePartialMonths)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(DepreciationSettings::FiscalYearStartMonth)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(DepreciationSettings::JournalProcessingDay)
                            .integer()
                            .not_null()
                            .default(5),
                    )
                    .col(
                        ColumnDef::new(DepreciationSettings::ProcessingMode)
                            .string()
                            .not_null()
                            .default("historical"),
                    )
                    .col(
                        ColumnDef::new(DepreciationSettings::HistoricalProcessingCompleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(DepreciationSettings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(DepreciationSettings::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_depreciation_settings_company_id")
                            .from(
                                DepreciationSettings::Table,
                                DepreciationSettings::CompanyId,
                            )
                            .to(Companies::Table, Companies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One settings row per company
        manager
            .create_index(
                Index::create()
                    .name("idx_depreciation_settings_company_unique")
                    .table(DepreciationSettings::Table)
                    .col(DepreciationSettings::CompanyId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DepreciationSettings::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum DepreciationSettings {
    Table,
    Id,
    CompanyId,
    DepreciationMethod,
    DepreciationYears,
    SalvagePercentage,
    RoundToNearestDollar,
    IncludePartialMonths,
    FiscalYearStartMonth,
    JournalProcessingDay,
    ProcessingMode,
    HistoricalProcessingCompleted,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Companies {
    Table,
    Id,
}
