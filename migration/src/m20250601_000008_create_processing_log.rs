use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MonthlyProcessingLog::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MonthlyProcessingLog::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(MonthlyProcessingLog::CompanyId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MonthlyProcessingLog::Month)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MonthlyProcessingLog::Year)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MonthlyProcessingLog::JobType)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MonthlyProcessingLog::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(MonthlyProcessingLog::CowsProcessed)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(MonthlyProcessingLog::TotalAmount)
                            .decimal_len(15, 2)
                            .not_null()
                            .default(0.00),
                    )
                    .col(ColumnDef::new(MonthlyProcessingLog::ErrorMessage).text())
                    .col(ColumnDef::new(MonthlyProcessingLog::StartedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(MonthlyProcessingLog::CompletedAt)
                            .timestamp_with_time_zone(),
                    )
                    .col(
                        ColumnDef::new(MonthlyProcessingLog::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(MonthlyProcessingLog::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_monthly_processing_log_company_id")
                            .from(
                                MonthlyProcessingLog::Table,
                                MonthlyProcessingLog::CompanyId,
                            )
                            .to(Companies::Table, Companies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_monthly_processing_log_unique")
                    .table(MonthlyProcessingLog::Table)
                    .col(MonthlyProcessingLog::CompanyId)
                    .col(MonthlyProcessingLog::Year)
                    .col(MonthlyProcessingLog::Month)
                    .col(MonthlyProcessingLog::JobType)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MonthlyProcessingLog::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum MonthlyProcessingLog {
    Table,
    Id,
    CompanyId,
    Month,
    Year,
    JobType,
    Status,
    CowsProcessed,
    TotalAmount,
    ErrorMessage,
    StartedAt,
    CompletedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Companies {
    Table,
    Id,
}
