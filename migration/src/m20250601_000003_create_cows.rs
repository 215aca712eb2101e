use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Cows::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Cows::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Cows::CompanyId).integer().not_null())
                    .col(ColumnDef::new(Cows::TagNumber).string().not_null())
                    .col(ColumnDef::new(Cows::Name).string())
                    // The depreciation clock starts the month after this date
                    .col(ColumnDef::new(Cows::FreshenDate).date().not_null())
                    .col(
                        ColumnDef::new(Cows::PurchasePrice)
                            .decimal_len(15, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Cows::SalvageValue)
                            .decimal_len(15, 2)
                            .not_null()
                            .default(0.00),
                    )
                    .col(
                        ColumnDef::new(Cows::AcquisitionType)
                            .string()
                            .not_null()
                            .default("purchased"),
                    )
                    .col(
                        ColumnDef::new(Cows::Status)
                            .string()
                            .not_null()
                            .default("active"),
                    )
                    .col(
                        ColumnDef::new(Cows::CurrentValue)
                            .decimal_len(15, 2)
                            .not_null()
                            .default(0.00),
                    )
                    .col(
                        ColumnDef::new(Cows::AccumulatedDepreciation)
                            .decimal_len(15, 2)
                            .not_null()
                            .default(0.00),
                    )
                    .col(
                        ColumnDef::new(Cows::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Cows::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cows_company_id")
                            .from(Cows::Table, Cows::CompanyId)
                            .to(Companies::Table, Companies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_cows_company_tag_unique")
                    .table(Cows::Table)
                    .col(Cows::CompanyId)
                    .col(Cows::TagNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_cows_company_status")
                    .table(Cows::Table)
                    .col(Cows::CompanyId)
                    .col(Cows::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_cows_company_freshen_date")
                    .table(Cows::Table)
                    .col(Cows::CompanyId)
                    .col(Cows::FreshenDate)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Cows::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Cows {
    Table,
    Id,
    CompanyId,
    TagNumber,
    Name,
    FreshenDate,
    PurchasePrice,
    SalvageValue,
    AcquisitionType,
    Status,
    CurrentValue,
    AccumulatedDepreciation,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Companies {
    Table,
    Id,
}
