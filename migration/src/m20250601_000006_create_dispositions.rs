use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Dispositions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Dispositions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Dispositions::CompanyId).integer().not_null())
                    .col(ColumnDef::new(Dispositions::CowId).integer().not_null())
                    .col(
                        ColumnDef::new(Dispositions::DispositionDate)
                            .date()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Dispositions::DispositionType)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Dispositions::SaleAmount)
                            .decimal_len(15, 2)
                            .not_null()
                            .default(0.00),
                    )
                    // Derived fields, written back by the disposition poster
                    .col(ColumnDef::new(Dispositions::FinalBookValue).decimal_len(15, 2))
                    .col(ColumnDef::new(Dispositions::GainLoss).decimal_len(15, 2))
                    .col(ColumnDef::new(Dispositions::JournalEntryId).integer())
                    .col(ColumnDef::new(Dispositions::Notes).text())
                    .col(
                        ColumnDef::new(Dispositions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Dispositions::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_dispositions_company_id")
                            .from(Dispositions::Table, Dispositions::CompanyId)
                            .to(Companies::Table, Companies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_dispositions_cow_id")
                            .from(Dispositions::Table, Dispositions::CowId)
                            .to(Cows::Table, Cows::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_dispositions_journal_entry_id")
                            .from(Dispositions::Table, Dispositions::JournalEntryId)
                            .to(JournalEntries::Table, JournalEntries::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // At most one disposition per cow
        manager
            .create_index(
                Index::create()
                    .name("idx_dispositions_cow_unique")
                    .table(Dispositions::Table)
                    .col(Dispositions::CowId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_dispositions_company_date")
                    .table(Dispositions::Table)
                    .col(Dispositions::CompanyId)
                    .col(Dispositions::DispositionDate)
                    .to_owned(),
            )
            .await?;

        // Denormalised back-pointer on the cow row
        manager
            .alter_table(
                Table::alter()
                    .table(Cows::Table)
                    .add_column(ColumnDef::new(Cows::DispositionId).integer())
                    .to_owned(),
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                "ALTER TABLE cows ADD CONSTRAINT fk_cows_disposition_id \
                 FOREIGN KEY (disposition_id) REFERENCES dispositions (id) ON DELETE SET NULL",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("ALTER TABLE cows DROP CONSTRAINT IF EXISTS fk_cows_disposition_id")
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(Cows::Table)
                    .drop_column(Cows::DispositionId)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Dispositions::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Dispositions {
    Table,
    Id,
    CompanyId,
    CowId,
    DispositionDate,
    DispositionType,
    SaleAmount,
    FinalBookValue,
    GainLoss,
    JournalEntryId,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Companies {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Cows {
    Table,
    Id,
    DispositionId,
}

#[derive(DeriveIden)]
enum JournalEntries {
    Table,
    Id,
}
