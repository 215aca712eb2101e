use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(JournalEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(JournalEntries::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(JournalEntries::CompanyId).integer().not_null())
                    .col(
                        ColumnDef::new(JournalEntries::EntryNumber)
                            .string()
                            .not_null(),
                    )
                    // Economic date of the event
                    .col(ColumnDef::new(JournalEntries::EntryDate).date().not_null())
                    // Accounting period the entry reports under
                    .col(ColumnDef::new(JournalEntries::Month).integer().not_null())
                    .col(ColumnDef::new(JournalEntries::Year).integer().not_null())
                    .col(ColumnDef::new(JournalEntries::EntryType).string().not_null())
                    .col(
                        ColumnDef::new(JournalEntries::Description)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(JournalEntries::TotalAmount)
                            .decimal_len(15, 2)
                            .not_null()
                            .default(0.00),
                    )
                    .col(
                        ColumnDef::new(JournalEntries::Status)
                            .string()
                            .not_null()
                            .default("posted"),
                    )
                    .col(ColumnDef::new(JournalEntries::PostedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(JournalEntries::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(JournalEntries::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_journal_entries_company_id")
                            .from(JournalEntries::Table, JournalEntries::CompanyId)
                            .to(Companies::Table, Companies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_journal_entries_company_number_unique")
                    .table(JournalEntries::Table)
                    .col(JournalEntries::CompanyId)
                    .col(JournalEntries::EntryNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_journal_entries_company_period")
                    .table(JournalEntries::Table)
                    .col(JournalEntries::CompanyId)
                    .col(JournalEntries::Year)
                    .col(JournalEntries::Month)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_journal_entries_company_type_period")
                    .table(JournalEntries::Table)
                    .col(JournalEntries::CompanyId)
                    .col(JournalEntries::EntryType)
                    .col((JournalEntries::Year, IndexOrder::Desc))
                    .col((JournalEntries::Month, IndexOrder::Desc))
                    .to_owned(),
            )
            .await?;

        // One monthly depreciation entry per company and period. Acquisition
        // and disposition entries are one-per-cow and reversal entries may
        // repeat, so the uniqueness is partial.
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX idx_journal_entries_period_type_unique \
                 ON journal_entries (company_id, year, month, entry_type) \
                 WHERE entry_type = 'depreciation'",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(JournalEntries::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum JournalEntries {
    Table,
    Id,
    CompanyId,
    EntryNumber,
    EntryDate,
    Month,
    Year,
    EntryType,
    Description,
    TotalAmount,
    Status,
    PostedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Companies {
    Table,
    Id,
}
