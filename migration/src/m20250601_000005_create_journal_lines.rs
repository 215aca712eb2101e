use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(JournalLines::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(JournalLines::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(JournalLines::JournalEntryId)
                            .integer()
                            .not_null(),
                    )
                    // Set for per-cow depreciation and acquisition lines,
                    // null for aggregate lines
                    .col(ColumnDef::new(JournalLines::CowId).integer())
                    .col(
                        ColumnDef::new(JournalLines::AccountCode)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(JournalLines::AccountName)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(JournalLines::Description).text())
                    .col(
                        ColumnDef::new(JournalLines::DebitAmount)
                            .decimal_len(15, 2)
                            .not_null()
                            .default(0.00),
                    )
                    .col(
                        ColumnDef::new(JournalLines::CreditAmount)
                            .decimal_len(15, 2)
                            .not_null()
                            .default(0.00),
                    )
                    .col(ColumnDef::new(JournalLines::LineType).string().not_null())
                    .col(
                        ColumnDef::new(JournalLines::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_journal_lines_journal_entry_id")
                            .from(JournalLines::Table, JournalLines::JournalEntryId)
                            .to(JournalEntries::Table, JournalEntries::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_journal_lines_cow_id")
                            .from(JournalLines::Table, JournalLines::CowId)
                            .to(Cows::Table, Cows::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_journal_lines_journal_entry_id")
                    .table(JournalLines::Table)
                    .col(JournalLines::JournalEntryId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_journal_lines_cow_id")
                    .table(JournalLines::Table)
                    .col(JournalLines::CowId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_journal_lines_account_code")
                    .table(JournalLines::Table)
                    .col(JournalLines::AccountCode)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(JournalLines::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum JournalLines {
    Table,
    Id,
    JournalEntryId,
    CowId,
    AccountCode,
    AccountName,
    Description,
    DebitAmount,
    CreditAmount,
    LineType,
    CreatedAt,
}

#[derive(DeriveIden)]
enum JournalEntries {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Cows {
    Table,
    Id,
}
