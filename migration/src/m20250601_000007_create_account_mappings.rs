use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AccountMappings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AccountMappings::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AccountMappings::CompanyId)
                            .integer()
                            .not_null(),
                    )
                    // Role slug: cash, heifers, asset, accum_depr, ...
                    .col(ColumnDef::new(AccountMappings::Role).string().not_null())
                    .col(
                        ColumnDef::new(AccountMappings::AccountCode)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AccountMappings::AccountName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AccountMappings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(AccountMappings::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_account_mappings_company_id")
                            .from(AccountMappings::Table, AccountMappings::CompanyId)
                            .to(Companies::Table, Companies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_account_mappings_company_role_unique")
                    .table(AccountMappings::Table)
                    .col(AccountMappings::CompanyId)
                    .col(AccountMappings::Role)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AccountMappings::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum AccountMappings {
    Table,
    Id,
    CompanyId,
    Role,
    AccountCode,
    AccountName,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Companies {
    Table,
    Id,
}
