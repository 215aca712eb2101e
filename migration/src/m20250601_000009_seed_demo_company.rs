use sea_orm::Statement;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        let existing_companies = db
            .query_one(Statement::from_string(
                manager.get_database_backend(),
                "SELECT COUNT(*) as count FROM companies".to_string(),
            ))
            .await?;

        let count: i64 = existing_companies
            .and_then(|row| row.try_get_by_index(0).ok())
            .unwrap_or(0);

        if count == 0 {
            db.execute(Statement::from_string(
                manager.get_database_backend(),
                "INSERT INTO companies (name, is_active) VALUES ('Demo Dairy LLC', true)"
                    .to_string(),
            ))
            .await?;

            let company_id_result = db
                .query_one(Statement::from_string(
                    manager.get_database_backend(),
                    "SELECT id FROM companies WHERE name = 'Demo Dairy LLC'".to_string(),
                ))
                .await?;

            if let Some(row) = company_id_result {
                let company_id: i32 = row.try_get_by_index(0)?;

                db.execute(Statement::from_string(
                    manager.get_database_backend(),
                    format!(
                        "INSERT INTO depreciation_settings (company_id) VALUES ({})",
                        company_id
                    ),
                ))
                .await?;
            }
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute(Statement::from_string(
            manager.get_database_backend(),
            "DELETE FROM companies WHERE name = 'Demo Dairy LLC'".to_string(),
        ))
        .await?;

        Ok(())
    }
}
