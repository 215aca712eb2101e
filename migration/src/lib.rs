pub use sea_orm_migration::prelude::*;

mod m20250601_000001_create_companies;
mod m20250601_000002_create_depreciation_settings;
mod m20250601_000003_create_cows;
mod m20250601_000004_create_journal_entries;
mod m20250601_000005_create_journal_lines;
mod m20250601_000006_create_dispositions;
mod m20250601_000007_create_account_mappings;
mod m20250601_000008_create_processing_log;
mod m20250601_000009_seed_demo_company;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_companies::Migration),
            Box::new(m20250601_000002_create_depreciation_settings::Migration),
            Box::new(m20250601_000003_create_cows::Migration),
            Box::new(m20250601_000004_create_journal_entries::Migration),
            Box::new(m20250601_000005_create_journal_lines::Migration),
            // Dispositions reference both cows and journal entries
            Box::new(m20250601_000006_create_dispositions::Migration),
            Box::new(m20250601_000007_create_account_mappings::Migration),
            Box::new(m20250601_000008_create_processing_log::Migration),
            Box::new(m20250601_000009_seed_demo_company::Migration),
        ]
    }
}
