//! Per-tenant mutual exclusion.
//!
//! Every poster serialises against other posters for the same company by
//! taking a transaction-scoped advisory lock keyed on the company id. The
//! lock is released automatically at commit or rollback; posters for
//! different companies run fully in parallel.

use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};

use crate::error::LedgerResult;

pub async fn lock_tenant<C: ConnectionTrait>(db: &C, company_id: i32) -> LedgerResult<()> {
    db.execute(Statement::from_sql_and_values(
        DatabaseBackend::Postgres,
        "SELECT pg_advisory_xact_lock($1)",
        vec![(company_id as i64).into()],
    ))
    .await?;
    Ok(())
}
