//! GraphQL Resolvers for Reports
//!
//! Ledger-derived dashboard balances and the monthly headcount
//! reconciliation.

use async_graphql::{Context, FieldResult, Object};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::services::reconciliation::ReconciliationService;

use shared::models::{DashboardStats, ReconciliationReport};

#[derive(Default)]
pub struct ReportsQuery;

#[Object]
impl ReportsQuery {
    /// Active herd counts plus balances derived from the journal
    async fn dashboard_stats(
        &self,
        ctx: &Context<'_>,
        company_id: i32,
    ) -> FieldResult<DashboardStats> {
        let db = ctx.data::<Arc<DatabaseConnection>>()?;
        let service = ctx.data::<Arc<ReconciliationService>>()?;
        Ok(service.dashboard_stats(db.as_ref(), company_id).await?)
    }

    /// Twelve months of headcount flow with actual end-of-month counts for
    /// drift diagnostics
    async fn monthly_reconciliation(
        &self,
        ctx: &Context<'_>,
        company_id: i32,
        year: i32,
        apply_year_adjustment: Option<bool>,
    ) -> FieldResult<ReconciliationReport> {
        let db = ctx.data::<Arc<DatabaseConnection>>()?;
        let service = ctx.data::<Arc<ReconciliationService>>()?;
        Ok(service
            .monthly_reconciliation(
                db.as_ref(),
                company_id,
                year,
                apply_year_adjustment.unwrap_or(false),
            )
            .await?)
    }
}
