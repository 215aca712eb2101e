//! Monthly Posting Scheduler
//!
//! A long-lived task that wakes hourly and, during the 06:00 UTC hour, posts
//! the previous calendar month for every company whose configured processing
//! day is today. Posting is idempotent and serialised per tenant by the
//! advisory lock, so an extra wake-up is harmless.

use std::time::Duration;

use chrono::{Datelike, Timelike, Utc};
use sea_orm::{DatabaseConnection, EntityTrait};

use crate::entities::DepreciationSetting;
use crate::error::LedgerResult;
use crate::services::depreciation::{previous_month, DepreciationService};

const POSTING_HOUR_UTC: u32 = 6;

pub async fn run(db: DatabaseConnection) {
    let mut tick = tokio::time::interval(Duration::from_secs(3600));
    loop {
        tick.tick().await;
        if Utc::now().hour() != POSTING_HOUR_UTC {
            continue;
        }
        match run_due_tenants(&db).await {
            Ok(posted) if posted > 0 => {
                tracing::info!(posted, "scheduled monthly posting finished");
            }
            Ok(_) => {}
            Err(err) => tracing::error!(%err, "scheduled monthly posting failed"),
        }
    }
}

/// Post the previous month for every tenant whose processing day is today.
/// Returns how many journals were created.
pub async fn run_due_tenants(db: &DatabaseConnection) -> LedgerResult<u32> {
    let today = Utc::now().date_naive();
    let (year, month) = previous_month(today.year(), today.month());
    let depreciation = DepreciationService::new();

    let all_settings = DepreciationSetting::find().all(db).await?;

    let mut posted = 0;
    for settings in all_settings {
        if settings.journal_processing_day != today.day() as i32 {
            continue;
        }
        match depreciation
            .post_monthly(db, settings.company_id, month, year, None, false)
            .await
        {
            Ok(summary) if summary.journal_created => posted += 1,
            Ok(_) => {}
            Err(err) => {
                tracing::error!(
                    company_id = settings.company_id,
                    %err,
                    "scheduled posting failed for tenant"
                );
            }
        }
    }
    Ok(posted)
}
