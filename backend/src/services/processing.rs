//! Processing Orchestrators
//!
//! The monthly processing log lifecycle plus the two batch drivers: the
//! historical backfill that replays a company's whole herd history month by
//! month, and the repair sweep that re-posts any period whose journal is
//! missing or whose last run failed. Both work one month per transaction so
//! a cancelled run leaves a consistent prefix and a re-run resumes where it
//! stopped.

use chrono::{Datelike, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    Set,
};

use crate::entities::{
    cow, disposition, journal_entry, processing_log, Cow, Disposition, EntryType, JobStatus,
    JournalEntry, ProcessingLog, ProcessingLogActiveModel, ProcessingMode,
};
use crate::error::{LedgerError, LedgerResult};
use crate::services::acquisition::AcquisitionService;
use crate::services::depreciation::{next_month, previous_month, DepreciationService};
use crate::services::disposition::DispositionService;

use shared::models::{HistoricalRunSummary, MissingJournalsResult, YearSummary};

const DEPRECIATION_JOB: &str = "depreciation";

/// Upper bound on periods touched by one repair sweep; the caller is told
/// when the sweep stopped short.
const MAX_PERIODS_PER_RUN: usize = 120;

pub struct ProcessingService;

impl ProcessingService {
    pub fn new() -> Self {
        Self
    }

    // --- Processing log lifecycle -------------------------------------------

    pub async fn upsert_log_processing<C: ConnectionTrait>(
        &self,
        db: &C,
        company_id: i32,
        month: u32,
        year: i32,
    ) -> LedgerResult<()> {
        let existing = self.find_log(db, company_id, month, year).await?;
        let now = Utc::now();

        match existing {
            Some(log) => {
                let mut active: ProcessingLogActiveModel = log.into();
                active.status = Set(JobStatus::Processing);
                active.started_at = Set(Some(now));
                active.error_message = Set(None);
                active.updated_at = Set(now);
                active.update(db).await?;
            }
            None => {
                ProcessingLogActiveModel {
                    company_id: Set(company_id),
                    month: Set(month as i32),
                    year: Set(year),
                    job_type: Set(DEPRECIATION_JOB.to_string()),
                    status: Set(JobStatus::Processing),
                    started_at: Set(Some(now)),
                    ..Default::default()
                }
                .insert(db)
                .await?;
            }
        }
        Ok(())
    }

    pub async fn complete_log<C: ConnectionTrait>(
        &self,
        db: &C,
        company_id: i32,
        month: u32,
        year: i32,
        cows_processed: i32,
        total_amount: Decimal,
    ) -> LedgerResult<()> {
        let log = self
            .find_log(db, company_id, month, year)
            .await?
            .ok_or_else(|| {
                LedgerError::not_found("processing log", format!("{company_id}/{year}-{month:02}"))
            })?;

        let now = Utc::now();
        let mut active: ProcessingLogActiveModel = log.into();
        active.status = Set(JobStatus::Completed);
        active.cows_processed = Set(cows_processed);
        active.total_amount = Set(total_amount);
        active.completed_at = Set(Some(now));
        active.updated_at = Set(now);
        active.update(db).await?;
        Ok(())
    }

    /// Runs outside the failed poster transaction so the failure survives
    /// the rollback.
    pub async fn mark_log_failed(
        &self,
        db: &DatabaseConnection,
        company_id: i32,
        month: u32,
        year: i32,
        error: &str,
    ) -> LedgerResult<()> {
        let now = Utc::now();
        match self.find_log(db, company_id, month, year).await? {
            Some(log) => {
                let mut active: ProcessingLogActiveModel = log.into();
                active.status = Set(JobStatus::Failed);
                active.error_message = Set(Some(error.to_string()));
                active.updated_at = Set(now);
                active.update(db).await?;
            }
            None => {
                ProcessingLogActiveModel {
                    company_id: Set(company_id),
                    month: Set(month as i32),
                    year: Set(year),
                    job_type: Set(DEPRECIATION_JOB.to_string()),
                    status: Set(JobStatus::Failed),
                    error_message: Set(Some(error.to_string())),
                    started_at: Set(Some(now)),
                    ..Default::default()
                }
                .insert(db)
                .await?;
            }
        }
        Ok(())
    }

    async fn find_log<C: ConnectionTrait>(
        &self,
        db: &C,
        company_id: i32,
        month: u32,
        year: i32,
    ) -> LedgerResult<Option<processing_log::Model>> {
        Ok(ProcessingLog::find()
            .filter(processing_log::Column::CompanyId.eq(company_id))
            .filter(processing_log::Column::Month.eq(month as i32))
            .filter(processing_log::Column::Year.eq(year))
            .filter(processing_log::Column::JobType.eq(DEPRECIATION_JOB))
            .one(db)
            .await?)
    }

    // --- Historical backfill ------------------------------------------------

    /// Replay a company's history: acquisitions first, then every month from
    /// the herd's first depreciation month through the last closed month,
    /// then any unposted dispositions. Idempotent end to end.
    pub async fn process_historical(
        &self,
        db: &DatabaseConnection,
        company_id: i32,
        start_year: Option<i32>,
        end_year: Option<i32>,
    ) -> LedgerResult<HistoricalRunSummary> {
        let settings = crate::services::depreciation::load_settings(db, company_id).await?;

        let cows = Cow::find()
            .filter(cow::Column::CompanyId.eq(company_id))
            .all(db)
            .await?;

        let mut summary = HistoricalRunSummary {
            company_id,
            acquisitions_posted: 0,
            dispositions_posted: 0,
            years: Vec::new(),
            errors: Vec::new(),
        };

        let Some(first_freshen) = cows.iter().map(|c| c.freshen_date).min() else {
            return Ok(summary);
        };

        let acquisition = AcquisitionService::new();
        let (posted, errors) = acquisition.post_all_for_company(db, company_id).await?;
        summary.acquisitions_posted = posted;
        summary.errors.extend(errors);

        let depreciation = DepreciationService::new();
        let today = Utc::now().date_naive();
        let last_closed = previous_month(today.year(), today.month());
        let first_period = next_month(first_freshen.year(), first_freshen.month());

        let from_year = start_year.unwrap_or(first_period.0);
        let to_year = end_year.unwrap_or(last_closed.0);

        for year in from_year..=to_year {
            let mut year_summary = YearSummary {
                year,
                months_processed: 0,
                total_amount: Decimal::ZERO,
            };

            for month in 1..=12u32 {
                if (year, month) < first_period || (year, month) > last_closed {
                    continue;
                }
                // One transaction per month keeps long backfills resumable
                match depreciation
                    .post_monthly(
                        db,
                        company_id,
                        month,
                        year,
                        Some(ProcessingMode::Historical),
                        false,
                    )
                    .await
                {
                    Ok(posting) => {
                        if posting.journal_created {
                            year_summary.months_processed += 1;
                            year_summary.total_amount += posting.total_amount;
                        }
                    }
                    Err(err) => {
                        summary.errors.push(format!("{year}-{month:02}: {err}"));
                    }
                }
            }

            summary.years.push(year_summary);
        }

        let disposition_service = DispositionService::new();
        let unposted = Disposition::find()
            .filter(disposition::Column::CompanyId.eq(company_id))
            .filter(disposition::Column::JournalEntryId.is_null())
            .all(db)
            .await?;
        for disp in unposted {
            match disposition_service.post_disposition(db, disp.id).await {
                Ok(_) => summary.dispositions_posted += 1,
                Err(err) => summary
                    .errors
                    .push(format!("disposition {}: {err}", disp.id)),
            }
        }

        let mut settings_active: crate::entities::DepreciationSettingActiveModel = settings.into();
        settings_active.historical_processing_completed = Set(true);
        settings_active.updated_at = Set(Utc::now());
        settings_active.update(db).await?;

        tracing::info!(
            company_id,
            acquisitions = summary.acquisitions_posted,
            dispositions = summary.dispositions_posted,
            errors = summary.errors.len(),
            "historical processing finished"
        );

        Ok(summary)
    }

    // --- Missing-journal repair sweep ---------------------------------------

    /// Re-post every period between the herd's first depreciation month and
    /// the last closed month that has no depreciation entry. Periods whose
    /// last run failed are retried the same way.
    pub async fn process_missing_journals(
        &self,
        db: &DatabaseConnection,
        company_id: i32,
    ) -> LedgerResult<MissingJournalsResult> {
        let cows = Cow::find()
            .filter(cow::Column::CompanyId.eq(company_id))
            .all(db)
            .await?;

        let mut result = MissingJournalsResult {
            company_id,
            processed: 0,
            errors: Vec::new(),
            truncated: false,
        };

        let Some(first_freshen) = cows.iter().map(|c| c.freshen_date).min() else {
            return Ok(result);
        };

        let depreciation = DepreciationService::new();
        let today = Utc::now().date_naive();
        let last_closed = previous_month(today.year(), today.month());
        let (mut year, mut month) = next_month(first_freshen.year(), first_freshen.month());

        let mut visited = 0usize;
        while (year, month) <= last_closed {
            if visited >= MAX_PERIODS_PER_RUN {
                result.truncated = true;
                break;
            }
            visited += 1;

            let exists = JournalEntry::find()
                .filter(journal_entry::Column::CompanyId.eq(company_id))
                .filter(journal_entry::Column::Year.eq(year))
                .filter(journal_entry::Column::Month.eq(month as i32))
                .filter(journal_entry::Column::EntryType.eq(EntryType::Depreciation))
                .one(db)
                .await?
                .is_some();

            if !exists {
                match depreciation
                    .post_monthly(db, company_id, month, year, None, false)
                    .await
                {
                    Ok(posting) if posting.journal_created => result.processed += 1,
                    Ok(_) => {}
                    Err(err) => result.errors.push(format!("{year}-{month:02}: {err}")),
                }
            }

            let (ny, nm) = next_month(year, month);
            year = ny;
            month = nm;
        }

        Ok(result)
    }
}
