//! GraphQL Resolvers for the Journal
//!
//! Ledger reads, the monthly depreciation poster, the batch orchestrators,
//! and entry reversal.

use async_graphql::{Context, FieldResult, Object};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use std::sync::Arc;

use crate::entities::{
    journal_entry, journal_line, processing_log, JournalEntry, JournalEntryFilter,
    JournalEntryWithLines, JournalLine, ProcessingLog, ProcessingMode,
};
use crate::error::LedgerError;
use crate::services::depreciation::DepreciationService;
use crate::services::journal::JournalService;
use crate::services::processing::ProcessingService;

use shared::models::{
    HistoricalRunSummary, MissingJournalsResult, PostingSummary, ReversalResult,
};

#[derive(Default)]
pub struct LedgerQuery;

#[Object]
impl LedgerQuery {
    /// Get journal entries for a company, newest period first
    async fn journal_entries(
        &self,
        ctx: &Context<'_>,
        company_id: i32,
        filter: Option<JournalEntryFilter>,
    ) -> FieldResult<Vec<journal_entry::Model>> {
        let db = ctx.data::<Arc<DatabaseConnection>>()?;

        let mut query =
            JournalEntry::find().filter(journal_entry::Column::CompanyId.eq(company_id));

        if let Some(filter) = filter {
            if let Some(entry_type) = filter.entry_type {
                query = query.filter(journal_entry::Column::EntryType.eq(entry_type));
            }
            if let Some(year) = filter.year {
                query = query.filter(journal_entry::Column::Year.eq(year));
            }
            if let Some(month) = filter.month {
                query = query.filter(journal_entry::Column::Month.eq(month));
            }
            if let Some(from) = filter.from_date {
                query = query.filter(journal_entry::Column::EntryDate.gte(from));
            }
            if let Some(to) = filter.to_date {
                query = query.filter(journal_entry::Column::EntryDate.lte(to));
            }
            if let Some(cow_id) = filter.cow_id {
                let entry_ids: Vec<i32> = JournalLine::find()
                    .filter(journal_line::Column::CowId.eq(cow_id))
                    .all(db.as_ref())
                    .await?
                    .into_iter()
                    .map(|l| l.journal_entry_id)
                    .collect();
                query = query.filter(journal_entry::Column::Id.is_in(entry_ids));
            }
        }

        Ok(query
            .order_by_desc(journal_entry::Column::Year)
            .order_by_desc(journal_entry::Column::Month)
            .order_by_desc(journal_entry::Column::Id)
            .all(db.as_ref())
            .await?)
    }

    /// Get one journal entry with its lines
    async fn journal_entry_with_lines(
        &self,
        ctx: &Context<'_>,
        id: i32,
    ) -> FieldResult<Option<JournalEntryWithLines>> {
        let db = ctx.data::<Arc<DatabaseConnection>>()?;

        let Some(entry) = JournalEntry::find_by_id(id).one(db.as_ref()).await? else {
            return Ok(None);
        };
        let lines = JournalLine::find()
            .filter(journal_line::Column::JournalEntryId.eq(id))
            .all(db.as_ref())
            .await?;

        Ok(Some(JournalEntryWithLines {
            journal_entry: entry,
            lines,
        }))
    }

    /// Monthly processing log rows for a company
    async fn processing_log(
        &self,
        ctx: &Context<'_>,
        company_id: i32,
        year: Option<i32>,
    ) -> FieldResult<Vec<processing_log::Model>> {
        let db = ctx.data::<Arc<DatabaseConnection>>()?;

        let mut query =
            ProcessingLog::find().filter(processing_log::Column::CompanyId.eq(company_id));
        if let Some(year) = year {
            query = query.filter(processing_log::Column::Year.eq(year));
        }

        Ok(query
            .order_by_desc(processing_log::Column::Year)
            .order_by_desc(processing_log::Column::Month)
            .all(db.as_ref())
            .await?)
    }
}

#[derive(Default)]
pub struct LedgerMutation;

#[Object]
impl LedgerMutation {
    /// Post one company's monthly depreciation entry
    async fn post_monthly_depreciation(
        &self,
        ctx: &Context<'_>,
        company_id: i32,
        month: i32,
        year: i32,
        mode: Option<ProcessingMode>,
        force_recreate: Option<bool>,
    ) -> FieldResult<PostingSummary> {
        let db = ctx.data::<Arc<DatabaseConnection>>()?;
        let service = ctx.data::<Arc<DepreciationService>>()?;

        let month = u32::try_from(month)
            .ok()
            .filter(|m| (1..=12).contains(m))
            .ok_or_else(|| LedgerError::DataAnomaly(format!("invalid month {month}")))?;

        Ok(service
            .post_monthly(
                db.as_ref(),
                company_id,
                month,
                year,
                mode,
                force_recreate.unwrap_or(false),
            )
            .await?)
    }

    /// Backfill a company's full herd history, month by month
    async fn process_historical(
        &self,
        ctx: &Context<'_>,
        company_id: i32,
        start_year: Option<i32>,
        end_year: Option<i32>,
    ) -> FieldResult<HistoricalRunSummary> {
        let db = ctx.data::<Arc<DatabaseConnection>>()?;
        let service = ctx.data::<Arc<ProcessingService>>()?;
        Ok(service
            .process_historical(db.as_ref(), company_id, start_year, end_year)
            .await?)
    }

    /// Re-post any period whose depreciation journal is missing
    async fn process_missing_journals(
        &self,
        ctx: &Context<'_>,
        company_id: i32,
    ) -> FieldResult<MissingJournalsResult> {
        let db = ctx.data::<Arc<DatabaseConnection>>()?;
        let service = ctx.data::<Arc<ProcessingService>>()?;
        Ok(service
            .process_missing_journals(db.as_ref(), company_id)
            .await?)
    }

    /// Append a reversal entry with debits and credits swapped
    async fn reverse_entry(
        &self,
        ctx: &Context<'_>,
        entry_id: i32,
        reason: String,
    ) -> FieldResult<ReversalResult> {
        let db = ctx.data::<Arc<DatabaseConnection>>()?;
        let journal = JournalService::new();
        let reversal = journal
            .reverse_entry(db.as_ref(), entry_id, &reason)
            .await?;
        Ok(ReversalResult {
            original_entry_id: entry_id,
            reversal_entry_id: reversal.id,
        })
    }
}
