//! Depreciation Service
//!
//! Straight-line depreciation for the dairy herd: the pure schedule math, the
//! per-cow catch-up poster, and the per-company monthly poster. The clock
//! starts the month after a cow freshens and runs for the configured useful
//! life or until the depreciable basis is consumed, whichever comes first.

use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    Set, TransactionTrait,
};

use crate::data::chart_of_accounts::{resolve_chart, ResolvedChart};
use crate::entities::{
    cow, depreciation_setting, disposition, journal_entry, journal_line, Cow, CowActiveModel,
    CowStatus, DepreciationSetting, Disposition, EntryType, JournalEntry, JournalLine,
    ProcessingMode,
};
use crate::error::{LedgerError, LedgerResult};
use crate::services::invariants::depreciation_date_allowed;
use crate::services::journal::{JournalService, LineSpec, NewEntry};
use crate::services::processing::ProcessingService;
use crate::services::tenant_lock::lock_tenant;

use shared::models::{CatchUpResult, PostingSummary};

// --- Calendar helpers -------------------------------------------------------

pub fn days_in_month(year: i32, month: u32) -> u32 {
    end_of_month(year, month).day()
}

pub fn end_of_month(year: i32, month: u32) -> NaiveDate {
    let (ny, nm) = next_month(year, month);
    NaiveDate::from_ymd_opt(ny, nm, 1)
        .and_then(|d| d.pred_opt())
        .expect("valid month")
}

pub fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

pub fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

/// Whole months between two dates, ignoring days. Never negative.
pub fn months_elapsed(freshen: NaiveDate, target: NaiveDate) -> i32 {
    let delta = (target.year() - freshen.year()) * 12 + target.month() as i32
        - freshen.month() as i32;
    delta.max(0)
}

// --- Pure schedule math -----------------------------------------------------

pub fn round_amount(amount: Decimal, round_to_dollar: bool) -> Decimal {
    if round_to_dollar {
        amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
    } else {
        amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }
}

/// Straight-line monthly rate: (price - salvage) / (years * 12)
pub fn monthly_rate(
    price: Decimal,
    salvage: Decimal,
    years: i32,
    round_to_dollar: bool,
) -> Decimal {
    if years <= 0 {
        return Decimal::ZERO;
    }
    round_amount((price - salvage) / Decimal::from(years * 12), round_to_dollar)
}

/// Depreciation for the k-th month of service (k = months elapsed since the
/// freshen month). Zero outside the useful life; the terminal months post
/// only what is left of the basis so accumulated never exceeds
/// price - salvage.
pub fn monthly_amount_at(
    price: Decimal,
    salvage: Decimal,
    years: i32,
    round_to_dollar: bool,
    k: i32,
) -> Decimal {
    let life_months = years * 12;
    if k < 1 || k > life_months {
        return Decimal::ZERO;
    }
    let rate = monthly_rate(price, salvage, years, round_to_dollar);
    let basis = price - salvage;
    let taken = rate * Decimal::from(k - 1);
    let remaining = (basis - taken).max(Decimal::ZERO);
    if k == life_months {
        // The last scheduled month absorbs the rounding residue so the
        // accumulated total lands on exactly price - salvage
        remaining
    } else {
        rate.min(remaining)
    }
}

/// Depreciation owed for the month containing `target` (its end of month
/// fixes the position in the schedule).
pub fn monthly_depreciation(
    price: Decimal,
    salvage: Decimal,
    years: i32,
    round_to_dollar: bool,
    freshen: NaiveDate,
    target: NaiveDate,
) -> Decimal {
    let eom = end_of_month(target.year(), target.month());
    monthly_amount_at(
        price,
        salvage,
        years,
        round_to_dollar,
        months_elapsed(freshen, eom),
    )
}

/// Pro-rated depreciation through a mid-month date: rate scaled by the
/// elapsed fraction of the month, capped by the remaining basis.
pub fn partial_month_depreciation(
    price: Decimal,
    salvage: Decimal,
    years: i32,
    round_to_dollar: bool,
    freshen: NaiveDate,
    through: NaiveDate,
) -> Decimal {
    let k = months_elapsed(freshen, end_of_month(through.year(), through.month()));
    if k < 1 || k > years * 12 {
        return Decimal::ZERO;
    }
    let rate = monthly_rate(price, salvage, years, round_to_dollar);
    let days = Decimal::from(days_in_month(through.year(), through.month()));
    let elapsed = Decimal::from(through.day());
    let partial = round_amount(rate * elapsed / days, round_to_dollar);

    let basis = price - salvage;
    let taken = rate * Decimal::from(k - 1);
    partial.min((basis - taken).max(Decimal::ZERO))
}

/// One month a catch-up run must materialise
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledMonth {
    pub year: i32,
    pub month: u32,
    pub entry_date: NaiveDate,
    pub amount: Decimal,
}

/// Plan the depreciation months for a cow from the month after
/// `start_after` (or the freshen month) through `through`, clamped by the
/// cow's disposition date when present. Entries are dated end-of-month; the
/// one exception is a terminal month cut short by a disposition, which is
/// dated the disposition date itself.
#[allow(clippy::too_many_arguments)]
pub fn depreciation_schedule(
    price: Decimal,
    salvage: Decimal,
    years: i32,
    round_to_dollar: bool,
    freshen: NaiveDate,
    start_after: Option<(i32, u32)>,
    through: NaiveDate,
    disposition_date: Option<NaiveDate>,
) -> Vec<ScheduledMonth> {
    let terminal_is_disposition = matches!(disposition_date, Some(d) if d <= through);
    let through = match disposition_date {
        Some(d) if d < through => d,
        _ => through,
    };

    let (mut year, mut month) = match start_after {
        Some((y, m)) => next_month(y, m),
        None => next_month(freshen.year(), freshen.month()),
    };

    // Never schedule before the depreciation clock starts
    let (fy, fm) = next_month(freshen.year(), freshen.month());
    if (year, month) < (fy, fm) {
        year = fy;
        month = fm;
    }

    let mut plan = Vec::new();
    while (year, month) <= (through.year(), through.month()) {
        let eom = end_of_month(year, month);
        let k = months_elapsed(freshen, eom);
        let amount = monthly_amount_at(price, salvage, years, round_to_dollar, k);
        if amount.is_zero() {
            // Past the life ceiling or out of basis: nothing further accrues
            break;
        }
        let entry_date = if terminal_is_disposition
            && (year, month) == (through.year(), through.month())
            && through < eom
        {
            through
        } else {
            eom
        };
        plan.push(ScheduledMonth {
            year,
            month,
            entry_date,
            amount,
        });
        let (ny, nm) = next_month(year, month);
        year = ny;
        month = nm;
    }
    plan
}

// --- Service ----------------------------------------------------------------

pub struct DepreciationService;

impl DepreciationService {
    pub fn new() -> Self {
        Self
    }

    /// Ensure every monthly depreciation entry exists for the cow from the
    /// month after freshening through `through`. The whole call is one
    /// transaction under the tenant lock.
    pub async fn catch_up_cow(
        &self,
        db: &DatabaseConnection,
        cow_id: i32,
        through: NaiveDate,
    ) -> LedgerResult<CatchUpResult> {
        let cow = Cow::find_by_id(cow_id)
            .one(db)
            .await?
            .ok_or_else(|| LedgerError::not_found("cow", cow_id))?;

        let txn = db.begin().await?;
        lock_tenant(&txn, cow.company_id).await?;
        let created = self.catch_up_within(&txn, &cow, through).await?;
        txn.commit().await?;

        Ok(CatchUpResult {
            cow_id,
            entries_created: created,
        })
    }

    /// Catch-up body, usable inside a caller-owned transaction (the
    /// disposition poster runs it as its step 2).
    pub async fn catch_up_within<C: ConnectionTrait>(
        &self,
        db: &C,
        cow: &cow::Model,
        through: NaiveDate,
    ) -> LedgerResult<i32> {
        let settings = load_settings(db, cow.company_id).await?;
        let chart = resolve_chart(db, cow.company_id).await?;

        let disposition = Disposition::find()
            .filter(disposition::Column::CowId.eq(cow.id))
            .one(db)
            .await?;

        let last_covered = self
            .last_covered_month(db, cow.id, &chart.accum_depr.code)
            .await?;

        let plan = depreciation_schedule(
            cow.purchase_price,
            cow.salvage_value,
            settings.depreciation_years,
            settings.round_to_nearest_dollar,
            cow.freshen_date,
            last_covered,
            through,
            disposition.as_ref().map(|d| d.disposition_date),
        );

        let journal = JournalService::new();
        let mut created = 0;

        for scheduled in plan {
            // Enforcer gate: depreciation never lands after the disposition
            if !depreciation_date_allowed(
                disposition.as_ref().map(|d| d.disposition_date),
                scheduled.entry_date,
            ) {
                return Err(LedgerError::invariant(format!(
                    "depreciation dated {} falls after the disposition of cow {}",
                    scheduled.entry_date, cow.tag_number
                )));
            }

            let entry = self
                .find_or_create_period_entry(db, cow.company_id, scheduled.year, scheduled.month, scheduled.entry_date)
                .await?;

            // A reused period entry must not carry this cow's lines under a
            // date past its disposition; the entry keeps the earliest
            // disposition date it hosts
            journal
                .lower_entry_date(db, &entry, scheduled.entry_date)
                .await?;

            let existing_lines = JournalLine::find()
                .filter(journal_line::Column::JournalEntryId.eq(entry.id))
                .filter(journal_line::Column::CowId.eq(cow.id))
                .all(db)
                .await?;
            if !existing_lines.is_empty() {
                continue;
            }

            let description = Some(format!("Monthly depreciation - cow {}", cow.tag_number));
            journal
                .insert_lines(
                    db,
                    entry.id,
                    vec![
                        LineSpec::debit(
                            &chart.depr_expense,
                            scheduled.amount,
                            Some(cow.id),
                            description.clone(),
                        ),
                        LineSpec::credit(
                            &chart.accum_depr,
                            scheduled.amount,
                            Some(cow.id),
                            description,
                        ),
                    ],
                )
                .await?;
            journal.recompute_total(db, entry.id).await?;
            created += 1;
        }

        if created > 0 {
            self.refresh_cow_book_value(db, cow, &chart).await?;
        }

        Ok(created)
    }

    /// Post one company's monthly depreciation entry for a period.
    pub async fn post_monthly(
        &self,
        db: &DatabaseConnection,
        company_id: i32,
        month: u32,
        year: i32,
        mode: Option<ProcessingMode>,
        force_recreate: bool,
    ) -> LedgerResult<PostingSummary> {
        if !(1..=12).contains(&month) {
            return Err(LedgerError::DataAnomaly(format!(
                "invalid month {month}"
            )));
        }

        let processing = ProcessingService::new();
        let txn = db.begin().await?;
        lock_tenant(&txn, company_id).await?;

        let result = self
            .post_monthly_in_txn(&txn, company_id, month, year, mode, force_recreate)
            .await;

        match result {
            Ok(summary) => {
                txn.commit().await?;
                Ok(summary)
            }
            Err(err) => {
                txn.rollback().await.ok();
                processing
                    .mark_log_failed(db, company_id, month, year, &err.to_string())
                    .await
                    .ok();
                Err(err)
            }
        }
    }

    async fn post_monthly_in_txn<C: ConnectionTrait>(
        &self,
        db: &C,
        company_id: i32,
        month: u32,
        year: i32,
        mode: Option<ProcessingMode>,
        force_recreate: bool,
    ) -> LedgerResult<PostingSummary> {
        let settings = load_settings(db, company_id).await?;
        let chart = resolve_chart(db, company_id).await?;
        let mode = mode.unwrap_or(settings.processing_mode);
        let processing = ProcessingService::new();

        let eom = end_of_month(year, month);
        let (posting_month, posting_year, entry_date) = match mode {
            ProcessingMode::Historical => (month, year, eom),
            ProcessingMode::Production => {
                let today = Utc::now().date_naive();
                (today.month(), today.year(), today)
            }
        };

        let existing = JournalEntry::find()
            .filter(journal_entry::Column::CompanyId.eq(company_id))
            .filter(journal_entry::Column::Year.eq(posting_year))
            .filter(journal_entry::Column::Month.eq(posting_month as i32))
            .filter(journal_entry::Column::EntryType.eq(EntryType::Depreciation))
            .one(db)
            .await?;

        if let Some(entry) = existing {
            if !force_recreate {
                // Already processed: leave the period and its log untouched
                return Ok(PostingSummary {
                    company_id,
                    month: month as i32,
                    year,
                    cows_processed: 0,
                    total_amount: entry.total_amount,
                    journal_created: false,
                    journal_entry_id: Some(entry.id),
                });
            }
            // Re-creation discipline: drop the entry (lines cascade) and
            // rebuild it from scratch
            JournalEntry::delete_by_id(entry.id).exec(db).await?;
        }

        processing
            .upsert_log_processing(db, company_id, month, year)
            .await?;

        let cows = Cow::find()
            .filter(cow::Column::CompanyId.eq(company_id))
            .filter(cow::Column::FreshenDate.lte(eom))
            .all(db)
            .await?;

        let dispositions: Vec<disposition::Model> = Disposition::find()
            .filter(disposition::Column::CompanyId.eq(company_id))
            .all(db)
            .await?;
        let disposition_of =
            |cow_id: i32| dispositions.iter().find(|d| d.cow_id == cow_id);

        let first_of_month = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| LedgerError::DataAnomaly(format!("invalid period {year}-{month}")))?;

        let mut lines: Vec<LineSpec> = Vec::new();
        let mut total = Decimal::ZERO;
        let mut cows_processed = 0;
        let mut touched: Vec<cow::Model> = Vec::new();
        let mut earliest_disposal: Option<NaiveDate> = None;

        for c in cows {
            let disposition = disposition_of(c.id);
            let amount = match disposition {
                // Disposed before the target month: out of the ledger entirely
                Some(d) if d.disposition_date < first_of_month => Decimal::ZERO,
                // Disposed during the target month: the posted final-month
                // pair is re-emitted so a forced re-run does not erase it
                Some(d) if d.disposition_date <= eom => {
                    if d.journal_entry_id.is_some() {
                        self.final_month_amount_for(&c, &settings, d.disposition_date)
                    } else {
                        Decimal::ZERO
                    }
                }
                _ => monthly_depreciation(
                    c.purchase_price,
                    c.salvage_value,
                    settings.depreciation_years,
                    settings.round_to_nearest_dollar,
                    c.freshen_date,
                    eom,
                ),
            };

            if amount.is_zero() {
                continue;
            }

            // A mid-month disposal caps the date the entry may carry
            if let Some(d) = disposition {
                if d.disposition_date >= first_of_month && d.disposition_date < eom {
                    earliest_disposal = Some(match earliest_disposal {
                        Some(e) => e.min(d.disposition_date),
                        None => d.disposition_date,
                    });
                }
            }

            let description = Some(format!("Monthly depreciation - cow {}", c.tag_number));
            lines.push(LineSpec::debit(
                &chart.depr_expense,
                amount,
                Some(c.id),
                description.clone(),
            ));
            lines.push(LineSpec::credit(
                &chart.accum_depr,
                amount,
                Some(c.id),
                description,
            ));
            total += amount;
            cows_processed += 1;
            touched.push(c);
        }

        // The entry is dated the earliest disposition it hosts; otherwise
        // month end (historical) or the posting day (production)
        let entry_date = match mode {
            ProcessingMode::Historical => earliest_disposal.unwrap_or(entry_date),
            ProcessingMode::Production => entry_date,
        };

        let mut entry_id = None;
        if total > Decimal::ZERO {
            let (description, entry_number) = match mode {
                ProcessingMode::Historical => (
                    format!("Monthly depreciation for {year}-{month:02}"),
                    format!("DEP-{year}-{month:02}"),
                ),
                ProcessingMode::Production => (
                    format!(
                        "Monthly depreciation for {year}-{month:02} (posted {posting_year}-{posting_month:02})"
                    ),
                    format!("DEP-{year}-{month:02}-P{posting_year}{posting_month:02}"),
                ),
            };

            let journal = JournalService::new();
            let entry = journal
                .create_entry_with_lines(
                    db,
                    NewEntry {
                        company_id,
                        entry_number,
                        entry_date,
                        month: posting_month as i32,
                        year: posting_year,
                        entry_type: EntryType::Depreciation,
                        description,
                    },
                    lines,
                )
                .await?;
            entry_id = Some(entry.id);

            for c in &touched {
                self.refresh_cow_book_value(db, c, &chart).await?;
            }
        }

        processing
            .complete_log(db, company_id, month, year, cows_processed, total)
            .await?;

        tracing::info!(
            company_id,
            month,
            year,
            cows_processed,
            %total,
            "monthly depreciation posted"
        );

        Ok(PostingSummary {
            company_id,
            month: month as i32,
            year,
            cows_processed,
            total_amount: total,
            journal_created: entry_id.is_some(),
            journal_entry_id: entry_id,
        })
    }

    /// What a cow disposed during the month earns for it: the full month on
    /// a last-day disposition, nothing on a first-day one, the pro-rated
    /// amount in between.
    fn final_month_amount_for(
        &self,
        cow: &cow::Model,
        settings: &depreciation_setting::Model,
        disposition_date: NaiveDate,
    ) -> Decimal {
        let day = disposition_date.day();
        let days = days_in_month(disposition_date.year(), disposition_date.month());
        if day == days {
            return monthly_depreciation(
                cow.purchase_price,
                cow.salvage_value,
                settings.depreciation_years,
                settings.round_to_nearest_dollar,
                cow.freshen_date,
                disposition_date,
            );
        }
        if !settings.include_partial_months || day <= 1 {
            return Decimal::ZERO;
        }
        partial_month_depreciation(
            cow.purchase_price,
            cow.salvage_value,
            settings.depreciation_years,
            settings.round_to_nearest_dollar,
            cow.freshen_date,
            disposition_date,
        )
    }

    /// Ledger-derived accumulated depreciation for one cow: credits minus
    /// debits on the accumulated-depreciation account across depreciation
    /// entries and their reversals.
    pub async fn accumulated_for_cow<C: ConnectionTrait>(
        &self,
        db: &C,
        cow_id: i32,
        accum_code: &str,
    ) -> LedgerResult<Decimal> {
        let rows = JournalLine::find()
            .filter(journal_line::Column::CowId.eq(cow_id))
            .filter(journal_line::Column::AccountCode.eq(accum_code))
            .find_also_related(JournalEntry)
            .all(db)
            .await?;

        let mut accumulated = Decimal::ZERO;
        for (line, entry) in rows {
            let Some(entry) = entry else { continue };
            match entry.entry_type {
                EntryType::Depreciation | EntryType::DepreciationReversal => {
                    accumulated += line.credit_amount - line.debit_amount;
                }
                _ => {}
            }
        }
        Ok(accumulated)
    }

    async fn last_covered_month<C: ConnectionTrait>(
        &self,
        db: &C,
        cow_id: i32,
        accum_code: &str,
    ) -> LedgerResult<Option<(i32, u32)>> {
        let rows = JournalLine::find()
            .filter(journal_line::Column::CowId.eq(cow_id))
            .filter(journal_line::Column::AccountCode.eq(accum_code))
            .filter(journal_line::Column::CreditAmount.gt(Decimal::ZERO))
            .find_also_related(JournalEntry)
            .all(db)
            .await?;

        let last = rows
            .into_iter()
            .filter_map(|(_, entry)| entry)
            .filter(|e| e.entry_type == EntryType::Depreciation)
            .map(|e| e.entry_date)
            .max();

        Ok(last.map(|d| (d.year(), d.month())))
    }

    pub(crate) async fn find_or_create_period_entry<C: ConnectionTrait>(
        &self,
        db: &C,
        company_id: i32,
        year: i32,
        month: u32,
        entry_date: NaiveDate,
    ) -> LedgerResult<journal_entry::Model> {
        let existing = JournalEntry::find()
            .filter(journal_entry::Column::CompanyId.eq(company_id))
            .filter(journal_entry::Column::Year.eq(year))
            .filter(journal_entry::Column::Month.eq(month as i32))
            .filter(journal_entry::Column::EntryType.eq(EntryType::Depreciation))
            .one(db)
            .await?;

        if let Some(entry) = existing {
            return Ok(entry);
        }

        let journal = JournalService::new();
        let entry = journal
            .create_entry_with_lines(
                db,
                NewEntry {
                    company_id,
                    entry_number: format!("DEP-{year}-{month:02}"),
                    entry_date,
                    month: month as i32,
                    year,
                    entry_type: EntryType::Depreciation,
                    description: format!("Monthly depreciation for {year}-{month:02}"),
                },
                Vec::new(),
            )
            .await?;
        Ok(entry)
    }

    /// Recompute the cow's denormalised accumulated depreciation and book
    /// value from the ledger. Disposed cows stay at zero current value.
    pub async fn refresh_cow_book_value<C: ConnectionTrait>(
        &self,
        db: &C,
        cow: &cow::Model,
        chart: &ResolvedChart,
    ) -> LedgerResult<()> {
        let accumulated = self
            .accumulated_for_cow(db, cow.id, &chart.accum_depr.code)
            .await?;

        let current_value = if cow.status == CowStatus::Active {
            (cow.purchase_price - accumulated).max(cow.salvage_value)
        } else {
            Decimal::ZERO
        };

        let mut active: CowActiveModel = cow.clone().into();
        active.accumulated_depreciation = Set(accumulated);
        active.current_value = Set(current_value);
        active.updated_at = Set(Utc::now());
        active.update(db).await?;
        Ok(())
    }
}

pub async fn load_settings<C: ConnectionTrait>(
    db: &C,
    company_id: i32,
) -> LedgerResult<depreciation_setting::Model> {
    DepreciationSetting::find()
        .filter(depreciation_setting::Column::CompanyId.eq(company_id))
        .one(db)
        .await?
        .ok_or_else(|| LedgerError::not_found("depreciation settings for company", company_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn monthly_rate_is_basis_over_life_months() {
        assert_eq!(monthly_rate(dec!(2400), dec!(0), 5, false), dec!(40));
        assert_eq!(monthly_rate(dec!(1800), dec!(0), 5, false), dec!(30));
        // Two-decimal rounding
        assert_eq!(monthly_rate(dec!(1000), dec!(0), 3, false), dec!(27.78));
        // Whole-dollar rounding
        assert_eq!(monthly_rate(dec!(1000), dec!(0), 3, true), dec!(28));
    }

    #[test]
    fn months_elapsed_ignores_days() {
        assert_eq!(months_elapsed(date(2020, 1, 15), date(2020, 2, 1)), 1);
        assert_eq!(months_elapsed(date(2020, 1, 15), date(2020, 1, 31)), 0);
        assert_eq!(months_elapsed(date(2020, 1, 15), date(2025, 1, 31)), 60);
        // Target before freshen clamps to zero
        assert_eq!(months_elapsed(date(2020, 1, 15), date(2019, 12, 31)), 0);
    }

    #[test]
    fn depreciation_stops_at_the_life_ceiling() {
        // 60-month life: month 60 still depreciates, month 61 does not
        assert_eq!(monthly_amount_at(dec!(2400), dec!(0), 5, false, 60), dec!(40));
        assert_eq!(monthly_amount_at(dec!(2400), dec!(0), 5, false, 61), dec!(0));
        assert_eq!(monthly_amount_at(dec!(2400), dec!(0), 5, false, 0), dec!(0));
    }

    #[test]
    fn terminal_month_posts_only_the_remaining_basis() {
        // 10.00 over 60 months at a rounded rate of 0.17 exhausts the basis
        // early; the schedule must land on exactly 10.00
        let mut total = Decimal::ZERO;
        for k in 1..=60 {
            total += monthly_amount_at(dec!(10), dec!(0), 5, false, k);
        }
        assert_eq!(total, dec!(10));
    }

    #[test]
    fn partial_month_prorates_by_day_of_month() {
        // S2: rate 30, died May 15th of a 31-day month: 30 * 15/31 = 14.52
        let partial = partial_month_depreciation(
            dec!(1800),
            dec!(0),
            5,
            false,
            date(2024, 1, 10),
            date(2025, 5, 15),
        );
        assert_eq!(partial, dec!(14.52));
    }

    #[test]
    fn partial_month_respects_the_life_ceiling() {
        // Fully depreciated cow: no partial depreciation either
        let partial = partial_month_depreciation(
            dec!(2400),
            dec!(0),
            5,
            false,
            date(2020, 1, 15),
            date(2025, 6, 15),
        );
        assert_eq!(partial, dec!(0));
    }

    #[test]
    fn schedule_covers_freshen_plus_one_through_target() {
        // Freshens Jan 15th: first depreciation month is February
        let plan = depreciation_schedule(
            dec!(2400),
            dec!(0),
            5,
            false,
            date(2020, 1, 15),
            None,
            date(2020, 4, 30),
            None,
        );
        assert_eq!(plan.len(), 3);
        assert_eq!((plan[0].year, plan[0].month), (2020, 2));
        assert_eq!(plan[0].entry_date, date(2020, 2, 29));
        assert_eq!((plan[2].year, plan[2].month), (2020, 4));
        assert!(plan.iter().all(|s| s.amount == dec!(40)));
    }

    #[test]
    fn schedule_runs_the_full_life_and_no_further() {
        // S1: 60 months from 2020-02 through 2025-01, 40 each, total 2400
        let plan = depreciation_schedule(
            dec!(2400),
            dec!(0),
            5,
            false,
            date(2020, 1, 15),
            None,
            date(2025, 6, 30),
            None,
        );
        assert_eq!(plan.len(), 60);
        assert_eq!((plan[0].year, plan[0].month), (2020, 2));
        assert_eq!((plan[59].year, plan[59].month), (2025, 1));
        let total: Decimal = plan.iter().map(|s| s.amount).sum();
        assert_eq!(total, dec!(2400));
    }

    #[test]
    fn schedule_resumes_after_the_last_covered_month() {
        let plan = depreciation_schedule(
            dec!(2400),
            dec!(0),
            5,
            false,
            date(2020, 1, 15),
            Some((2020, 6)),
            date(2020, 9, 30),
            None,
        );
        assert_eq!(plan.len(), 3);
        assert_eq!((plan[0].year, plan[0].month), (2020, 7));
    }

    #[test]
    fn schedule_clamps_at_the_disposition_date() {
        // Disposed June 10th: June becomes the terminal month, dated the
        // disposition date
        let plan = depreciation_schedule(
            dec!(2400),
            dec!(0),
            5,
            false,
            date(2024, 1, 15),
            None,
            date(2025, 12, 31),
            Some(date(2025, 6, 10)),
        );
        let last = plan.last().unwrap();
        assert_eq!((last.year, last.month), (2025, 6));
        assert_eq!(last.entry_date, date(2025, 6, 10));
    }

    #[test]
    fn mid_month_target_without_disposition_keeps_month_end_dates() {
        // Only a disposition moves an entry off the month end
        let plan = depreciation_schedule(
            dec!(2400),
            dec!(0),
            5,
            false,
            date(2024, 1, 15),
            None,
            date(2024, 5, 20),
            None,
        );
        let last = plan.last().unwrap();
        assert_eq!((last.year, last.month), (2024, 5));
        assert_eq!(last.entry_date, date(2024, 5, 31));
        assert_eq!(plan[0].entry_date, date(2024, 2, 29));
    }

    #[test]
    fn disposition_on_the_target_date_dates_the_terminal_month_on_it() {
        // Catch-up called with the disposition date itself as the target
        let plan = depreciation_schedule(
            dec!(2400),
            dec!(0),
            5,
            false,
            date(2024, 1, 15),
            None,
            date(2024, 5, 20),
            Some(date(2024, 5, 20)),
        );
        let last = plan.last().unwrap();
        assert_eq!((last.year, last.month), (2024, 5));
        assert_eq!(last.entry_date, date(2024, 5, 20));
    }

    #[test]
    fn freshen_on_the_first_still_waits_a_month() {
        // Freshens March 1st: no depreciation in March, first in April
        let plan = depreciation_schedule(
            dec!(1200),
            dec!(0),
            5,
            false,
            date(2024, 3, 1),
            None,
            date(2024, 4, 30),
            None,
        );
        assert_eq!(plan.len(), 1);
        assert_eq!((plan[0].year, plan[0].month), (2024, 4));
    }

    #[test]
    fn salvage_value_reduces_the_basis() {
        // 2400 price, 400 salvage: rate (2400-400)/60 = 33.33, total 2000
        let plan = depreciation_schedule(
            dec!(2400),
            dec!(400),
            5,
            false,
            date(2020, 1, 1),
            None,
            date(2026, 12, 31),
            None,
        );
        let total: Decimal = plan.iter().map(|s| s.amount).sum();
        assert_eq!(total, dec!(2000));
        assert_eq!(plan[0].amount, dec!(33.33));
        // Terminal month carries the rounding residue: 2000 - 33.33*59
        assert_eq!(plan.last().unwrap().amount, dec!(33.53));
    }

    #[test]
    fn calendar_helpers_handle_year_boundaries() {
        assert_eq!(end_of_month(2024, 2), date(2024, 2, 29));
        assert_eq!(end_of_month(2025, 2), date(2025, 2, 28));
        assert_eq!(next_month(2024, 12), (2025, 1));
        assert_eq!(previous_month(2025, 1), (2024, 12));
        assert_eq!(days_in_month(2025, 5), 31);
    }
}
