//! Disposition Service
//!
//! Handles the terminal event of a cow's life as an asset: sale, death, or
//! culling. Posting a disposition catches depreciation up through the month
//! before the event, posts the pro-rated final month when the event is
//! mid-month, and emits the balanced disposition entry that clears the asset
//! and its accumulated depreciation against cash, gain, or loss.

use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    Set, TransactionTrait,
};

use crate::data::chart_of_accounts::{resolve_chart, ResolvedChart};
use crate::entities::{
    cow, disposition, journal_line, Cow, CowActiveModel, CowStatus, CreateDispositionInput,
    Disposition, DispositionActiveModel, DispositionType, EntryType, JournalEntry, JournalLine,
};
use crate::error::{LedgerError, LedgerResult};
use crate::services::depreciation::{
    days_in_month, end_of_month, load_settings, partial_month_depreciation, previous_month,
    DepreciationService,
};
use crate::services::invariants::InvariantService;
use crate::services::journal::{balance_of, JournalService, LineSpec, NewEntry};
use crate::services::tenant_lock::lock_tenant;

use shared::models::{DispositionPostingResult, ReinstatementResult};

/// Derived amounts for one disposition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DispositionFigures {
    pub accumulated: Decimal,
    pub book_value: Decimal,
    pub gain_loss: Decimal,
}

/// Book value is floored at salvage; gain or loss compares sale proceeds
/// against book. Deaths and cullings carry no proceeds, so their loss is the
/// full book value.
pub fn disposition_figures(
    purchase_price: Decimal,
    salvage_value: Decimal,
    accumulated: Decimal,
    disposition_type: DispositionType,
    sale_amount: Decimal,
) -> DispositionFigures {
    let book_value = (purchase_price - accumulated).max(salvage_value);
    let proceeds = match disposition_type {
        DispositionType::Sale => sale_amount,
        _ => Decimal::ZERO,
    };
    DispositionFigures {
        accumulated,
        book_value,
        gain_loss: proceeds - book_value,
    }
}

/// The balanced line set for a disposition entry. Pure so the bookkeeping
/// algebra is testable without a database.
pub fn disposition_lines(
    cow_id: i32,
    tag_number: &str,
    purchase_price: Decimal,
    disposition_type: DispositionType,
    sale_amount: Decimal,
    figures: &DispositionFigures,
    chart: &ResolvedChart,
) -> Vec<LineSpec> {
    let description = Some(format!("Disposition - cow {tag_number}"));
    let mut lines = Vec::new();

    if figures.accumulated > Decimal::ZERO {
        lines.push(LineSpec::debit(
            &chart.accum_depr,
            figures.accumulated,
            Some(cow_id),
            description.clone(),
        ));
    }

    if disposition_type == DispositionType::Sale && sale_amount > Decimal::ZERO {
        lines.push(LineSpec::debit(
            &chart.cash,
            sale_amount,
            Some(cow_id),
            description.clone(),
        ));
    }

    let gain_loss = figures.gain_loss;
    if gain_loss.abs() > dec!(0.005) {
        if gain_loss > Decimal::ZERO {
            lines.push(LineSpec::credit(
                &chart.gain_on_sale,
                gain_loss,
                Some(cow_id),
                description.clone(),
            ));
        } else {
            let loss_account = match disposition_type {
                DispositionType::Sale => &chart.loss_on_sale_of_cows,
                DispositionType::Death => &chart.loss_on_dead_cows,
                DispositionType::Culled => &chart.loss_on_culled_cows,
            };
            lines.push(LineSpec::debit(
                loss_account,
                -gain_loss,
                Some(cow_id),
                description.clone(),
            ));
        }
    }

    lines.push(LineSpec::credit(
        &chart.asset,
        purchase_price,
        Some(cow_id),
        description,
    ));

    lines
}

pub struct DispositionService;

impl DispositionService {
    pub fn new() -> Self {
        Self
    }

    /// Record a disposition event. Transitions the cow to its terminal
    /// status, zeroes its carrying value, and sweeps any depreciation already
    /// posted past the event date. The accounting entry itself is produced by
    /// [`DispositionService::post_disposition`].
    pub async fn create_disposition(
        &self,
        db: &DatabaseConnection,
        input: CreateDispositionInput,
    ) -> LedgerResult<disposition::Model> {
        let cow = Cow::find_by_id(input.cow_id)
            .one(db)
            .await?
            .ok_or_else(|| LedgerError::not_found("cow", input.cow_id))?;

        if cow.company_id != input.company_id {
            return Err(LedgerError::DataAnomaly(format!(
                "cow {} does not belong to company {}",
                cow.tag_number, input.company_id
            )));
        }
        if input.disposition_date < cow.freshen_date {
            return Err(LedgerError::DataAnomaly(format!(
                "disposition date {} predates the freshen date of cow {}",
                input.disposition_date, cow.tag_number
            )));
        }
        let sale_amount = input.sale_amount.unwrap_or(Decimal::ZERO);
        if sale_amount < Decimal::ZERO {
            return Err(LedgerError::DataAnomaly(
                "sale amount cannot be negative".to_string(),
            ));
        }

        let invariants = InvariantService::new();
        let txn = db.begin().await?;
        lock_tenant(&txn, cow.company_id).await?;

        invariants.ensure_no_existing_disposition(&txn, cow.id).await?;

        let inserted = DispositionActiveModel {
            company_id: Set(input.company_id),
            cow_id: Set(input.cow_id),
            disposition_date: Set(input.disposition_date),
            disposition_type: Set(input.disposition_type),
            sale_amount: Set(sale_amount),
            notes: Set(input.notes),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let mut active: CowActiveModel = cow.clone().into();
        active.status = Set(input.disposition_type.resulting_status());
        active.current_value = Set(Decimal::ZERO);
        active.disposition_id = Set(Some(inserted.id));
        active.updated_at = Set(Utc::now());
        active.update(&txn).await?;

        // Self-healing regardless of event order: depreciation already
        // posted past the disposition date is removed now
        invariants
            .sweep_post_disposition_depreciation(&txn, cow.id, input.disposition_date)
            .await?;

        txn.commit().await?;

        tracing::info!(
            cow_id = cow.id,
            disposition_id = inserted.id,
            "disposition recorded"
        );

        Ok(inserted)
    }

    /// Post the disposition journal entry, redo-safe.
    pub async fn post_disposition(
        &self,
        db: &DatabaseConnection,
        disposition_id: i32,
    ) -> LedgerResult<DispositionPostingResult> {
        let disp = Disposition::find_by_id(disposition_id)
            .one(db)
            .await?
            .ok_or_else(|| LedgerError::not_found("disposition", disposition_id))?;

        let txn = db.begin().await?;
        lock_tenant(&txn, disp.company_id).await?;
        let result = self.post_disposition_in_txn(&txn, &disp).await;

        match result {
            Ok(posted) => {
                txn.commit().await?;
                Ok(posted)
            }
            Err(err) => {
                txn.rollback().await.ok();
                Err(err)
            }
        }
    }

    async fn post_disposition_in_txn<C: ConnectionTrait>(
        &self,
        db: &C,
        disp: &disposition::Model,
    ) -> LedgerResult<DispositionPostingResult> {
        let cow = Cow::find_by_id(disp.cow_id)
            .one(db)
            .await?
            .ok_or_else(|| LedgerError::not_found("cow", disp.cow_id))?;

        let settings = load_settings(db, disp.company_id).await?;
        let chart = resolve_chart(db, disp.company_id).await?;
        let depreciation = DepreciationService::new();
        let invariants = InvariantService::new();
        let journal = JournalService::new();

        let d = disp.disposition_date;
        let eom = end_of_month(d.year(), d.month());

        // 1. Remove any depreciation posted past the event
        invariants
            .sweep_post_disposition_depreciation(db, cow.id, d)
            .await?;

        // 2. Catch up the months before the event; a last-day disposition
        //    earns its full final month here
        let catch_up_through = if d == eom {
            d
        } else {
            let (py, pm) = previous_month(d.year(), d.month());
            end_of_month(py, pm)
        };
        depreciation.catch_up_within(db, &cow, catch_up_through).await?;

        // 3. Pro-rate the final month for a mid-month event
        self.post_partial_month(db, &cow, &settings, &chart, d).await?;

        // 4. Accumulated depreciation as the ledger now stands
        let accumulated = depreciation
            .accumulated_for_cow(db, cow.id, &chart.accum_depr.code)
            .await?;

        // 5. Book value and gain or loss
        let figures = disposition_figures(
            cow.purchase_price,
            cow.salvage_value,
            accumulated,
            disp.disposition_type,
            disp.sale_amount,
        );

        // 6. Drop a previously posted disposition entry (redo-safe)
        if let Some(previous_entry) = disp.journal_entry_id {
            JournalEntry::delete_by_id(previous_entry).exec(db).await?;
        }

        // 7. The disposition entry itself
        let lines = disposition_lines(
            cow.id,
            &cow.tag_number,
            cow.purchase_price,
            disp.disposition_type,
            disp.sale_amount,
            &figures,
            &chart,
        );

        // Safety net: the rules above are algebraically balanced, so an
        // imbalance here is a bug
        let (debits, credits) = balance_of(&lines);
        invariants.assert_entry_balanced(debits, credits)?;

        let entry = journal
            .create_entry_with_lines(
                db,
                NewEntry {
                    company_id: disp.company_id,
                    entry_number: format!("DISP-{}", cow.tag_number),
                    entry_date: d,
                    month: d.month() as i32,
                    year: d.year(),
                    entry_type: EntryType::Disposition,
                    description: format!(
                        "Disposition of cow {} ({})",
                        cow.tag_number,
                        match disp.disposition_type {
                            DispositionType::Sale => "sale",
                            DispositionType::Death => "death",
                            DispositionType::Culled => "culled",
                        }
                    ),
                },
                lines,
            )
            .await?;

        // The entry reports at the asset's cost, not the gross line total
        let mut entry_active: crate::entities::JournalEntryActiveModel = entry.clone().into();
        entry_active.total_amount = Set(cow.purchase_price);
        entry_active.update(db).await?;

        // 8. Write the derived fields back
        let mut disp_active: DispositionActiveModel = disp.clone().into();
        disp_active.journal_entry_id = Set(Some(entry.id));
        disp_active.final_book_value = Set(Some(figures.book_value));
        disp_active.gain_loss = Set(Some(figures.gain_loss));
        disp_active.updated_at = Set(Utc::now());
        disp_active.update(db).await?;

        let mut cow_active: CowActiveModel = cow.clone().into();
        cow_active.status = Set(disp.disposition_type.resulting_status());
        cow_active.current_value = Set(Decimal::ZERO);
        cow_active.accumulated_depreciation = Set(accumulated);
        cow_active.disposition_id = Set(Some(disp.id));
        cow_active.updated_at = Set(Utc::now());
        cow_active.update(db).await?;

        tracing::info!(
            disposition_id = disp.id,
            entry_id = entry.id,
            %accumulated,
            book_value = %figures.book_value,
            gain_loss = %figures.gain_loss,
            "disposition posted"
        );

        Ok(DispositionPostingResult {
            disposition_id: disp.id,
            journal_entry_id: entry.id,
            accumulated_depreciation: accumulated,
            final_book_value: figures.book_value,
            gain_loss: figures.gain_loss,
        })
    }

    /// Insert or replace the cow's pro-rated depreciation pair for the
    /// disposition month. First-day dispositions earn nothing for the month;
    /// last-day dispositions were already handled as a full month.
    async fn post_partial_month<C: ConnectionTrait>(
        &self,
        db: &C,
        cow: &cow::Model,
        settings: &crate::entities::depreciation_setting::Model,
        chart: &ResolvedChart,
        d: NaiveDate,
    ) -> LedgerResult<()> {
        if !settings.include_partial_months {
            return Ok(());
        }
        let day = d.day();
        let days = days_in_month(d.year(), d.month());
        if day <= 1 || day >= days {
            return Ok(());
        }

        let partial = partial_month_depreciation(
            cow.purchase_price,
            cow.salvage_value,
            settings.depreciation_years,
            settings.round_to_nearest_dollar,
            cow.freshen_date,
            d,
        );
        if partial.is_zero() {
            return Ok(());
        }

        let depreciation = DepreciationService::new();
        let journal = JournalService::new();

        let entry = depreciation
            .find_or_create_period_entry(db, cow.company_id, d.year(), d.month(), d)
            .await?;

        // A surviving month-end entry must not date this cow's lines past
        // its disposition; the entry keeps the earliest disposition date
        // touching it
        journal.lower_entry_date(db, &entry, d).await?;

        // Replace any surviving full-month pair for this cow with the
        // pro-rated amounts
        let existing = JournalLine::find()
            .filter(journal_line::Column::JournalEntryId.eq(entry.id))
            .filter(journal_line::Column::CowId.eq(cow.id))
            .all(db)
            .await?;
        for line in existing {
            JournalLine::delete_by_id(line.id).exec(db).await?;
        }

        let description = Some(format!(
            "Partial month depreciation through {d} - cow {}",
            cow.tag_number
        ));
        journal
            .insert_lines(
                db,
                entry.id,
                vec![
                    LineSpec::debit(&chart.depr_expense, partial, Some(cow.id), description.clone()),
                    LineSpec::credit(&chart.accum_depr, partial, Some(cow.id), description),
                ],
            )
            .await?;
        journal.recompute_total(db, entry.id).await?;

        Ok(())
    }

    /// Rescind a posted disposition: reverse its entry, reactivate the cow,
    /// and catch depreciation up over the gap.
    pub async fn reinstate_disposition(
        &self,
        db: &DatabaseConnection,
        disposition_id: i32,
    ) -> LedgerResult<ReinstatementResult> {
        let disp = Disposition::find_by_id(disposition_id)
            .one(db)
            .await?
            .ok_or_else(|| LedgerError::not_found("disposition", disposition_id))?;

        let cow = Cow::find_by_id(disp.cow_id)
            .one(db)
            .await?
            .ok_or_else(|| LedgerError::not_found("cow", disp.cow_id))?;

        let journal = JournalService::new();
        let depreciation = DepreciationService::new();

        let txn = db.begin().await?;
        lock_tenant(&txn, disp.company_id).await?;

        let mut reversal_entry_id = None;
        if let Some(entry_id) = disp.journal_entry_id {
            let original = JournalEntry::find_by_id(entry_id)
                .one(&txn)
                .await?
                .ok_or_else(|| LedgerError::not_found("journal entry", entry_id))?;
            let reversal = journal
                .reverse_entry_within(&txn, &original, "disposition reinstated")
                .await?;
            reversal_entry_id = Some(reversal.id);
        }

        Disposition::delete_by_id(disp.id).exec(&txn).await?;

        let mut cow_active: CowActiveModel = cow.clone().into();
        cow_active.status = Set(CowStatus::Active);
        cow_active.disposition_id = Set(None);
        cow_active.updated_at = Set(Utc::now());
        let reactivated = cow_active.update(&txn).await?;

        // Post the gap the disposition left open; a same-month reinstatement
        // catches up naturally at the next month end
        let catch_up_entries = depreciation
            .catch_up_within(&txn, &reactivated, Utc::now().date_naive())
            .await?;

        let chart = resolve_chart(&txn, disp.company_id).await?;
        depreciation
            .refresh_cow_book_value(&txn, &reactivated, &chart)
            .await?;

        txn.commit().await?;

        tracing::info!(
            disposition_id,
            cow_id = cow.id,
            ?reversal_entry_id,
            catch_up_entries,
            "disposition reinstated"
        );

        Ok(ReinstatementResult {
            disposition_id,
            reversal_entry_id,
            catch_up_entries,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::chart_of_accounts::AccountRef;
    use crate::services::journal::{balance_of, ensure_balanced};

    fn chart() -> ResolvedChart {
        let make = |code: &str, name: &str| AccountRef {
            code: code.to_string(),
            name: name.to_string(),
        };
        ResolvedChart {
            cash: make("1000", "Cash"),
            heifers: make("1400", "Heifers"),
            asset: make("1500", "Dairy Cows"),
            accum_depr: make("1500.1", "Accumulated Depreciation - Dairy Cows"),
            depr_expense: make("6100", "Depreciation Expense"),
            gain_on_sale: make("8000", "Gain on Sale of Cows"),
            loss_on_dead_cows: make("9001", "Loss on Dead Cows"),
            loss_on_sale_of_cows: make("9002", "Loss on Sale of Cows"),
            loss_on_culled_cows: make("9003", "Loss on Culled Cows"),
            loss_on_sale_fallback: make("9000", "Loss on Sale of Assets"),
        }
    }

    fn line_amount<'a>(lines: &'a [LineSpec], code: &str) -> Option<&'a LineSpec> {
        lines.iter().find(|l| l.account_code == code)
    }

    #[test]
    fn fully_depreciated_sale_books_the_proceeds_as_gain() {
        // S1: price 2400, fully depreciated, sold for 500
        let figures =
            disposition_figures(dec!(2400), dec!(0), dec!(2400), DispositionType::Sale, dec!(500));
        assert_eq!(figures.book_value, dec!(0));
        assert_eq!(figures.gain_loss, dec!(500));

        let lines =
            disposition_lines(1, "S1", dec!(2400), DispositionType::Sale, dec!(500), &figures, &chart());

        assert_eq!(line_amount(&lines, "1500.1").unwrap().debit_amount, dec!(2400));
        assert_eq!(line_amount(&lines, "1000").unwrap().debit_amount, dec!(500));
        assert_eq!(line_amount(&lines, "8000").unwrap().credit_amount, dec!(500));
        assert_eq!(line_amount(&lines, "1500").unwrap().credit_amount, dec!(2400));
        assert!(ensure_balanced(&lines).is_ok());
    }

    #[test]
    fn mid_month_death_books_the_remaining_book_value_as_loss() {
        // S2: price 1800, accum 464.52 (15 full months + 15/31 of May)
        let figures = disposition_figures(
            dec!(1800),
            dec!(0),
            dec!(464.52),
            DispositionType::Death,
            dec!(0),
        );
        assert_eq!(figures.book_value, dec!(1335.48));
        assert_eq!(figures.gain_loss, dec!(-1335.48));

        let lines =
            disposition_lines(2, "S2", dec!(1800), DispositionType::Death, dec!(0), &figures, &chart());

        assert_eq!(line_amount(&lines, "1500.1").unwrap().debit_amount, dec!(464.52));
        assert_eq!(line_amount(&lines, "9001").unwrap().debit_amount, dec!(1335.48));
        assert_eq!(line_amount(&lines, "1500").unwrap().credit_amount, dec!(1800));
        assert!(line_amount(&lines, "1000").is_none(), "a death earns no cash");
        assert!(ensure_balanced(&lines).is_ok());
    }

    #[test]
    fn sale_below_book_value_is_a_loss_on_sale() {
        let figures = disposition_figures(
            dec!(2000),
            dec!(0),
            dec!(600),
            DispositionType::Sale,
            dec!(1000),
        );
        assert_eq!(figures.book_value, dec!(1400));
        assert_eq!(figures.gain_loss, dec!(-400));

        let lines =
            disposition_lines(3, "L1", dec!(2000), DispositionType::Sale, dec!(1000), &figures, &chart());
        assert_eq!(line_amount(&lines, "9002").unwrap().debit_amount, dec!(400));
        assert!(ensure_balanced(&lines).is_ok());
    }

    #[test]
    fn culled_cow_uses_the_culling_loss_account() {
        let figures =
            disposition_figures(dec!(1500), dec!(0), dec!(900), DispositionType::Culled, dec!(0));
        assert_eq!(figures.gain_loss, dec!(-600));

        let lines =
            disposition_lines(4, "C1", dec!(1500), DispositionType::Culled, dec!(0), &figures, &chart());
        assert_eq!(line_amount(&lines, "9003").unwrap().debit_amount, dec!(600));
        assert!(ensure_balanced(&lines).is_ok());
    }

    #[test]
    fn book_value_is_floored_at_salvage() {
        let figures = disposition_figures(
            dec!(2400),
            dec!(400),
            dec!(2000),
            DispositionType::Sale,
            dec!(400),
        );
        assert_eq!(figures.book_value, dec!(400));
        assert_eq!(figures.gain_loss, dec!(0));

        // Break-even sale: no gain or loss line at all
        let lines =
            disposition_lines(5, "B1", dec!(2400), DispositionType::Sale, dec!(400), &figures, &chart());
        assert!(line_amount(&lines, "8000").is_none());
        assert!(line_amount(&lines, "9002").is_none());
        assert!(ensure_balanced(&lines).is_ok());
    }

    #[test]
    fn undepreciated_cow_omits_the_accumulated_line() {
        // Disposed before any depreciation posted
        let figures =
            disposition_figures(dec!(1200), dec!(0), dec!(0), DispositionType::Death, dec!(0));
        let lines =
            disposition_lines(6, "N1", dec!(1200), DispositionType::Death, dec!(0), &figures, &chart());
        assert!(line_amount(&lines, "1500.1").is_none());
        assert_eq!(line_amount(&lines, "9001").unwrap().debit_amount, dec!(1200));
        assert!(ensure_balanced(&lines).is_ok());
    }

    #[test]
    fn every_disposition_shape_stays_balanced() {
        // Balance property over a grid of accumulations and proceeds
        let prices = [dec!(1800), dec!(2400), dec!(3150.75)];
        let accums = [dec!(0), dec!(500), dec!(1799.99)];
        let sales = [dec!(0), dec!(250.50), dec!(2000)];
        for price in prices {
            for accum in accums {
                for sale in sales {
                    for dtype in [
                        DispositionType::Sale,
                        DispositionType::Death,
                        DispositionType::Culled,
                    ] {
                        let figures =
                            disposition_figures(price, dec!(0), accum, dtype, sale);
                        let lines =
                            disposition_lines(9, "P", price, dtype, sale, &figures, &chart());
                        let (debits, credits) = balance_of(&lines);
                        assert_eq!(
                            debits, credits,
                            "unbalanced: price {price} accum {accum} sale {sale} {dtype:?}"
                        );
                    }
                }
            }
        }
    }
}
