//! Acquisition Service
//!
//! Posts the service-entry journal entry for a cow: the herd asset account is
//! debited at purchase price and either cash (purchased) or the heifer
//! account (raised) is credited. Exactly one acquisition entry exists per
//! cow; re-posting is a no-op.

use chrono::Datelike;
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, TransactionTrait,
};

use crate::data::chart_of_accounts::{resolve_chart, AccountRef, ResolvedChart};
use crate::entities::{
    cow, journal_line, AcquisitionType, Cow, EntryType, JournalEntry, JournalLine,
};
use crate::error::{LedgerError, LedgerResult};
use crate::services::depreciation::DepreciationService;
use crate::services::journal::{JournalService, LineSpec, NewEntry};
use crate::services::tenant_lock::lock_tenant;

use shared::models::PostingSummary;

/// The balanced line pair for one acquisition. Pure so the double-entry
/// algebra is testable without a database.
pub fn acquisition_lines(
    cow_id: i32,
    tag_number: &str,
    purchase_price: Decimal,
    acquisition_type: AcquisitionType,
    chart: &ResolvedChart,
) -> Vec<LineSpec> {
    let description = Some(format!("Acquisition - cow {tag_number}"));
    let credit_account: &AccountRef = match acquisition_type {
        AcquisitionType::Purchased => &chart.cash,
        AcquisitionType::Raised => &chart.heifers,
    };
    vec![
        LineSpec::debit(&chart.asset, purchase_price, Some(cow_id), description.clone()),
        LineSpec::credit(credit_account, purchase_price, Some(cow_id), description),
    ]
}

pub struct AcquisitionService;

impl AcquisitionService {
    pub fn new() -> Self {
        Self
    }

    pub async fn post_acquisition(
        &self,
        db: &DatabaseConnection,
        cow_id: i32,
    ) -> LedgerResult<PostingSummary> {
        let cow = Cow::find_by_id(cow_id)
            .one(db)
            .await?
            .ok_or_else(|| LedgerError::not_found("cow", cow_id))?;

        if cow.purchase_price < Decimal::ZERO {
            return Err(LedgerError::DataAnomaly(format!(
                "cow {} has a negative purchase price",
                cow.tag_number
            )));
        }

        let txn = db.begin().await?;
        lock_tenant(&txn, cow.company_id).await?;

        let chart = resolve_chart(&txn, cow.company_id).await?;

        // One acquisition entry per cow: an existing entry carrying one of
        // the cow's lines short-circuits the call
        let existing = JournalLine::find()
            .filter(journal_line::Column::CowId.eq(cow.id))
            .find_also_related(JournalEntry)
            .all(&txn)
            .await?
            .into_iter()
            .filter_map(|(_, entry)| entry)
            .find(|e| e.entry_type == EntryType::Acquisition);

        if let Some(entry) = existing {
            txn.commit().await?;
            return Ok(PostingSummary {
                company_id: cow.company_id,
                month: entry.month,
                year: entry.year,
                cows_processed: 0,
                total_amount: entry.total_amount,
                journal_created: false,
                journal_entry_id: Some(entry.id),
            });
        }

        let journal = JournalService::new();
        let entry = journal
            .create_entry_with_lines(
                &txn,
                NewEntry {
                    company_id: cow.company_id,
                    entry_number: format!("ACQ-{}", cow.tag_number),
                    entry_date: cow.freshen_date,
                    month: cow.freshen_date.month() as i32,
                    year: cow.freshen_date.year(),
                    entry_type: EntryType::Acquisition,
                    description: format!(
                        "Acquisition of cow {} ({})",
                        cow.tag_number,
                        match cow.acquisition_type {
                            AcquisitionType::Purchased => "purchased",
                            AcquisitionType::Raised => "raised",
                        }
                    ),
                },
                acquisition_lines(
                    cow.id,
                    &cow.tag_number,
                    cow.purchase_price,
                    cow.acquisition_type,
                    &chart,
                ),
            )
            .await?;

        DepreciationService::new()
            .refresh_cow_book_value(&txn, &cow, &chart)
            .await?;

        txn.commit().await?;

        tracing::info!(cow_id, entry_id = entry.id, "acquisition posted");

        Ok(PostingSummary {
            company_id: cow.company_id,
            month: entry.month,
            year: entry.year,
            cows_processed: 1,
            total_amount: entry.total_amount,
            journal_created: true,
            journal_entry_id: Some(entry.id),
        })
    }

    /// Post acquisitions for every cow of a company that lacks one. Used by
    /// the historical backfill; per-cow failures are collected, not fatal.
    pub async fn post_all_for_company(
        &self,
        db: &DatabaseConnection,
        company_id: i32,
    ) -> LedgerResult<(i32, Vec<String>)> {
        let cows = Cow::find()
            .filter(cow::Column::CompanyId.eq(company_id))
            .all(db)
            .await?;

        let mut posted = 0;
        let mut errors = Vec::new();
        for c in cows {
            match self.post_acquisition(db, c.id).await {
                Ok(summary) if summary.journal_created => posted += 1,
                Ok(_) => {}
                Err(err) => errors.push(format!("cow {}: {err}", c.tag_number)),
            }
        }
        Ok((posted, errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::journal::{balance_of, ensure_balanced};
    use rust_decimal_macros::dec;

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

    #[test]
    fn purchased_cow_credits_cash() {
        let lines = acquisition_lines(7, "T-104", dec!(2500), AcquisitionType::Purchased, &chart());
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].account_code, "1500");
        assert_eq!(lines[0].debit_amount, dec!(2500));
        assert_eq!(lines[1].account_code, "1000");
        assert_eq!(lines[1].credit_amount, dec!(2500));
        assert!(ensure_balanced(&lines).is_ok());
    }

    #[test]
    fn raised_cow_credits_the_heifer_account() {
        // S3: raised cow, 2000: Dr 1500 / Cr 1400
        let lines = acquisition_lines(3, "T-88", dec!(2000), AcquisitionType::Raised, &chart());
        assert_eq!(lines[0].account_code, "1500");
        assert_eq!(lines[1].account_code, "1400");
        assert_eq!(balance_of(&lines), (dec!(2000), dec!(2000)));
    }
}
