//! Journal Service
//!
//! Entry and line plumbing shared by the posters: balanced line construction,
//! entry creation, total recomputation, and swap-and-append reversals.

use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    Set, TransactionTrait,
};

use crate::data::chart_of_accounts::AccountRef;
use crate::entities::{
    journal_entry, journal_line, EntryStatus, EntryType, JournalEntry, JournalEntryActiveModel,
    JournalLine, JournalLineActiveModel, LineType,
};
use crate::error::{LedgerError, LedgerResult};

/// A journal line before it is attached to an entry. Posters build these with
/// the pure planning functions so the double-entry algebra is testable
/// without a database.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSpec {
    pub cow_id: Option<i32>,
    pub account_code: String,
    pub account_name: String,
    pub debit_amount: Decimal,
    pub credit_amount: Decimal,
    pub description: Option<String>,
}

impl LineSpec {
    pub fn debit(
        account: &AccountRef,
        amount: Decimal,
        cow_id: Option<i32>,
        description: Option<String>,
    ) -> Self {
        LineSpec {
            cow_id,
            account_code: account.code.clone(),
            account_name: account.name.clone(),
            debit_amount: amount,
            credit_amount: Decimal::ZERO,
            description,
        }
    }

    pub fn credit(
        account: &AccountRef,
        amount: Decimal,
        cow_id: Option<i32>,
        description: Option<String>,
    ) -> Self {
        LineSpec {
            cow_id,
            account_code: account.code.clone(),
            account_name: account.name.clone(),
            debit_amount: Decimal::ZERO,
            credit_amount: amount,
            description,
        }
    }

    pub fn line_type(&self) -> LineType {
        if self.debit_amount > Decimal::ZERO {
            LineType::Debit
        } else {
            LineType::Credit
        }
    }
}

/// Sum the two sides of a line set
pub fn balance_of(lines: &[LineSpec]) -> (Decimal, Decimal) {
    let debits = lines.iter().map(|l| l.debit_amount).sum();
    let credits = lines.iter().map(|l| l.credit_amount).sum();
    (debits, credits)
}

/// Reject an unbalanced line set before anything touches the ledger
pub fn ensure_balanced(lines: &[LineSpec]) -> LedgerResult<()> {
    let (debits, credits) = balance_of(lines);
    if debits != credits {
        tracing::error!(%debits, %credits, "journal entry construction out of balance");
        return Err(LedgerError::Unbalanced { debits, credits });
    }
    Ok(())
}

/// Parameters for a new journal entry
#[derive(Debug, Clone)]
pub struct NewEntry {
    pub company_id: i32,
    pub entry_number: String,
    pub entry_date: NaiveDate,
    pub month: i32,
    pub year: i32,
    pub entry_type: EntryType,
    pub description: String,
}

pub struct JournalService;

impl JournalService {
    pub fn new() -> Self {
        Self
    }

    /// Insert an entry and its lines; the caller has already balanced them.
    pub async fn create_entry_with_lines<C: ConnectionTrait>(
        &self,
        db: &C,
        entry: NewEntry,
        lines: Vec<LineSpec>,
    ) -> LedgerResult<journal_entry::Model> {
        ensure_balanced(&lines)?;
        let (debits, _) = balance_of(&lines);

        let model = JournalEntryActiveModel {
            company_id: Set(entry.company_id),
            entry_number: Set(entry.entry_number),
            entry_date: Set(entry.entry_date),
            month: Set(entry.month),
            year: Set(entry.year),
            entry_type: Set(entry.entry_type),
            description: Set(entry.description),
            total_amount: Set(debits),
            status: Set(EntryStatus::Posted),
            posted_at: Set(Some(Utc::now())),
            ..Default::default()
        };

        let inserted = model.insert(db).await?;
        self.insert_lines(db, inserted.id, lines).await?;
        Ok(inserted)
    }

    pub async fn insert_lines<C: ConnectionTrait>(
        &self,
        db: &C,
        journal_entry_id: i32,
        lines: Vec<LineSpec>,
    ) -> LedgerResult<()> {
        for spec in lines {
            let line_type = spec.line_type();
            let model = JournalLineActiveModel {
                journal_entry_id: Set(journal_entry_id),
                cow_id: Set(spec.cow_id),
                account_code: Set(spec.account_code),
                account_name: Set(spec.account_name),
                description: Set(spec.description),
                debit_amount: Set(spec.debit_amount),
                credit_amount: Set(spec.credit_amount),
                line_type: Set(line_type),
                ..Default::default()
            };
            model.insert(db).await?;
        }
        Ok(())
    }

    /// Pull an entry's date back to `date` when it is earlier than the
    /// current one. A depreciation-period entry that hosts a mid-month
    /// disposition's lines must carry the earliest disposition date touching
    /// it, so no line it holds is dated after its cow left service.
    pub async fn lower_entry_date<C: ConnectionTrait>(
        &self,
        db: &C,
        entry: &journal_entry::Model,
        date: NaiveDate,
    ) -> LedgerResult<()> {
        if date >= entry.entry_date {
            return Ok(());
        }
        let mut active: JournalEntryActiveModel = entry.clone().into();
        active.entry_date = Set(date);
        active.updated_at = Set(Utc::now());
        active.update(db).await?;
        Ok(())
    }

    /// Recompute an entry's total from its surviving lines. Returns the new
    /// total; the entry itself is updated in place.
    pub async fn recompute_total<C: ConnectionTrait>(
        &self,
        db: &C,
        journal_entry_id: i32,
    ) -> LedgerResult<Decimal> {
        let lines = JournalLine::find()
            .filter(journal_line::Column::JournalEntryId.eq(journal_entry_id))
            .all(db)
            .await?;

        let total: Decimal = lines.iter().map(|l| l.debit_amount).sum();

        let entry = JournalEntry::find_by_id(journal_entry_id)
            .one(db)
            .await?
            .ok_or_else(|| LedgerError::not_found("journal entry", journal_entry_id))?;

        let mut active: JournalEntryActiveModel = entry.into();
        active.total_amount = Set(total);
        active.updated_at = Set(Utc::now());
        active.update(db).await?;

        Ok(total)
    }

    /// Reverse an entry by appending a new entry with debits and credits
    /// swapped. The original entry is left untouched for the audit trail.
    pub async fn reverse_entry(
        &self,
        db: &DatabaseConnection,
        entry_id: i32,
        reason: &str,
    ) -> LedgerResult<journal_entry::Model> {
        let original = JournalEntry::find_by_id(entry_id)
            .one(db)
            .await?
            .ok_or_else(|| LedgerError::not_found("journal entry", entry_id))?;

        let txn = db.begin().await?;
        crate::services::tenant_lock::lock_tenant(&txn, original.company_id).await?;
        let reversal = self.reverse_entry_within(&txn, &original, reason).await?;
        txn.commit().await?;
        Ok(reversal)
    }

    /// Reversal body, usable inside a caller-owned transaction.
    pub async fn reverse_entry_within<C: ConnectionTrait>(
        &self,
        db: &C,
        original: &journal_entry::Model,
        reason: &str,
    ) -> LedgerResult<journal_entry::Model> {
        let reversal_type = original.entry_type.reversal().ok_or_else(|| {
            LedgerError::invariant(format!(
                "entry {} of type {} cannot be reversed",
                original.entry_number,
                original.entry_type.as_str()
            ))
        })?;

        let lines = JournalLine::find()
            .filter(journal_line::Column::JournalEntryId.eq(original.id))
            .all(db)
            .await?;

        let swapped: Vec<LineSpec> = lines
            .iter()
            .map(|l| LineSpec {
                cow_id: l.cow_id,
                account_code: l.account_code.clone(),
                account_name: l.account_name.clone(),
                debit_amount: l.credit_amount,
                credit_amount: l.debit_amount,
                description: l.description.clone(),
            })
            .collect();

        let today = Utc::now().date_naive();
        let reversal = self
            .create_entry_with_lines(
                db,
                NewEntry {
                    company_id: original.company_id,
                    entry_number: format!("REV-{}", original.entry_number),
                    entry_date: today,
                    month: today.month() as i32,
                    year: today.year(),
                    entry_type: reversal_type,
                    description: format!("Reversal of {}: {}", original.entry_number, reason),
                },
                swapped,
            )
            .await?;

        tracing::info!(
            original = original.id,
            reversal = reversal.id,
            "journal entry reversed"
        );

        Ok(reversal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn account(code: &str, name: &str) -> AccountRef {
        AccountRef {
            code: code.to_string(),
            name: name.to_string(),
        }
    }

    #[test]
    fn balanced_lines_pass_the_balance_gate() {
        let asset = account("1500", "Dairy Cows");
        let cash = account("1000", "Cash");

        let lines = vec![
            LineSpec::debit(&asset, dec!(2000), Some(1), None),
            LineSpec::credit(&cash, dec!(2000), Some(1), None),
        ];

        assert!(ensure_balanced(&lines).is_ok());
        assert_eq!(balance_of(&lines), (dec!(2000), dec!(2000)));
    }

    #[test]
    fn unbalanced_lines_are_rejected() {
        let asset = account("1500", "Dairy Cows");
        let cash = account("1000", "Cash");

        let lines = vec![
            LineSpec::debit(&asset, dec!(2000), None, None),
            LineSpec::credit(&cash, dec!(1999.99), None, None),
        ];

        let err = ensure_balanced(&lines).unwrap_err();
        match err {
            LedgerError::Unbalanced { debits, credits } => {
                assert_eq!(debits, dec!(2000));
                assert_eq!(credits, dec!(1999.99));
            }
            other => panic!("expected Unbalanced, got {other:?}"),
        }
    }

    #[test]
    fn line_type_follows_the_non_zero_side() {
        let cash = account("1000", "Cash");
        assert_eq!(
            LineSpec::debit(&cash, dec!(1), None, None).line_type(),
            LineType::Debit
        );
        assert_eq!(
            LineSpec::credit(&cash, dec!(1), None, None).line_type(),
            LineType::Credit
        );
    }
}
