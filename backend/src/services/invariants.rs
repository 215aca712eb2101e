//! Invariant Enforcer
//!
//! Code-level replacements for the database triggers the ledger rules
//! describe: depreciation never lands after a cow's disposition, a cow has at
//! most one disposition, and ingesting a disposition sweeps any depreciation
//! already posted past it, regardless of event order. All callers hold the
//! per-tenant lock.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};

use crate::entities::{
    disposition, journal_line, Disposition, EntryType, JournalEntry, JournalLine,
};
use crate::error::{LedgerError, LedgerResult};
use crate::services::journal::JournalService;

/// Whether a depreciation posting dated `entry_date` is permitted for a cow
/// with the given disposition date.
pub fn depreciation_date_allowed(
    disposition_date: Option<NaiveDate>,
    entry_date: NaiveDate,
) -> bool {
    match disposition_date {
        Some(d) => entry_date <= d,
        None => true,
    }
}

/// What a post-disposition sweep removed
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepOutcome {
    pub lines_deleted: u32,
    pub entries_deleted: u32,
}

pub struct InvariantService;

impl InvariantService {
    pub fn new() -> Self {
        Self
    }

    /// Reject a second disposition for the same cow.
    pub async fn ensure_no_existing_disposition<C: ConnectionTrait>(
        &self,
        db: &C,
        cow_id: i32,
    ) -> LedgerResult<()> {
        let existing = Disposition::find()
            .filter(disposition::Column::CowId.eq(cow_id))
            .one(db)
            .await?;

        if existing.is_some() {
            return Err(LedgerError::DuplicateDisposition { cow_id });
        }
        Ok(())
    }

    /// Delete the cow's depreciation lines in entries dated after the
    /// disposition, fix the parent totals, and drop entries left empty.
    /// Ingesting a disposition after depreciation was already posted is
    /// therefore self-healing.
    pub async fn sweep_post_disposition_depreciation<C: ConnectionTrait>(
        &self,
        db: &C,
        cow_id: i32,
        disposition_date: NaiveDate,
    ) -> LedgerResult<SweepOutcome> {
        let rows = JournalLine::find()
            .filter(journal_line::Column::CowId.eq(cow_id))
            .find_also_related(JournalEntry)
            .all(db)
            .await?;

        let mut outcome = SweepOutcome::default();
        let mut touched_entries: Vec<i32> = Vec::new();

        for (line, entry) in rows {
            let Some(entry) = entry else { continue };
            let is_depreciation = matches!(entry.entry_type, EntryType::Depreciation);
            if is_depreciation && entry.entry_date > disposition_date {
                JournalLine::delete_by_id(line.id).exec(db).await?;
                outcome.lines_deleted += 1;
                if !touched_entries.contains(&entry.id) {
                    touched_entries.push(entry.id);
                }
            }
        }

        let journal = JournalService::new();
        for entry_id in touched_entries {
            let remaining = JournalLine::find()
                .filter(journal_line::Column::JournalEntryId.eq(entry_id))
                .all(db)
                .await?;
            if remaining.is_empty() {
                JournalEntry::delete_by_id(entry_id).exec(db).await?;
                outcome.entries_deleted += 1;
            } else {
                journal.recompute_total(db, entry_id).await?;
            }
        }

        if outcome.lines_deleted > 0 {
            tracing::info!(
                cow_id,
                %disposition_date,
                lines = outcome.lines_deleted,
                entries = outcome.entries_deleted,
                "swept post-disposition depreciation"
            );
        }

        Ok(outcome)
    }

    /// Ledger balance check over a set of (debit, credit) pairs; the posters
    /// run it as a final safety net before committing.
    pub fn assert_entry_balanced(
        &self,
        debits: Decimal,
        credits: Decimal,
    ) -> LedgerResult<()> {
        if debits != credits {
            tracing::error!(%debits, %credits, "entry failed the balance invariant");
            return Err(LedgerError::Unbalanced { debits, credits });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn depreciation_is_free_without_a_disposition() {
        assert!(depreciation_date_allowed(None, date(2030, 1, 31)));
    }

    #[test]
    fn depreciation_on_or_before_the_disposition_is_allowed() {
        let d = Some(date(2025, 6, 10));
        assert!(depreciation_date_allowed(d, date(2025, 5, 31)));
        assert!(depreciation_date_allowed(d, date(2025, 6, 10)));
    }

    #[test]
    fn depreciation_after_the_disposition_is_blocked() {
        let d = Some(date(2025, 6, 10));
        assert!(!depreciation_date_allowed(d, date(2025, 6, 11)));
        assert!(!depreciation_date_allowed(d, date(2025, 6, 30)));
    }
}
