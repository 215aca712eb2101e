//! Result records shared between the engine and its clients.
//!
//! Every engine operation returns one of these tagged records instead of a
//! free-form JSON object, so callers can rely on the field set.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Outcome of an acquisition or monthly depreciation posting
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "backend", derive(async_graphql::SimpleObject))]
pub struct PostingSummary {
    pub company_id: i32,
    pub month: i32,
    pub year: i32,
    pub cows_processed: i32,
    pub total_amount: Decimal,
    /// False when the period was already posted and left untouched
    pub journal_created: bool,
    pub journal_entry_id: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "backend", derive(async_graphql::SimpleObject))]
pub struct CatchUpResult {
    pub cow_id: i32,
    pub entries_created: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "backend", derive(async_graphql::SimpleObject))]
pub struct DispositionPostingResult {
    pub disposition_id: i32,
    pub journal_entry_id: i32,
    pub accumulated_depreciation: Decimal,
    pub final_book_value: Decimal,
    pub gain_loss: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "backend", derive(async_graphql::SimpleObject))]
pub struct ReinstatementResult {
    pub disposition_id: i32,
    pub reversal_entry_id: Option<i32>,
    pub catch_up_entries: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "backend", derive(async_graphql::SimpleObject))]
pub struct ReversalResult {
    pub original_entry_id: i32,
    pub reversal_entry_id: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "backend", derive(async_graphql::SimpleObject))]
pub struct YearSummary {
    pub year: i32,
    pub months_processed: i32,
    pub total_amount: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "backend", derive(async_graphql::SimpleObject))]
pub struct HistoricalRunSummary {
    pub company_id: i32,
    pub acquisitions_posted: i32,
    pub dispositions_posted: i32,
    pub years: Vec<YearSummary>,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "backend", derive(async_graphql::SimpleObject))]
pub struct MissingJournalsResult {
    pub company_id: i32,
    pub processed: i32,
    pub errors: Vec<String>,
    /// True when the sweep hit its per-run period cap before the end
    pub truncated: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "backend", derive(async_graphql::SimpleObject))]
pub struct DashboardStats {
    pub company_id: i32,
    pub active_count: i64,
    pub active_purchase_total: Decimal,
    pub active_current_value: Decimal,
    /// Ledger-derived: debits minus credits on the herd asset account
    pub asset_value: Decimal,
    /// Ledger-derived: credits minus debits on the contra-asset account
    pub accumulated_depreciation: Decimal,
    pub net_book_value: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "backend", derive(async_graphql::SimpleObject))]
pub struct ReconciliationRow {
    pub month: i32,
    pub starting_balance: i32,
    pub additions: i32,
    pub sales: i32,
    pub deaths: i32,
    pub culls: i32,
    pub ending_balance: i32,
    /// Herd actually in service at the end of the month, for side-by-side
    /// drift diagnostics
    pub actual_active_at_eom: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "backend", derive(async_graphql::SimpleObject))]
pub struct ReconciliationReport {
    pub company_id: i32,
    pub year: i32,
    /// One-time adjustment applied to the January starting balance
    pub year_adjustment: i32,
    pub rows: Vec<ReconciliationRow>,
}
