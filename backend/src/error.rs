//! Error taxonomy for the ledger engine.
//!
//! Posters are the transaction boundary: any of these errors aborts the
//! surrounding transaction and is surfaced to the caller.

use rust_decimal::Decimal;
use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    #[error("invariant violated: {rule}")]
    InvariantViolation { rule: String },

    #[error("cow {cow_id} already has a disposition")]
    DuplicateDisposition { cow_id: i32 },

    /// Indicates a bug in entry construction; logged at ERROR by the poster.
    #[error("journal entry out of balance: debits {debits} != credits {credits}")]
    Unbalanced { debits: Decimal, credits: Decimal },

    #[error("data anomaly: {0}")]
    DataAnomaly(String),

    #[error(transparent)]
    Database(#[from] DbErr),
}

impl LedgerError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        LedgerError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn invariant(rule: impl Into<String>) -> Self {
        LedgerError::InvariantViolation { rule: rule.into() }
    }
}

pub type LedgerResult<T> = Result<T, LedgerError>;
