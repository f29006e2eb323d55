//! Ledger error types for transfer preconditions.

use simplebank_shared::{AppError, types::UnsupportedCurrency};
use thiserror::Error;

/// Errors raised when a transfer request is not admissible.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Account identifiers are generated from 1 upwards.
    #[error("Invalid account id: {0}")]
    InvalidAccountId(i64),

    /// Transfer amount must be strictly positive.
    #[error("Transfer amount must be positive, got {0}")]
    NonPositiveAmount(i64),

    /// Source and destination are the same account.
    #[error("Cannot transfer from account {0} to itself")]
    SameAccount(i64),

    /// Currency code outside the supported set.
    #[error(transparent)]
    UnsupportedCurrency(#[from] UnsupportedCurrency),

    /// Account currency differs from the requested currency.
    #[error("Account {account_id} currency mismatch: {actual} vs {expected}")]
    CurrencyMismatch {
        /// Account being checked.
        account_id: i64,
        /// Currency the request asked for.
        expected: String,
        /// Currency the account holds.
        actual: String,
    },
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        Self::Validation(err.to_string())
    }
}
