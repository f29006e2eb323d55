//! Transfer planning: how one movement of funds becomes ledger rows.
//!
//! A transfer of `amount` from A to B produces a debit entry of `-amount` on A
//! and a credit entry of `+amount` on B. The same two signed amounts are the
//! balance deltas. [`TransferPlan::balance_updates`] yields them in lock order.

use serde::{Deserialize, Serialize};
use simplebank_shared::Currency;

use super::{error::LedgerError, ordering::lock_order};

/// A signed balance change on one account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceUpdate {
    /// Account whose balance changes.
    pub account_id: i64,
    /// Signed delta in minor units. Negative is a debit.
    pub amount: i64,
}

/// A validated transfer, ready to be executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferPlan {
    from_account_id: i64,
    to_account_id: i64,
    amount: i64,
}

impl TransferPlan {
    /// Builds a plan after checking the structural preconditions.
    ///
    /// A self-transfer (`from == to`) is structurally allowed here; callers
    /// that want to forbid it use [`ensure_distinct_accounts`].
    pub fn new(from_account_id: i64, to_account_id: i64, amount: i64) -> Result<Self, LedgerError> {
        validate_transfer(from_account_id, to_account_id, amount)?;
        Ok(Self {
            from_account_id,
            to_account_id,
            amount,
        })
    }

    /// Source account.
    #[must_use]
    pub const fn from_account_id(&self) -> i64 {
        self.from_account_id
    }

    /// Destination account.
    #[must_use]
    pub const fn to_account_id(&self) -> i64 {
        self.to_account_id
    }

    /// Positive amount moved.
    #[must_use]
    pub const fn amount(&self) -> i64 {
        self.amount
    }

    /// Entry on the source account.
    #[must_use]
    pub const fn debit(&self) -> BalanceUpdate {
        BalanceUpdate {
            account_id: self.from_account_id,
            amount: -self.amount,
        }
    }

    /// Entry on the destination account.
    #[must_use]
    pub const fn credit(&self) -> BalanceUpdate {
        BalanceUpdate {
            account_id: self.to_account_id,
            amount: self.amount,
        }
    }

    /// Both balance deltas, lower account id first.
    ///
    /// For a self-transfer the debit comes first and the row nets to zero.
    #[must_use]
    pub fn balance_updates(&self) -> [BalanceUpdate; 2] {
        let (first, _) = lock_order(self.from_account_id, self.to_account_id);
        if first == self.from_account_id {
            [self.debit(), self.credit()]
        } else {
            [self.credit(), self.debit()]
        }
    }
}

/// Checks ids and amount of a transfer.
pub fn validate_transfer(
    from_account_id: i64,
    to_account_id: i64,
    amount: i64,
) -> Result<(), LedgerError> {
    if from_account_id < 1 {
        return Err(LedgerError::InvalidAccountId(from_account_id));
    }
    if to_account_id < 1 {
        return Err(LedgerError::InvalidAccountId(to_account_id));
    }
    if amount <= 0 {
        return Err(LedgerError::NonPositiveAmount(amount));
    }
    Ok(())
}

/// Rejects a transfer whose source and destination coincide.
pub fn ensure_distinct_accounts(from_account_id: i64, to_account_id: i64) -> Result<(), LedgerError> {
    if from_account_id == to_account_id {
        return Err(LedgerError::SameAccount(from_account_id));
    }
    Ok(())
}

/// Checks that an account holds the currency a request was made in.
pub fn ensure_currency(
    account_id: i64,
    account_currency: &str,
    expected: Currency,
) -> Result<(), LedgerError> {
    if account_currency != expected.code() {
        return Err(LedgerError::CurrencyMismatch {
            account_id,
            expected: expected.code().to_string(),
            actual: account_currency.to_string(),
        });
    }
    Ok(())
}
