//! Fund-transfer bookkeeping logic.
//!
//! This module implements the rules every transfer obeys:
//! - Precondition checks on account ids, amounts and currencies
//! - Decomposition of a transfer into a balancing debit/credit pair
//! - Deterministic lock ordering for the two balance updates

pub mod error;
pub mod ordering;
pub mod transfer;

#[cfg(test)]
mod transfer_props;

pub use error::LedgerError;
pub use ordering::lock_order;
pub use transfer::{
    BalanceUpdate, TransferPlan, ensure_currency, ensure_distinct_accounts, validate_transfer,
};
