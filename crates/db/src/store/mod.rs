//! The store capability and its implementations.
//!
//! Handlers are programmed against [`Store`]. [`SqlStore`] is the Postgres
//! implementation and the only place that opens multi-statement
//! transactions. With the `mock` feature, `MockStore` is generated for
//! handler tests; it carries canned responses and call counts and none of
//! the transactional guarantees.

mod context;
mod sql;

pub use context::TxContext;
pub use sql::SqlStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::entities::{accounts, entries, transfers};
use crate::error::StoreResult;
use crate::repositories::{
    CreateAccountParams, ListAccountsParams, ListEntriesParams, ListTransfersParams,
    UpdateAccountParams,
};

/// Input for a fund transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferTxParams {
    /// Account debited.
    pub from_account_id: i64,
    /// Account credited.
    pub to_account_id: i64,
    /// Positive amount in minor units.
    pub amount: i64,
}

/// Every row a transfer produced or touched, as committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferTxResult {
    /// The transfer record.
    pub transfer: transfers::Model,
    /// Source account after the debit.
    pub from_account: accounts::Model,
    /// Destination account after the credit.
    pub to_account: accounts::Model,
    /// Debit entry, amount `-transfer.amount`.
    pub from_entry: entries::Model,
    /// Credit entry, amount `+transfer.amount`.
    pub to_entry: entries::Model,
}

/// Ledger operations available to the HTTP layer.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait Store: Send + Sync {
    /// Creates an account.
    async fn create_account(&self, params: CreateAccountParams) -> StoreResult<accounts::Model>;

    /// Fetches an account.
    async fn get_account(&self, id: i64) -> StoreResult<accounts::Model>;

    /// Lists accounts by id.
    async fn list_accounts(&self, params: ListAccountsParams) -> StoreResult<Vec<accounts::Model>>;

    /// Overwrites an account balance.
    async fn update_account(&self, params: UpdateAccountParams) -> StoreResult<accounts::Model>;

    /// Deletes an account.
    async fn delete_account(&self, id: i64) -> StoreResult<()>;

    /// Fetches an entry.
    async fn get_entry(&self, id: i64) -> StoreResult<entries::Model>;

    /// Lists an account's entries.
    async fn list_entries(&self, params: ListEntriesParams) -> StoreResult<Vec<entries::Model>>;

    /// Fetches a transfer.
    async fn get_transfer(&self, id: i64) -> StoreResult<transfers::Model>;

    /// Lists transfers touching an account.
    async fn list_transfers(
        &self,
        params: ListTransfersParams,
    ) -> StoreResult<Vec<transfers::Model>>;

    /// Moves funds between two accounts in one transaction.
    ///
    /// Either every row in the result is committed or nothing is. The
    /// transfer aborts when `ctx` is cancelled or its timeout elapses.
    async fn transfer_tx(
        &self,
        ctx: TxContext,
        params: TransferTxParams,
    ) -> StoreResult<TransferTxResult>;
}
