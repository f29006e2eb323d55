//! Postgres-backed store and the transfer transaction.

use std::pin::pin;
use std::time::Duration;

use async_trait::async_trait;
use sea_orm::{
    ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbErr, IsolationLevel, Statement,
    TransactionTrait,
};
use simplebank_core::ledger::TransferPlan;
use simplebank_shared::IsolationSetting;
use tracing::{debug, warn};

use super::context::Interrupt;
use super::{Store, TransferTxParams, TransferTxResult, TxContext};
use crate::entities::{accounts, entries, transfers};
use crate::error::{StoreError, StoreResult};
use crate::repositories::{
    AddAccountBalanceParams, CreateAccountParams, CreateEntryParams, CreateTransferParams,
    ListAccountsParams, ListEntriesParams, ListTransfersParams, UpdateAccountParams, account,
    entry, transfer,
};

/// Store backed by a Postgres connection pool.
#[derive(Debug, Clone)]
pub struct SqlStore {
    db: DatabaseConnection,
    isolation: IsolationLevel,
}

impl SqlStore {
    /// Creates a store running transfers at `READ COMMITTED`.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            isolation: IsolationLevel::ReadCommitted,
        }
    }

    /// Sets the isolation level of transfer transactions.
    #[must_use]
    pub fn with_isolation(mut self, setting: IsolationSetting) -> Self {
        self.isolation = match setting {
            IsolationSetting::ReadCommitted => IsolationLevel::ReadCommitted,
            IsolationSetting::RepeatableRead => IsolationLevel::RepeatableRead,
            IsolationSetting::Serializable => IsolationLevel::Serializable,
        };
        self
    }

    /// The underlying connection pool.
    #[must_use]
    pub const fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Opens the transaction, applies the plan and commits or rolls back.
    ///
    /// If the context fires first, the backend running the transaction is
    /// told to cancel its statement and the transaction is rolled back
    /// before returning, releasing any row lock it already took.
    async fn execute_transfer(
        &self,
        plan: TransferPlan,
        interrupt: &Interrupt,
    ) -> StoreResult<TransferTxResult> {
        interrupt.check()?;

        let txn = tokio::select! {
            biased;
            err = interrupt.fired() => return Err(err),
            txn = self.db.begin_with_config(Some(self.isolation), None) => txn?,
        };

        debug!(
            from_account_id = plan.from_account_id(),
            to_account_id = plan.to_account_id(),
            amount = plan.amount(),
            "Transfer transaction started"
        );

        let outcome = self.run_guarded(&txn, plan, interrupt).await;

        match outcome {
            Ok(result) => {
                txn.commit().await?;
                debug!(transfer_id = result.transfer.id, "Transfer committed");
                Ok(result)
            }
            Err(err) => {
                warn!(
                    error = %err,
                    from_account_id = plan.from_account_id(),
                    to_account_id = plan.to_account_id(),
                    "Transfer failed, rolling back"
                );
                if let Err(rollback_err) = txn.rollback().await {
                    warn!(error = %rollback_err, "Rollback failed");
                }
                Err(err)
            }
        }
    }

    /// Applies the plan inside `txn` while watching the context.
    ///
    /// Returns once no statement of `txn` is running on the server.
    async fn run_guarded(
        &self,
        txn: &DatabaseTransaction,
        plan: TransferPlan,
        interrupt: &Interrupt,
    ) -> StoreResult<TransferTxResult> {
        let pid = backend_pid(txn).await?;
        if let Some(remaining) = interrupt.remaining() {
            set_local_timeouts(txn, remaining).await?;
        }

        let mut work = pin!(apply_transfer(txn, plan));
        let fired = tokio::select! {
            biased;
            err = interrupt.fired() => err,
            result = &mut work => {
                // A server-side timeout surfaces as a database error.
                return result.map_err(|err| interrupt.check().err().unwrap_or(err));
            }
        };

        debug!(pid, error = %fired, "Interrupting transfer backend");
        let mut retry = tokio::time::interval(CANCEL_RETRY_INTERVAL);
        loop {
            tokio::select! {
                biased;
                _ = &mut work => return Err(fired),
                _ = retry.tick() => {
                    if let Err(err) = cancel_backend(&self.db, pid).await {
                        warn!(error = %err, pid, "Failed to cancel transfer backend");
                    }
                }
            }
        }
    }
}

/// How often a statement that outlived its cancel request is cancelled again.
const CANCEL_RETRY_INTERVAL: Duration = Duration::from_millis(50);

/// Server process id of the connection that owns `txn`.
async fn backend_pid(txn: &DatabaseTransaction) -> StoreResult<i32> {
    let row = txn
        .query_one(Statement::from_string(
            txn.get_database_backend(),
            "SELECT pg_backend_pid() AS pid",
        ))
        .await?
        .ok_or_else(|| StoreError::Database(DbErr::Custom("pg_backend_pid returned no row".into())))?;

    Ok(row.try_get::<i32>("", "pid")?)
}

/// Bounds lock waits and statements by the time left, in whole milliseconds.
///
/// Zero disables both settings in Postgres, so the floor is one.
async fn set_local_timeouts(txn: &DatabaseTransaction, remaining: Duration) -> StoreResult<()> {
    let millis = remaining.as_millis().max(1);
    txn.execute_unprepared(&format!(
        "SET LOCAL lock_timeout = {millis}; SET LOCAL statement_timeout = {millis}"
    ))
    .await?;
    Ok(())
}

/// Asks the server to cancel whatever `pid` is running, from another connection.
async fn cancel_backend(db: &DatabaseConnection, pid: i32) -> StoreResult<()> {
    db.execute(Statement::from_sql_and_values(
        db.get_database_backend(),
        "SELECT pg_cancel_backend($1)",
        [pid.into()],
    ))
    .await?;
    Ok(())
}

/// Writes the transfer, both entries and both balance updates.
///
/// Balance updates run lower account id first so that concurrent transfers
/// over the same pair acquire row locks in the same order.
async fn apply_transfer(
    txn: &DatabaseTransaction,
    plan: TransferPlan,
) -> StoreResult<TransferTxResult> {
    let transfer = transfer::create_transfer(
        txn,
        CreateTransferParams {
            from_account_id: plan.from_account_id(),
            to_account_id: plan.to_account_id(),
            amount: plan.amount(),
        },
    )
    .await?;

    let debit = plan.debit();
    let from_entry = entry::create_entry(
        txn,
        CreateEntryParams {
            account_id: debit.account_id,
            amount: debit.amount,
        },
    )
    .await?;

    let credit = plan.credit();
    let to_entry = entry::create_entry(
        txn,
        CreateEntryParams {
            account_id: credit.account_id,
            amount: credit.amount,
        },
    )
    .await?;

    let mut from_account = None;
    let mut to_account = None;
    for update in plan.balance_updates() {
        let updated = account::add_account_balance(
            txn,
            AddAccountBalanceParams {
                id: update.account_id,
                amount: update.amount,
            },
        )
        .await?;

        // A self-transfer updates one row twice; both sides end up with
        // the row as it stands after the second update.
        if updated.id == plan.from_account_id() {
            from_account = Some(updated.clone());
        }
        if updated.id == plan.to_account_id() {
            to_account = Some(updated);
        }
    }

    Ok(TransferTxResult {
        transfer,
        from_account: from_account
            .ok_or(StoreError::account_not_found(plan.from_account_id()))?,
        to_account: to_account.ok_or(StoreError::account_not_found(plan.to_account_id()))?,
        from_entry,
        to_entry,
    })
}

#[async_trait]
impl Store for SqlStore {
    async fn create_account(&self, params: CreateAccountParams) -> StoreResult<accounts::Model> {
        account::create_account(&self.db, params).await
    }

    async fn get_account(&self, id: i64) -> StoreResult<accounts::Model> {
        account::get_account(&self.db, id).await
    }

    async fn list_accounts(&self, params: ListAccountsParams) -> StoreResult<Vec<accounts::Model>> {
        account::list_accounts(&self.db, params).await
    }

    async fn update_account(&self, params: UpdateAccountParams) -> StoreResult<accounts::Model> {
        account::update_account(&self.db, params).await
    }

    async fn delete_account(&self, id: i64) -> StoreResult<()> {
        account::delete_account(&self.db, id).await
    }

    async fn get_entry(&self, id: i64) -> StoreResult<entries::Model> {
        entry::get_entry(&self.db, id).await
    }

    async fn list_entries(&self, params: ListEntriesParams) -> StoreResult<Vec<entries::Model>> {
        entry::list_entries(&self.db, params).await
    }

    async fn get_transfer(&self, id: i64) -> StoreResult<transfers::Model> {
        transfer::get_transfer(&self.db, id).await
    }

    async fn list_transfers(
        &self,
        params: ListTransfersParams,
    ) -> StoreResult<Vec<transfers::Model>> {
        transfer::list_transfers(&self.db, params).await
    }

    async fn transfer_tx(
        &self,
        ctx: TxContext,
        params: TransferTxParams,
    ) -> StoreResult<TransferTxResult> {
        let plan = TransferPlan::new(params.from_account_id, params.to_account_id, params.amount)?;
        self.execute_transfer(plan, &ctx.arm()).await
    }
}
