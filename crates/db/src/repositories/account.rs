//! Account record access.
//!
//! Every function takes any `ConnectionTrait`, so the same call runs on the
//! pool or inside a `DatabaseTransaction` opened by the store.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, EntityTrait, QueryOrder, QuerySelect, Set, Statement,
};
use simplebank_shared::Currency;

use crate::entities::accounts;
use crate::error::{StoreError, StoreResult};

/// Input for creating an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateAccountParams {
    /// Owning user.
    pub owner_id: i64,
    /// Opening balance in minor units.
    pub balance: i64,
    /// Account currency, fixed for the account's lifetime.
    pub currency: Currency,
}

/// Paging window for listing accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListAccountsParams {
    /// Maximum rows returned.
    pub limit: u64,
    /// Rows skipped.
    pub offset: u64,
}

/// Input for overwriting an account balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateAccountParams {
    /// Account to update.
    pub id: i64,
    /// New balance in minor units.
    pub balance: i64,
}

/// Input for an atomic balance increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddAccountBalanceParams {
    /// Account to update.
    pub id: i64,
    /// Signed delta in minor units.
    pub amount: i64,
}

const ADD_ACCOUNT_BALANCE_SQL: &str = r"
UPDATE accounts
SET balance = balance + $1
WHERE id = $2
RETURNING id, owner_id, balance, currency, created_at
";

/// Inserts a new account.
pub async fn create_account<C: ConnectionTrait>(
    db: &C,
    params: CreateAccountParams,
) -> StoreResult<accounts::Model> {
    let account = accounts::ActiveModel {
        owner_id: Set(params.owner_id),
        balance: Set(params.balance),
        currency: Set(params.currency.code().to_string()),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    };

    Ok(account.insert(db).await?)
}

/// Fetches an account by id.
pub async fn get_account<C: ConnectionTrait>(db: &C, id: i64) -> StoreResult<accounts::Model> {
    accounts::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(StoreError::account_not_found(id))
}

/// Lists accounts ordered by id.
pub async fn list_accounts<C: ConnectionTrait>(
    db: &C,
    params: ListAccountsParams,
) -> StoreResult<Vec<accounts::Model>> {
    let accounts = accounts::Entity::find()
        .order_by_asc(accounts::Column::Id)
        .limit(params.limit)
        .offset(params.offset)
        .all(db)
        .await?;

    Ok(accounts)
}

/// Overwrites an account balance.
///
/// This bypasses the entry trail and is only exposed for administrative
/// corrections; transfers use [`add_account_balance`].
pub async fn update_account<C: ConnectionTrait>(
    db: &C,
    params: UpdateAccountParams,
) -> StoreResult<accounts::Model> {
    let account = accounts::ActiveModel {
        id: Set(params.id),
        balance: Set(params.balance),
        ..Default::default()
    };

    account
        .update(db)
        .await
        .map_err(|err| StoreError::from_targeted(err, "account", params.id))
}

/// Adds `amount` to an account balance and returns the updated row.
///
/// Runs as one `UPDATE ... SET balance = balance + $1` statement, so the
/// read-modify-write happens inside Postgres under the row lock. Inside a
/// transaction the lock is held until commit or rollback.
pub async fn add_account_balance<C: ConnectionTrait>(
    db: &C,
    params: AddAccountBalanceParams,
) -> StoreResult<accounts::Model> {
    let statement = Statement::from_sql_and_values(
        db.get_database_backend(),
        ADD_ACCOUNT_BALANCE_SQL,
        [params.amount.into(), params.id.into()],
    );

    accounts::Entity::find()
        .from_raw_sql(statement)
        .one(db)
        .await?
        .ok_or(StoreError::account_not_found(params.id))
}

/// Deletes an account outright.
///
/// Fails with a database error if entries or transfers still reference it.
pub async fn delete_account<C: ConnectionTrait>(db: &C, id: i64) -> StoreResult<()> {
    let result = accounts::Entity::delete_by_id(id).exec(db).await?;

    if result.rows_affected == 0 {
        return Err(StoreError::account_not_found(id));
    }

    Ok(())
}
