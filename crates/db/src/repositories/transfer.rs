//! Transfer record access.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use crate::entities::transfers;
use crate::error::{StoreError, StoreResult};

/// Input for creating a transfer record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreateTransferParams {
    /// Source account.
    pub from_account_id: i64,
    /// Destination account.
    pub to_account_id: i64,
    /// Positive amount in minor units.
    pub amount: i64,
}

/// Paging window over transfers touching an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListTransfersParams {
    /// Matches transfers where this account is the source.
    pub from_account_id: i64,
    /// Matches transfers where this account is the destination.
    pub to_account_id: i64,
    /// Maximum rows returned.
    pub limit: u64,
    /// Rows skipped.
    pub offset: u64,
}

/// Inserts a transfer record.
pub async fn create_transfer<C: ConnectionTrait>(
    db: &C,
    params: CreateTransferParams,
) -> StoreResult<transfers::Model> {
    let transfer = transfers::ActiveModel {
        from_account_id: Set(params.from_account_id),
        to_account_id: Set(params.to_account_id),
        amount: Set(params.amount),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    };

    Ok(transfer.insert(db).await?)
}

/// Fetches a transfer by id.
pub async fn get_transfer<C: ConnectionTrait>(db: &C, id: i64) -> StoreResult<transfers::Model> {
    transfers::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(StoreError::NotFound {
            entity: "transfer",
            id,
        })
}

/// Lists transfers whose source or destination matches, oldest first.
pub async fn list_transfers<C: ConnectionTrait>(
    db: &C,
    params: ListTransfersParams,
) -> StoreResult<Vec<transfers::Model>> {
    let transfers = transfers::Entity::find()
        .filter(
            Condition::any()
                .add(transfers::Column::FromAccountId.eq(params.from_account_id))
                .add(transfers::Column::ToAccountId.eq(params.to_account_id)),
        )
        .order_by_asc(transfers::Column::Id)
        .limit(params.limit)
        .offset(params.offset)
        .all(db)
        .await?;

    Ok(transfers)
}
