//! Entry record access.
//!
//! Entries are write-once; there is no update or delete here.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::entities::entries;
use crate::error::{StoreError, StoreResult};

/// Input for creating an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreateEntryParams {
    /// Account the entry belongs to.
    pub account_id: i64,
    /// Signed amount in minor units.
    pub amount: i64,
}

/// Paging window over one account's entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListEntriesParams {
    /// Account whose entries are listed.
    pub account_id: i64,
    /// Maximum rows returned.
    pub limit: u64,
    /// Rows skipped.
    pub offset: u64,
}

/// Inserts an entry.
pub async fn create_entry<C: ConnectionTrait>(
    db: &C,
    params: CreateEntryParams,
) -> StoreResult<entries::Model> {
    let entry = entries::ActiveModel {
        account_id: Set(params.account_id),
        amount: Set(params.amount),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    };

    Ok(entry.insert(db).await?)
}

/// Fetches an entry by id.
pub async fn get_entry<C: ConnectionTrait>(db: &C, id: i64) -> StoreResult<entries::Model> {
    entries::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(StoreError::NotFound { entity: "entry", id })
}

/// Lists an account's entries, oldest first.
pub async fn list_entries<C: ConnectionTrait>(
    db: &C,
    params: ListEntriesParams,
) -> StoreResult<Vec<entries::Model>> {
    let entries = entries::Entity::find()
        .filter(entries::Column::AccountId.eq(params.account_id))
        .order_by_asc(entries::Column::Id)
        .limit(params.limit)
        .offset(params.offset)
        .all(db)
        .await?;

    Ok(entries)
}
