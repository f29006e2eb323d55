//! Database layer with `SeaORM` entities, record access and the transfer store.
//!
//! This crate provides:
//! - `SeaORM` entity definitions for accounts, entries and transfers
//! - Record access functions that run on a pool or inside a transaction
//! - The [`Store`] capability trait and its Postgres implementation [`SqlStore`]
//! - Database migrations

pub mod entities;
pub mod error;
pub mod migration;
pub mod repositories;
pub mod store;

pub use error::{StoreError, StoreResult};
#[cfg(any(test, feature = "mock"))]
pub use store::MockStore;
pub use store::{SqlStore, Store, TransferTxParams, TransferTxResult, TxContext};

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use simplebank_shared::DatabaseConfig;

/// Establishes a pooled connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .sqlx_logging(false);

    Database::connect(options).await
}
