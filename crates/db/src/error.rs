//! Error classification for store operations.

use std::time::Duration;

use sea_orm::DbErr;
use simplebank_core::ledger::LedgerError;
use simplebank_shared::AppError;
use thiserror::Error;

/// Result type alias using `StoreError`.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors returned by the record access layer and the [`Store`](crate::Store).
#[derive(Debug, Error)]
pub enum StoreError {
    /// The targeted row does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Table-level name of the missing row.
        entity: &'static str,
        /// Primary key that was looked up.
        id: i64,
    },

    /// The call was rejected before any statement ran.
    #[error("Invalid argument: {0}")]
    InvalidArgument(#[from] LedgerError),

    /// The caller cancelled the transaction before it committed.
    #[error("Transaction cancelled")]
    Cancelled,

    /// The transaction did not commit within the caller's deadline.
    #[error("Transaction timed out after {0:?}")]
    TimedOut(Duration),

    /// Any other backend failure: connectivity, constraint violation, serialization failure.
    #[error("Database error: {0}")]
    Database(DbErr),
}

impl StoreError {
    /// Builds a `NotFound` for an account id.
    #[must_use]
    pub const fn account_not_found(id: i64) -> Self {
        Self::NotFound {
            entity: "account",
            id,
        }
    }

    /// Returns true if the error means the targeted row is absent.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true for failures of the storage backend itself.
    ///
    /// Cancellation and timeouts count as storage failures: the transaction
    /// was aborted underneath the caller.
    #[must_use]
    pub const fn is_storage(&self) -> bool {
        matches!(self, Self::Cancelled | Self::TimedOut(_) | Self::Database(_))
    }
}

impl StoreError {
    /// Classifies a failed write that targeted one row by primary key.
    ///
    /// `RecordNotFound` and `RecordNotUpdated` become a `NotFound` naming
    /// that row; everything else is a database error.
    #[must_use]
    pub fn from_targeted(err: DbErr, entity: &'static str, id: i64) -> Self {
        match err {
            DbErr::RecordNotFound(_) | DbErr::RecordNotUpdated => Self::NotFound { entity, id },
            other => Self::Database(other),
        }
    }
}

impl From<DbErr> for StoreError {
    fn from(err: DbErr) -> Self {
        Self::Database(err)
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        let message = err.to_string();
        match err {
            StoreError::NotFound { .. } => Self::NotFound(message),
            StoreError::InvalidArgument(e) => Self::Validation(e.to_string()),
            StoreError::Cancelled | StoreError::TimedOut(_) | StoreError::Database(_) => {
                Self::Database(message)
            }
        }
    }
}
