//! Record access layer.
//!
//! One statement per call, no cross-row logic. The functions are generic
//! over `ConnectionTrait` so the store can run them inside its own
//! transaction; everything multi-statement lives in [`crate::store`].

pub mod account;
pub mod entry;
pub mod transfer;

pub use account::{
    AddAccountBalanceParams, CreateAccountParams, ListAccountsParams, UpdateAccountParams,
};
pub use entry::{CreateEntryParams, ListEntriesParams};
pub use transfer::{CreateTransferParams, ListTransfersParams};
