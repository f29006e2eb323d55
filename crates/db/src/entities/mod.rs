//! `SeaORM` entities for the ledger schema.

pub mod prelude;

pub mod accounts;
pub mod entries;
pub mod transfers;
