//! Core ledger rules for Simplebank.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! The database layer asks it how a transfer decomposes into entries and in
//! which order account rows are locked; the HTTP layer asks it whether a
//! transfer request is admissible.
//!
//! # Modules
//!
//! - `ledger` - Transfer planning, lock ordering and precondition checks

pub mod ledger;
