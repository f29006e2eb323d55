//! Shared types, errors, and configuration for Simplebank.
//!
//! This crate provides common types used across all other crates:
//! - Supported currency codes
//! - Pagination types for list endpoints
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, DatabaseConfig, IsolationSetting, ServerConfig};
pub use error::{AppError, AppResult};
pub use types::{Currency, PageRequest};
