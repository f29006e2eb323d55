//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST API routes for accounts, entries and transfers
//! - Request extractors that reject malformed input with a JSON error body
//! - The mapping from store and ledger errors to HTTP responses

pub mod error;
pub mod extract;
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use simplebank_db::Store;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Ledger operations, real or mocked.
    pub store: Arc<dyn Store>,
    /// Deadline applied to every transfer transaction.
    pub transfer_timeout: Duration,
}

impl AppState {
    /// Creates state around a store.
    pub fn new(store: Arc<dyn Store>, transfer_timeout: Duration) -> Self {
        Self {
            store,
            transfer_timeout,
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
