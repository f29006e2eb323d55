//! Entry routes.

use axum::{Json, Router, extract::State, routing::get};
use simplebank_db::entities::entries;

use super::require_id;
use crate::{AppState, error::ApiError, extract::AppPath};

/// Creates the entry routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/entries/{id}", get(get_entry))
}

/// GET `/entries/{id}` - Fetch one entry.
async fn get_entry(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<entries::Model>, ApiError> {
    let id = require_id(id)?;
    Ok(Json(state.store.get_entry(id).await?))
}
