//! Account routes.

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};
use simplebank_core::ledger::LedgerError;
use simplebank_db::{
    entities::{accounts, entries, transfers},
    repositories::{
        CreateAccountParams, ListAccountsParams, ListEntriesParams, ListTransfersParams,
        UpdateAccountParams,
    },
};
use simplebank_shared::{Currency, PageRequest};
use tracing::info;

use super::{page_window, require_id};
use crate::{
    AppState,
    error::ApiError,
    extract::{AppJson, AppPath, AppQuery},
};

/// Creates the account routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounts", post(create_account).get(list_accounts))
        .route(
            "/accounts/{id}",
            get(get_account).put(update_account).delete(delete_account),
        )
        .route("/accounts/{id}/entries", get(list_account_entries))
        .route("/accounts/{id}/transfers", get(list_account_transfers))
}

/// Request body for creating an account.
#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    /// Owning user, positive.
    pub owner_id: i64,
    /// One of `USD`, `EUR`, `CAD`.
    pub currency: String,
}

/// Request body for overwriting an account balance.
#[derive(Debug, Deserialize)]
pub struct UpdateAccountRequest {
    /// New balance in minor units.
    pub balance: i64,
}

/// POST `/accounts` - Open an account with a zero balance.
async fn create_account(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateAccountRequest>,
) -> Result<Json<accounts::Model>, ApiError> {
    if payload.owner_id < 1 {
        return Err(ApiError::bad_request(format!(
            "owner_id must be at least 1, got {}",
            payload.owner_id
        )));
    }
    let currency: Currency = payload.currency.parse().map_err(LedgerError::from)?;

    let account = state
        .store
        .create_account(CreateAccountParams {
            owner_id: payload.owner_id,
            balance: 0,
            currency,
        })
        .await?;

    info!(
        account_id = account.id,
        owner_id = account.owner_id,
        currency = %account.currency,
        "Account created"
    );
    Ok(Json(account))
}

/// GET `/accounts/{id}` - Fetch one account.
async fn get_account(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<accounts::Model>, ApiError> {
    let id = require_id(id)?;
    Ok(Json(state.store.get_account(id).await?))
}

/// GET `/accounts` - List accounts by id.
async fn list_accounts(
    State(state): State<AppState>,
    AppQuery(page): AppQuery<PageRequest>,
) -> Result<Json<Vec<accounts::Model>>, ApiError> {
    let (limit, offset) = page_window(page)?;
    let accounts = state
        .store
        .list_accounts(ListAccountsParams { limit, offset })
        .await?;
    Ok(Json(accounts))
}

/// PUT `/accounts/{id}` - Overwrite an account balance.
async fn update_account(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    AppJson(payload): AppJson<UpdateAccountRequest>,
) -> Result<Json<accounts::Model>, ApiError> {
    let id = require_id(id)?;
    let account = state
        .store
        .update_account(UpdateAccountParams {
            id,
            balance: payload.balance,
        })
        .await?;

    info!(account_id = id, balance = account.balance, "Account balance overwritten");
    Ok(Json(account))
}

/// DELETE `/accounts/{id}` - Delete an account with no history.
async fn delete_account(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<Value>, ApiError> {
    let id = require_id(id)?;
    state.store.delete_account(id).await?;

    info!(account_id = id, "Account deleted");
    Ok(Json(json!({ "id": id, "deleted": true })))
}

/// GET `/accounts/{id}/entries` - Page through an account's entries.
async fn list_account_entries(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    AppQuery(page): AppQuery<PageRequest>,
) -> Result<Json<Vec<entries::Model>>, ApiError> {
    let account_id = require_id(id)?;
    let (limit, offset) = page_window(page)?;
    let entries = state
        .store
        .list_entries(ListEntriesParams {
            account_id,
            limit,
            offset,
        })
        .await?;
    Ok(Json(entries))
}

/// GET `/accounts/{id}/transfers` - Page through transfers in or out of an account.
async fn list_account_transfers(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    AppQuery(page): AppQuery<PageRequest>,
) -> Result<Json<Vec<transfers::Model>>, ApiError> {
    let account_id = require_id(id)?;
    let (limit, offset) = page_window(page)?;
    let transfers = state
        .store
        .list_transfers(ListTransfersParams {
            from_account_id: account_id,
            to_account_id: account_id,
            limit,
            offset,
        })
        .await?;
    Ok(Json(transfers))
}
