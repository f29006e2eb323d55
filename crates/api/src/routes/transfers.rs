//! Transfer routes.
//!
//! `POST /transfers` checks the request and both accounts before handing
//! the move to [`Store::transfer_tx`](simplebank_db::Store::transfer_tx).
//! Distinct ids and matching currencies are enforced here; the store itself
//! accepts any pair of existing accounts.

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use serde::Deserialize;
use simplebank_core::ledger::{
    LedgerError, ensure_currency, ensure_distinct_accounts, validate_transfer,
};
use simplebank_db::{TransferTxParams, TransferTxResult, TxContext, entities::transfers};
use simplebank_shared::Currency;
use tracing::info;

use super::require_id;
use crate::{
    AppState,
    error::ApiError,
    extract::{AppJson, AppPath},
};

/// Creates the transfer routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/transfers", post(create_transfer))
        .route("/transfers/{id}", get(get_transfer))
}

/// Request body for a transfer.
#[derive(Debug, Deserialize)]
pub struct TransferRequest {
    /// Account debited.
    pub from_account_id: i64,
    /// Account credited.
    pub to_account_id: i64,
    /// Positive amount in minor units.
    pub amount: i64,
    /// Currency both accounts must hold.
    pub currency: String,
}

/// POST `/transfers` - Move funds between two accounts.
async fn create_transfer(
    State(state): State<AppState>,
    AppJson(payload): AppJson<TransferRequest>,
) -> Result<Json<TransferTxResult>, ApiError> {
    validate_transfer(payload.from_account_id, payload.to_account_id, payload.amount)?;
    let currency: Currency = payload.currency.parse().map_err(LedgerError::from)?;
    ensure_distinct_accounts(payload.from_account_id, payload.to_account_id)?;

    let from = state.store.get_account(payload.from_account_id).await?;
    ensure_currency(from.id, &from.currency, currency)?;

    let to = state.store.get_account(payload.to_account_id).await?;
    ensure_currency(to.id, &to.currency, currency)?;

    let ctx = TxContext::new().with_timeout(state.transfer_timeout);
    let result = state
        .store
        .transfer_tx(
            ctx,
            TransferTxParams {
                from_account_id: from.id,
                to_account_id: to.id,
                amount: payload.amount,
            },
        )
        .await?;

    info!(
        transfer_id = result.transfer.id,
        from_account_id = result.transfer.from_account_id,
        to_account_id = result.transfer.to_account_id,
        amount = result.transfer.amount,
        "Transfer completed"
    );
    Ok(Json(result))
}

/// GET `/transfers/{id}` - Fetch one transfer.
async fn get_transfer(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<transfers::Model>, ApiError> {
    let id = require_id(id)?;
    Ok(Json(state.store.get_transfer(id).await?))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::http::StatusCode;
    use mockall::predicate::eq;
    use rstest::rstest;
    use serde_json::{Value, json};
    use simplebank_db::{
        MockStore, StoreError, TransferTxParams, TransferTxResult, entities::accounts,
    };

    use crate::routes::test_support::{account, app, entry, send, transfer};

    type Lookup = Option<Result<accounts::Model, StoreError>>;

    fn request(currency: &str) -> Value {
        json!({
            "from_account_id": 1,
            "to_account_id": 2,
            "amount": 100,
            "currency": currency
        })
    }

    fn success() -> TransferTxResult {
        TransferTxResult {
            transfer: transfer(1, 1, 2, 100),
            from_account: account(1, 0, "USD"),
            to_account: account(2, 200, "USD"),
            from_entry: entry(1, 1, -100),
            to_entry: entry(2, 2, 100),
        }
    }

    /// Expects each lookup at most once; `None` means never called.
    fn expect_lookup(store: &mut MockStore, id: i64, lookup: Lookup) {
        match lookup {
            Some(outcome) => {
                let mut outcome = Some(outcome);
                store
                    .expect_get_account()
                    .with(eq(id))
                    .times(1)
                    .returning(move |id| {
                        outcome
                            .take()
                            .unwrap_or(Err(StoreError::account_not_found(id)))
                    });
            }
            None => {
                store.expect_get_account().with(eq(id)).never();
            }
        }
    }

    fn mock_store(
        from: Lookup,
        to: Lookup,
        tx: Option<Result<TransferTxResult, StoreError>>,
    ) -> MockStore {
        let mut store = MockStore::new();
        expect_lookup(&mut store, 1, from);
        expect_lookup(&mut store, 2, to);

        match tx {
            Some(outcome) => {
                let mut outcome = Some(outcome);
                store
                    .expect_transfer_tx()
                    .withf(|ctx, params| {
                        ctx.timeout() == Some(Duration::from_secs(5))
                            && *params
                                == TransferTxParams {
                                    from_account_id: 1,
                                    to_account_id: 2,
                                    amount: 100,
                                }
                    })
                    .times(1)
                    .returning(move |_, _| outcome.take().unwrap_or(Err(StoreError::Cancelled)));
            }
            None => {
                store.expect_transfer_tx().never();
            }
        }
        store
    }

    #[rstest]
    #[case::invalid_from_account_id(
        json!({ "from_account_id": 0, "to_account_id": 2, "amount": 100, "currency": "USD" }),
        None, None, None,
        StatusCode::BAD_REQUEST
    )]
    #[case::invalid_to_account_id(
        json!({ "from_account_id": 1, "to_account_id": -2, "amount": 100, "currency": "USD" }),
        None, None, None,
        StatusCode::BAD_REQUEST
    )]
    #[case::zero_amount(
        json!({ "from_account_id": 1, "to_account_id": 2, "amount": 0, "currency": "USD" }),
        None, None, None,
        StatusCode::BAD_REQUEST
    )]
    #[case::negative_amount(
        json!({ "from_account_id": 1, "to_account_id": 2, "amount": -100, "currency": "USD" }),
        None, None, None,
        StatusCode::BAD_REQUEST
    )]
    #[case::unsupported_currency(request("JPY"), None, None, None, StatusCode::BAD_REQUEST)]
    #[case::missing_field(json!({ "from_account_id": 1 }), None, None, None, StatusCode::BAD_REQUEST)]
    #[case::same_account(
        json!({ "from_account_id": 2, "to_account_id": 2, "amount": 100, "currency": "USD" }),
        None, None, None,
        StatusCode::BAD_REQUEST
    )]
    #[case::from_account_storage_error(
        request("USD"),
        Some(Err(StoreError::Cancelled)), None, None,
        StatusCode::INTERNAL_SERVER_ERROR
    )]
    #[case::from_account_not_found(
        request("USD"),
        Some(Err(StoreError::account_not_found(1))), None, None,
        StatusCode::NOT_FOUND
    )]
    #[case::from_account_currency_mismatch(
        request("EUR"),
        Some(Ok(account(1, 100, "USD"))), None, None,
        StatusCode::BAD_REQUEST
    )]
    #[case::to_account_storage_error(
        request("USD"),
        Some(Ok(account(1, 100, "USD"))), Some(Err(StoreError::Cancelled)), None,
        StatusCode::INTERNAL_SERVER_ERROR
    )]
    #[case::to_account_not_found(
        request("USD"),
        Some(Ok(account(1, 100, "USD"))), Some(Err(StoreError::account_not_found(2))), None,
        StatusCode::NOT_FOUND
    )]
    #[case::to_account_currency_mismatch(
        request("USD"),
        Some(Ok(account(1, 100, "USD"))), Some(Ok(account(2, 100, "CAD"))), None,
        StatusCode::BAD_REQUEST
    )]
    #[case::transfer_timed_out(
        request("USD"),
        Some(Ok(account(1, 100, "USD"))), Some(Ok(account(2, 100, "USD"))),
        Some(Err(StoreError::TimedOut(Duration::from_secs(5)))),
        StatusCode::INTERNAL_SERVER_ERROR
    )]
    #[tokio::test]
    async fn test_create_transfer_rejected(
        #[case] body: Value,
        #[case] from: Lookup,
        #[case] to: Lookup,
        #[case] tx: Option<Result<TransferTxResult, StoreError>>,
        #[case] expected: StatusCode,
    ) {
        let store = mock_store(from, to, tx);

        let (status, json) = send(app(store), "POST", "/api/v1/transfers", Some(body)).await;

        assert_eq!(status, expected);
        assert!(json["error"].is_string());
        assert!(json["message"].is_string());
    }

    #[tokio::test]
    async fn test_create_transfer_error_message() {
        let store = mock_store(
            Some(Ok(account(1, 100, "USD"))),
            Some(Ok(account(2, 100, "USD"))),
            Some(Err(StoreError::Cancelled)),
        );

        let (status, json) = send(app(store), "POST", "/api/v1/transfers", Some(request("USD"))).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"], "DATABASE_ERROR");
        assert_eq!(json["message"], "Transaction cancelled");
    }

    #[tokio::test]
    async fn test_create_transfer_success() {
        let result = success();
        let expected = serde_json::to_value(&result).unwrap();

        let store = mock_store(
            Some(Ok(account(1, 100, "USD"))),
            Some(Ok(account(2, 100, "USD"))),
            Some(Ok(result)),
        );

        let (status, json) = send(app(store), "POST", "/api/v1/transfers", Some(request("USD"))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, expected);

        let decoded: TransferTxResult = serde_json::from_value(json).unwrap();
        assert_eq!(decoded.from_entry.amount + decoded.to_entry.amount, 0);
        assert_eq!(decoded.transfer.amount, 100);
    }

    #[tokio::test]
    async fn test_get_transfer() {
        let stored = transfer(3, 1, 2, 50);
        let expected = serde_json::to_value(&stored).unwrap();

        let mut store = MockStore::new();
        store
            .expect_get_transfer()
            .with(eq(3))
            .times(1)
            .returning(move |_| Ok(stored.clone()));

        let (status, json) = send(app(store), "GET", "/api/v1/transfers/3", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, expected);
    }

    #[tokio::test]
    async fn test_get_missing_transfer() {
        let mut store = MockStore::new();
        store
            .expect_get_transfer()
            .times(1)
            .returning(|id| Err(StoreError::NotFound { entity: "transfer", id }));

        let (status, _) = send(app(store), "GET", "/api/v1/transfers/3", None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
