//! API route definitions.

use axum::Router;
use simplebank_shared::PageRequest;

use crate::{AppState, error::ApiError};

pub mod accounts;
pub mod entries;
pub mod health;
pub mod transfers;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(accounts::routes())
        .merge(entries::routes())
        .merge(transfers::routes())
}

/// Rejects ids the database never generates.
fn require_id(id: i64) -> Result<i64, ApiError> {
    if id < 1 {
        return Err(ApiError::bad_request(format!("id must be at least 1, got {id}")));
    }
    Ok(id)
}

/// Validates a page request and returns `(limit, offset)`.
fn page_window(page: PageRequest) -> Result<(u64, u64), ApiError> {
    page.validate()?;
    Ok((page.limit(), page.offset()))
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
    };
    use chrono::Utc;
    use http_body_util::BodyExt;
    use simplebank_db::{
        MockStore,
        entities::{accounts, entries, transfers},
    };
    use tower::ServiceExt;

    use crate::{AppState, create_router};

    pub fn app(store: MockStore) -> Router {
        create_router(AppState::new(Arc::new(store), Duration::from_secs(5)))
    }

    /// Sends one request and returns the status and the decoded JSON body.
    pub async fn send(
        app: Router,
        method: &str,
        uri: &str,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    pub fn account(id: i64, balance: i64, currency: &str) -> accounts::Model {
        accounts::Model {
            id,
            owner_id: id * 10,
            balance,
            currency: currency.to_string(),
            created_at: Utc::now().fixed_offset(),
        }
    }

    pub fn entry(id: i64, account_id: i64, amount: i64) -> entries::Model {
        entries::Model {
            id,
            account_id,
            amount,
            created_at: Utc::now().fixed_offset(),
        }
    }

    pub fn transfer(id: i64, from_account_id: i64, to_account_id: i64, amount: i64) -> transfers::Model {
        transfers::Model {
            id,
            from_account_id,
            to_account_id,
            amount,
            created_at: Utc::now().fixed_offset(),
        }
    }
}
