//! Shared HTTP state and the health check.

use axum::{http::StatusCode, Json};
use serde_json::json;

use crate::auth::TokenIssuer;
use crate::db::DbPool;
use crate::services::AccountService;

/// Shared application state for all handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub accounts: AccountService,
}

impl AppState {
    pub fn new(db: DbPool, tokens: TokenIssuer) -> Self {
        Self {
            db,
            accounts: AccountService::new(tokens),
        }
    }

    pub fn db(&self) -> &DbPool {
        &self.db
    }
    pub fn accounts(&self) -> &AccountService {
        &self.accounts
    }
    pub fn tokens(&self) -> &TokenIssuer {
        self.accounts.tokens()
    }
}

/// GET /health: liveness check.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({ "status": "ok", "service": "accounts" })),
    )
}
