//! Account HTTP handlers: list, get, update, delete. All require a bearer token.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::db::PgUnitOfWork;
use crate::error::AppError;
use crate::handlers::http::AppState;
use crate::middleware::{AppJson, AppQuery, AuthAccount};
use crate::models::{AccountResponse, ListQuery, Page, UpdateAccount};

/// GET /users?page=&per_page=
pub async fn list_accounts(
    State(state): State<AppState>,
    _caller: AuthAccount,
    AppQuery(query): AppQuery<ListQuery>,
) -> Result<Json<Page<AccountResponse>>, AppError> {
    query.validate()?;
    let mut uow = PgUnitOfWork::begin(state.db()).await?;
    let page = state.accounts().list(&mut uow, &query).await?;
    uow.commit().await?;
    Ok(Json(page))
}

/// GET /users/:id
pub async fn get_account(
    State(state): State<AppState>,
    _caller: AuthAccount,
    Path(id): Path<Uuid>,
) -> Result<Json<AccountResponse>, AppError> {
    let mut uow = PgUnitOfWork::begin(state.db()).await?;
    let account = state.accounts().get(&mut uow, id).await?;
    uow.commit().await?;
    Ok(Json(account.into()))
}

/// PUT /users/update/:id
pub async fn update_account(
    State(state): State<AppState>,
    caller: AuthAccount,
    Path(id): Path<Uuid>,
    AppJson(body): AppJson<UpdateAccount>,
) -> Result<Json<AccountResponse>, AppError> {
    caller.require_manage(id)?;
    body.validate()?;
    let mut uow = PgUnitOfWork::begin(state.db()).await?;
    let account = state
        .accounts()
        .update(&mut uow, id, body, Utc::now())
        .await?;
    uow.commit().await?;
    Ok(Json(account.into()))
}

/// DELETE /users/delete/:id
pub async fn delete_account(
    State(state): State<AppState>,
    caller: AuthAccount,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    caller.require_manage(id)?;
    let mut uow = PgUnitOfWork::begin(state.db()).await?;
    state.accounts().delete(&mut uow, id).await?;
    uow.commit().await?;
    Ok(Json(json!({ "msg": "User deleted successfully" })))
}
