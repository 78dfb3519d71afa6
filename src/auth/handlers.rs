//! Auth HTTP handlers: register, login.

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use validator::Validate;

use crate::db::PgUnitOfWork;
use crate::error::AppError;
use crate::handlers::http::AppState;
use crate::middleware::AppJson;
use crate::models::{AccountResponse, LoginRequest, RegisterAccount, TokenResponse};

/// POST /users/register
pub async fn register(
    State(state): State<AppState>,
    AppJson(body): AppJson<RegisterAccount>,
) -> Result<(StatusCode, Json<AccountResponse>), AppError> {
    body.validate()?;
    let mut uow = PgUnitOfWork::begin(state.db()).await?;
    let account = state.accounts().register(&mut uow, body, Utc::now()).await?;
    uow.commit().await?;
    Ok((StatusCode::CREATED, Json(account.into())))
}

/// POST /users/login
pub async fn login(
    State(state): State<AppState>,
    AppJson(body): AppJson<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let mut uow = PgUnitOfWork::begin(state.db()).await?;
    let token = state.accounts().login(&mut uow, body, Utc::now()).await?;
    uow.commit().await?;
    Ok(Json(token))
}
