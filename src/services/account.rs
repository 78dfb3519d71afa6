//! Account service: registration, login, profile updates, listing and deletion.
//!
//! Every operation takes the caller's unit of work explicitly; committing it is
//! the caller's job.

use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::auth::{hash_password, unknown_account_hash, verify_password, TokenIssuer};
use crate::db::AccountStore;
use crate::error::{AppError, AppResult};
use crate::models::{
    email_key, Account, AccountResponse, ListQuery, LoginRequest, Page, RegisterAccount,
    TokenResponse, UpdateAccount,
};

pub const TOKEN_TYPE: &str = "bearer";
const USERS_PATH: &str = "/users";

#[derive(Clone)]
pub struct AccountService {
    tokens: TokenIssuer,
}

impl AccountService {
    pub fn new(tokens: TokenIssuer) -> Self {
        Self { tokens }
    }

    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }

    pub async fn register<S: AccountStore + ?Sized>(
        &self,
        store: &mut S,
        input: RegisterAccount,
        now: DateTime<Utc>,
    ) -> AppResult<Account> {
        input.validate()?;

        if store.find_by_nickname(&input.nickname).await?.is_some() {
            return Err(AppError::DuplicateIdentity("nickname".to_string()));
        }
        if store.find_by_email(&input.email).await?.is_some() {
            return Err(AppError::DuplicateIdentity("email".to_string()));
        }

        let hashed_password = hash_password(&input.password)?;
        let account = Account::new(input, hashed_password, now);
        store.insert(&account).await?;

        info!(account_id = %account.id, nickname = %account.nickname, "account registered");
        Ok(account)
    }

    /// Same error for an unknown account and a wrong password.
    pub async fn login<S: AccountStore + ?Sized>(
        &self,
        store: &mut S,
        request: LoginRequest,
        now: DateTime<Utc>,
    ) -> AppResult<TokenResponse> {
        let found = if request.username.contains('@') {
            store.find_by_email(&request.username).await?
        } else {
            store.find_by_nickname(&request.username).await?
        };

        let stored_hash = found
            .as_ref()
            .map(|account| account.hashed_password.as_str())
            .unwrap_or_else(|| unknown_account_hash());
        let matches = verify_password(&request.password, stored_hash);

        let mut account = match found {
            Some(account) if matches => account,
            _ => {
                info!("login rejected");
                return Err(AppError::InvalidCredentials);
            }
        };

        account.last_login_at = Some(now);
        store.update(&account).await?;

        let access_token = self.tokens.issue(account.id, account.role, now)?;
        info!(account_id = %account.id, "login succeeded");
        Ok(TokenResponse {
            access_token,
            token_type: TOKEN_TYPE.to_string(),
            expires_in: self.tokens.ttl().num_seconds(),
        })
    }

    pub async fn get<S: AccountStore + ?Sized>(&self, store: &mut S, id: Uuid) -> AppResult<Account> {
        store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    /// Apply the fields present in `update`; others keep their stored values.
    pub async fn update<S: AccountStore + ?Sized>(
        &self,
        store: &mut S,
        id: Uuid,
        update: UpdateAccount,
        now: DateTime<Utc>,
    ) -> AppResult<Account> {
        update.validate()?;
        let mut account = self.get(store, id).await?;

        if let Some(nickname) = update.nickname.as_deref() {
            if nickname != account.nickname {
                if let Some(other) = store.find_by_nickname(nickname).await? {
                    if other.id != id {
                        return Err(AppError::DuplicateIdentity("nickname".to_string()));
                    }
                }
            }
        }
        if let Some(email) = update.email.as_deref() {
            if email_key(email) != email_key(&account.email) {
                if let Some(other) = store.find_by_email(email).await? {
                    if other.id != id {
                        return Err(AppError::DuplicateIdentity("email".to_string()));
                    }
                }
            }
        }

        account.apply_update(update, now);
        if !store.update(&account).await? {
            return Err(AppError::NotFound("User not found".to_string()));
        }
        info!(account_id = %id, "account updated");
        Ok(account)
    }

    /// One page of accounts. An empty page is reported as not found.
    pub async fn list<S: AccountStore + ?Sized>(
        &self,
        store: &mut S,
        query: &ListQuery,
    ) -> AppResult<Page<AccountResponse>> {
        query.validate()?;
        let total = store.count().await?;
        let accounts = store.list(query.offset(), query.limit()).await?;
        if accounts.is_empty() {
            return Err(AppError::NotFound("No users found".to_string()));
        }

        let ids: Vec<Uuid> = accounts.iter().map(|a| a.id).collect();
        let items = accounts.into_iter().map(AccountResponse::from).collect();
        let mut page = Page::new(items, query, total, USERS_PATH);
        for id in ids {
            page.add_link("self", format!("{}/{}", USERS_PATH, id));
        }
        Ok(page)
    }

    pub async fn delete<S: AccountStore + ?Sized>(&self, store: &mut S, id: Uuid) -> AppResult<()> {
        if !store.delete(id).await? {
            return Err(AppError::NotFound("User not found".to_string()));
        }
        info!(account_id = %id, "account deleted");
        Ok(())
    }
}
