//! Account persistence: the unit-of-work trait and its PostgreSQL implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, Postgres, Transaction};
use uuid::Uuid;

use super::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{email_key, Account};

/// Unit of work over the accounts table. One value per request; changes made
/// through it become visible to others only once the owner commits.
#[async_trait]
pub trait AccountStore: Send {
    async fn insert(&mut self, account: &Account) -> AppResult<()>;
    async fn find_by_id(&mut self, id: Uuid) -> AppResult<Option<Account>>;
    async fn find_by_nickname(&mut self, nickname: &str) -> AppResult<Option<Account>>;
    /// Case-insensitive match.
    async fn find_by_email(&mut self, email: &str) -> AppResult<Option<Account>>;
    /// Returns false when no row has `account.id`.
    async fn update(&mut self, account: &Account) -> AppResult<bool>;
    async fn delete(&mut self, id: Uuid) -> AppResult<bool>;
    async fn count(&mut self) -> AppResult<u64>;
    /// Ordered by creation time.
    async fn list(&mut self, offset: i64, limit: i64) -> AppResult<Vec<Account>>;
}

/// Raw `accounts` row; `role` is stored as text.
#[derive(Debug, FromRow)]
pub(crate) struct AccountRow {
    id: Uuid,
    nickname: String,
    email: String,
    first_name: Option<String>,
    last_name: Option<String>,
    role: String,
    hashed_password: String,
    bio: Option<String>,
    profile_picture_url: Option<String>,
    linkedin_profile_url: Option<String>,
    github_profile_url: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    last_login_at: Option<DateTime<Utc>>,
}

impl TryFrom<AccountRow> for Account {
    type Error = AppError;

    fn try_from(row: AccountRow) -> AppResult<Self> {
        let role = row
            .role
            .parse()
            .map_err(|e: String| AppError::Internal(anyhow::anyhow!("account {}: {}", row.id, e)))?;
        Ok(Account {
            id: row.id,
            nickname: row.nickname,
            email: row.email,
            first_name: row.first_name,
            last_name: row.last_name,
            role,
            hashed_password: row.hashed_password,
            bio: row.bio,
            profile_picture_url: row.profile_picture_url,
            linkedin_profile_url: row.linkedin_profile_url,
            github_profile_url: row.github_profile_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
            last_login_at: row.last_login_at,
        })
    }
}

const ACCOUNT_COLUMNS: &str = "id, nickname, email, first_name, last_name, role, hashed_password, \
     bio, profile_picture_url, linkedin_profile_url, github_profile_url, \
     created_at, updated_at, last_login_at";

/// Map a unique-index violation to `DuplicateIdentity`; everything else stays a db error.
fn map_write_err(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            let what = match db.constraint() {
                Some(c) if c.contains("email") => "email",
                Some(c) if c.contains("nickname") => "nickname",
                _ => "nickname or email",
            };
            return AppError::DuplicateIdentity(what.to_string());
        }
    }
    AppError::Db(e)
}

/// Transaction-backed unit of work. Dropping without `commit` rolls back.
pub struct PgUnitOfWork {
    tx: Transaction<'static, Postgres>,
}

impl PgUnitOfWork {
    pub async fn begin(pool: &DbPool) -> AppResult<Self> {
        Ok(Self {
            tx: pool.begin().await?,
        })
    }

    pub async fn commit(self) -> AppResult<()> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn fetch_one_by(&mut self, column: &str, value: &str) -> AppResult<Option<Account>> {
        let sql = format!("SELECT {} FROM accounts WHERE {} = $1", ACCOUNT_COLUMNS, column);
        let row = sqlx::query_as::<_, AccountRow>(&sql)
            .bind(value)
            .fetch_optional(&mut *self.tx)
            .await?;
        row.map(Account::try_from).transpose()
    }
}

#[async_trait]
impl AccountStore for PgUnitOfWork {
    async fn insert(&mut self, account: &Account) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO accounts (id, nickname, email, first_name, last_name, role, hashed_password,
                bio, profile_picture_url, linkedin_profile_url, github_profile_url,
                created_at, updated_at, last_login_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(account.id)
        .bind(&account.nickname)
        .bind(&account.email)
        .bind(&account.first_name)
        .bind(&account.last_name)
        .bind(account.role.to_string())
        .bind(&account.hashed_password)
        .bind(&account.bio)
        .bind(&account.profile_picture_url)
        .bind(&account.linkedin_profile_url)
        .bind(&account.github_profile_url)
        .bind(account.created_at)
        .bind(account.updated_at)
        .bind(account.last_login_at)
        .execute(&mut *self.tx)
        .await
        .map_err(map_write_err)?;
        Ok(())
    }

    async fn find_by_id(&mut self, id: Uuid) -> AppResult<Option<Account>> {
        let sql = format!("SELECT {} FROM accounts WHERE id = $1", ACCOUNT_COLUMNS);
        let row = sqlx::query_as::<_, AccountRow>(&sql)
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?;
        row.map(Account::try_from).transpose()
    }

    async fn find_by_nickname(&mut self, nickname: &str) -> AppResult<Option<Account>> {
        self.fetch_one_by("nickname", nickname).await
    }

    async fn find_by_email(&mut self, email: &str) -> AppResult<Option<Account>> {
        self.fetch_one_by("lower(email)", &email_key(email)).await
    }

    async fn update(&mut self, account: &Account) -> AppResult<bool> {
        let r = sqlx::query(
            r#"
            UPDATE accounts SET nickname = $2, email = $3, first_name = $4, last_name = $5,
                role = $6, hashed_password = $7, bio = $8, profile_picture_url = $9,
                linkedin_profile_url = $10, github_profile_url = $11, updated_at = $12,
                last_login_at = $13
            WHERE id = $1
            "#,
        )
        .bind(account.id)
        .bind(&account.nickname)
        .bind(&account.email)
        .bind(&account.first_name)
        .bind(&account.last_name)
        .bind(account.role.to_string())
        .bind(&account.hashed_password)
        .bind(&account.bio)
        .bind(&account.profile_picture_url)
        .bind(&account.linkedin_profile_url)
        .bind(&account.github_profile_url)
        .bind(account.updated_at)
        .bind(account.last_login_at)
        .execute(&mut *self.tx)
        .await
        .map_err(map_write_err)?;
        Ok(r.rows_affected() > 0)
    }

    async fn delete(&mut self, id: Uuid) -> AppResult<bool> {
        let r = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await?;
        Ok(r.rows_affected() > 0)
    }

    async fn count(&mut self) -> AppResult<u64> {
        let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*)::bigint FROM accounts")
            .fetch_one(&mut *self.tx)
            .await?;
        Ok(n.max(0) as u64)
    }

    async fn list(&mut self, offset: i64, limit: i64) -> AppResult<Vec<Account>> {
        let sql = format!(
            "SELECT {} FROM accounts ORDER BY created_at, id OFFSET $1 LIMIT $2",
            ACCOUNT_COLUMNS
        );
        let rows = sqlx::query_as::<_, AccountRow>(&sql)
            .bind(offset)
            .bind(limit)
            .fetch_all(&mut *self.tx)
            .await?;
        rows.into_iter().map(Account::try_from).collect()
    }
}
