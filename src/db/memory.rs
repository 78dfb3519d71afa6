//! In-memory `AccountStore` for tests and local development.

use async_trait::async_trait;
use std::collections::HashMap;
use uuid::Uuid;

use super::AccountStore;
use crate::error::{AppError, AppResult};
use crate::models::{email_key, Account};

/// Applies writes immediately; there is nothing to commit or roll back.
#[derive(Debug, Default, Clone)]
pub struct InMemoryAccountStore {
    accounts: HashMap<Uuid, Account>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    fn collides(&self, account: &Account) -> Option<&'static str> {
        let key = email_key(&account.email);
        self.accounts.values().find_map(|other| {
            if other.id == account.id {
                None
            } else if other.nickname == account.nickname {
                Some("nickname")
            } else if email_key(&other.email) == key {
                Some("email")
            } else {
                None
            }
        })
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn insert(&mut self, account: &Account) -> AppResult<()> {
        if self.accounts.contains_key(&account.id) {
            return Err(AppError::DuplicateIdentity("id".to_string()));
        }
        if let Some(field) = self.collides(account) {
            return Err(AppError::DuplicateIdentity(field.to_string()));
        }
        self.accounts.insert(account.id, account.clone());
        Ok(())
    }

    async fn find_by_id(&mut self, id: Uuid) -> AppResult<Option<Account>> {
        Ok(self.accounts.get(&id).cloned())
    }

    async fn find_by_nickname(&mut self, nickname: &str) -> AppResult<Option<Account>> {
        Ok(self
            .accounts
            .values()
            .find(|a| a.nickname == nickname)
            .cloned())
    }

    async fn find_by_email(&mut self, email: &str) -> AppResult<Option<Account>> {
        let key = email_key(email);
        Ok(self
            .accounts
            .values()
            .find(|a| email_key(&a.email) == key)
            .cloned())
    }

    async fn update(&mut self, account: &Account) -> AppResult<bool> {
        if !self.accounts.contains_key(&account.id) {
            return Ok(false);
        }
        if let Some(field) = self.collides(account) {
            return Err(AppError::DuplicateIdentity(field.to_string()));
        }
        self.accounts.insert(account.id, account.clone());
        Ok(true)
    }

    async fn delete(&mut self, id: Uuid) -> AppResult<bool> {
        Ok(self.accounts.remove(&id).is_some())
    }

    async fn count(&mut self) -> AppResult<u64> {
        Ok(self.accounts.len() as u64)
    }

    async fn list(&mut self, offset: i64, limit: i64) -> AppResult<Vec<Account>> {
        let mut all: Vec<&Account> = self.accounts.values().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(all
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }
}
