//! Auth extractor: bearer JWT to caller identity.

use axum::http::header::AUTHORIZATION;
use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use crate::auth::TokenIdentity;
use crate::error::AppError;
use crate::handlers::http::AppState;
use crate::models::Role;

const BEARER_PREFIX: &str = "Bearer ";

/// Extractor: authenticated caller from a `Authorization: Bearer <jwt>` header.
#[derive(Clone, Copy, Debug)]
pub struct AuthAccount(pub TokenIdentity);

impl AuthAccount {
    pub fn id(&self) -> Uuid {
        self.0.account_id
    }

    /// Callers may modify their own account; admins may modify any.
    pub fn can_manage(&self, account_id: Uuid) -> bool {
        self.0.account_id == account_id || self.0.role == Role::Admin
    }

    pub fn require_manage(&self, account_id: Uuid) -> Result<(), AppError> {
        if self.can_manage(account_id) {
            Ok(())
        } else {
            debug!(caller = %self.id(), target = %account_id, "denied: not owner or admin");
            Err(AppError::Forbidden(
                "Not allowed to modify this account".to_string(),
            ))
        }
    }
}

#[axum::async_trait]
impl axum::extract::FromRequestParts<AppState> for AuthAccount {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.strip_prefix(BEARER_PREFIX))
            .ok_or_else(|| {
                AppError::TokenInvalid("missing or invalid Authorization header".to_string())
            })?;
        let identity = state.tokens().verify(token.trim(), Utc::now())?;
        Ok(AuthAccount(identity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caller(role: Role) -> AuthAccount {
        AuthAccount(TokenIdentity {
            account_id: Uuid::new_v4(),
            role,
        })
    }

    #[test]
    fn owner_and_admin_can_manage() {
        let me = caller(Role::Authenticated);
        assert!(me.can_manage(me.id()));
        assert!(!me.can_manage(Uuid::new_v4()));
        assert!(caller(Role::Admin).can_manage(Uuid::new_v4()));
    }

    #[test]
    fn require_manage_is_forbidden_for_others() {
        let me = caller(Role::Authenticated);
        assert!(matches!(
            me.require_manage(Uuid::new_v4()),
            Err(AppError::Forbidden(_))
        ));
    }
}
