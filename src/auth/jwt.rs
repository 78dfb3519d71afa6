//! JWT issue and validation.

use crate::config::{ConfigLoadError, MIN_JWT_SECRET_LEN};
use crate::error::{AppError, AppResult};
use crate::models::Role;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // account id
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

/// Identity recovered from a valid token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenIdentity {
    pub account_id: Uuid,
    pub role: Role,
}

/// HS256 signer/verifier built once from config. Immutable after construction.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &str, ttl: Duration) -> Result<Self, ConfigLoadError> {
        if secret.len() < MIN_JWT_SECRET_LEN {
            return Err(ConfigLoadError::WeakJwtSecret);
        }
        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        })
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issue(&self, account_id: Uuid, role: Role, now: DateTime<Utc>) -> AppResult<String> {
        let claims = Claims {
            sub: account_id.to_string(),
            role,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("jwt encode: {}", e)))?;
        Ok(token)
    }

    /// Check signature and structure, then expiry against `now` (expired once `now >= exp`).
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> AppResult<TokenIdentity> {
        let mut validation = Validation::new(Algorithm::HS256);
        // expiry is checked against the caller's clock below
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let data = decode::<Claims>(token, &self.decoding, &validation)
            .map_err(|e| AppError::TokenInvalid(e.to_string()))?;
        if now.timestamp() >= data.claims.exp {
            return Err(AppError::TokenInvalid("token expired".to_string()));
        }
        let account_id = Uuid::parse_str(&data.claims.sub)
            .map_err(|e| AppError::TokenInvalid(e.to_string()))?;
        Ok(TokenIdentity {
            account_id,
            role: data.claims.role,
        })
    }
}
