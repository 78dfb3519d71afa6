//! Password hashing and verification (argon2id, random salt per hash).

use crate::error::{AppError, AppResult};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use std::sync::LazyLock;
use tracing::debug;

// Verified against when no account matches, so unknown and known usernames
// cost one argon2 verification each.
static UNKNOWN_ACCOUNT_HASH: LazyLock<String> =
    LazyLock::new(|| hash_password("unknown-account-placeholder").unwrap_or_default());

#[cfg(test)]
thread_local! {
    pub(crate) static VERIFICATIONS: std::cell::Cell<usize> = const { std::cell::Cell::new(0) };
}

/// Hash `secret` into a PHC string (`$argon2id$v=19$...`) with a fresh salt.
pub fn hash_password(secret: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(secret.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("hash: {}", e)))?
        .to_string();
    Ok(hash)
}

/// Hash to verify against when the login name matches no account.
pub fn unknown_account_hash() -> &'static str {
    UNKNOWN_ACCOUNT_HASH.as_str()
}

/// Check `secret` against a stored PHC string. An unparsable hash never matches.
pub fn verify_password(secret: &str, hash: &str) -> bool {
    #[cfg(test)]
    VERIFICATIONS.with(|n| n.set(n.get() + 1));
    let parsed = match PasswordHash::new(hash) {
        Ok(parsed) => parsed,
        Err(e) => {
            debug!(error = %e, "stored password hash is malformed");
            return false;
        }
    };
    Argon2::default()
        .verify_password(secret.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_password() {
        let hash = hash_password("mypassword").unwrap();
        assert!(verify_password("mypassword", &hash));
        assert!(!verify_password("wrong", &hash));
    }

    #[test]
    fn same_secret_hashes_differently() {
        let a = hash_password("SecurePassword123!").unwrap();
        let b = hash_password("SecurePassword123!").unwrap();
        assert_ne!(a, b);
        assert!(verify_password("SecurePassword123!", &a));
        assert!(verify_password("SecurePassword123!", &b));
    }

    #[test]
    fn hash_is_not_plaintext() {
        let hash = hash_password("mypassword").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(!hash.contains("mypassword"));
    }

    #[test]
    fn unknown_account_hash_is_real_and_matches_nothing() {
        let hash = unknown_account_hash();
        assert!(hash.starts_with("$argon2"));
        assert!(PasswordHash::new(hash).is_ok());
        assert!(!verify_password("SecurePassword123!", hash));
    }

    #[test]
    fn malformed_hash_never_matches() {
        assert!(!verify_password("mypassword", ""));
        assert!(!verify_password("mypassword", "not-a-hash"));
        assert!(!verify_password("mypassword", "$argon2id$v=99$garbage"));
        assert!(!verify_password("mypassword", "$2b$12$abcdefghijklmnopqrstuv"));
    }
}
