//! Authentication: password hashing, JWT, register/login handlers.

mod handlers;
mod jwt;
pub(crate) mod password;

pub use handlers::{login, register};
pub use jwt::{Claims, TokenIdentity, TokenIssuer};
pub use password::{hash_password, unknown_account_hash, verify_password};
