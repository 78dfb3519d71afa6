//! Business logic: account lifecycle and authentication.

pub mod account;

pub use account::{AccountService, TOKEN_TYPE};
