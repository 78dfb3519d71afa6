//! HTTP handlers: accounts and health.

pub mod accounts;
pub mod http;

pub use accounts::{delete_account, get_account, list_accounts, update_account};
