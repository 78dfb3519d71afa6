//! Request extractors shared by handlers.

pub mod auth;
pub mod extract;

pub use auth::AuthAccount;
pub use extract::{AppJson, AppQuery};
