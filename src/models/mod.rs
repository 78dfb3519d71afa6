//! Data models: accounts and pagination.

pub mod account;
pub mod pagination;

pub use account::*;
pub use pagination::*;
