//! Database layer: pool, the account unit of work, and an in-memory store.

mod memory;
mod pool;
mod repositories;

pub use memory::InMemoryAccountStore;
pub use pool::{create_pool, run_migrations, DbPool};
pub use repositories::{AccountStore, PgUnitOfWork};
