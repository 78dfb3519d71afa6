//! User account REST API built with Rust.
//!
//! Registration, login with JWT issuance, and profile management over
//! PostgreSQL. Passwords are stored as argon2 hashes; identity fields are
//! validated per field with all failures reported together.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod validation;

pub use config::Config;
pub use error::AppError;
pub use handlers::http::AppState;
pub use services::AccountService;

use axum::routing::{delete, get, post, put};
use handlers::http;
use tower_http::trace::TraceLayer;

/// Build the API router (users, health). Used by main and by integration tests.
pub fn create_app(state: AppState) -> axum::Router {
    let user_routes = axum::Router::new()
        .route("/", get(handlers::list_accounts))
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/:id", get(handlers::get_account))
        .route("/update/:id", put(handlers::update_account))
        .route("/delete/:id", delete(handlers::delete_account));

    axum::Router::new()
        .route("/health", get(http::health))
        .nest("/users", user_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
