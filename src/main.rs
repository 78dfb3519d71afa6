//! Entry point: load config, wire dependencies, and run the server.

use accounts::auth::TokenIssuer;
use accounts::config::Config;
use accounts::db;
use accounts::{create_app, AppState};
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!("config: {}", e))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))?;
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    // A bad signing key must stop startup before anything listens.
    let tokens = TokenIssuer::new(&config.jwt_secret, config.access_token_ttl)
        .map_err(|e| anyhow::anyhow!("jwt: {}", e))?;

    let db_pool = db::create_pool(&config.database_url).await?;
    db::run_migrations(&db_pool).await?;

    let state = AppState::new(db_pool, tokens);
    let app = create_app(state).layer(CorsLayer::permissive());

    tracing::info!(
        addr = %config.server_addr,
        token_ttl_secs = config.access_token_ttl.num_seconds(),
        "listening"
    );
    let listener = tokio::net::TcpListener::bind(config.server_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
