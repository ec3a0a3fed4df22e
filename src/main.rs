//! Server: reads config from env, opens the SQLite store, serves the API.

use pizzeria_api::{app, AppConfig, AppState, SqliteStore};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("pizzeria_api=info,tower_http=info")),
        )
        .init();

    let store = SqliteStore::connect(&config).await?;
    tracing::info!(database = %config.database_url, "store ready");
    let router = app(AppState::new(store), config.body_limit);

    let listener = TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, router).await?;
    Ok(())
}
