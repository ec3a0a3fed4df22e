//! Wipes the configured database and loads the sample restaurants and pizzas.

use pizzeria_api::seed::seed_sample_data;
use pizzeria_api::{AppConfig, SqliteStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("pizzeria_api=info")),
        )
        .init();

    let store = SqliteStore::connect(&config).await?;
    let summary = seed_sample_data(&store).await?;
    println!(
        "seeded {} restaurants, {} pizzas, {} restaurant_pizzas into {}",
        summary.restaurants, summary.pizzas, summary.restaurant_pizzas, config.database_url
    );
    Ok(())
}
