//! Schema DDL for the three tables. Idempotent (IF NOT EXISTS); run on every connect.
//! Order follows foreign-key dependencies.

use crate::models::{MAX_PRICE, MIN_PRICE};
use sqlx::SqlitePool;

const RESTAURANTS_DDL: &str = r#"
    CREATE TABLE IF NOT EXISTS restaurants (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        address TEXT NOT NULL
    )
"#;

const PIZZAS_DDL: &str = r#"
    CREATE TABLE IF NOT EXISTS pizzas (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        ingredients TEXT NOT NULL
    )
"#;

pub async fn apply_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(RESTAURANTS_DDL).execute(pool).await?;
    sqlx::query(PIZZAS_DDL).execute(pool).await?;

    let join_ddl = format!(
        r#"
        CREATE TABLE IF NOT EXISTS restaurant_pizzas (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            price REAL NOT NULL CHECK (price BETWEEN {} AND {}),
            restaurant_id INTEGER NOT NULL REFERENCES restaurants (id) ON DELETE CASCADE,
            pizza_id INTEGER NOT NULL REFERENCES pizzas (id) ON DELETE CASCADE
        )
        "#,
        MIN_PRICE, MAX_PRICE
    );
    sqlx::query(&join_ddl).execute(pool).await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_restaurant_pizzas_restaurant_id ON restaurant_pizzas (restaurant_id)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_restaurant_pizzas_pizza_id ON restaurant_pizzas (pizza_id)")
        .execute(pool)
        .await?;
    tracing::debug!("schema applied");
    Ok(())
}
