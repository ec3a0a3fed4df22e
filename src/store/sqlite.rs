//! sqlx-backed store on SQLite.

use super::Store;
use crate::config::AppConfig;
use crate::error::StoreError;
use crate::migration::apply_migrations;
use crate::models::{NewRestaurantPizza, Pizza, Restaurant, RestaurantPizza};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if missing) the database in `config.database_url` and apply the schema.
    pub async fn connect(config: &AppConfig) -> Result<Self, StoreError> {
        let opts = SqliteConnectOptions::from_str(&config.database_url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(opts)
            .await?;
        Self::from_pool(pool).await
    }

    /// Private in-memory database. One connection that never expires, since every
    /// SQLite memory connection is its own database.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let opts = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(opts)
            .await?;
        Self::from_pool(pool).await
    }

    pub async fn from_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        apply_migrations(&pool).await?;
        Ok(SqliteStore { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl Store for SqliteStore {
    async fn restaurants(&self) -> Result<Vec<Restaurant>, StoreError> {
        let sql = "SELECT id, name, address FROM restaurants ORDER BY id";
        tracing::debug!(sql = %sql, "query");
        Ok(sqlx::query_as(sql).fetch_all(&self.pool).await?)
    }

    async fn restaurant(&self, id: i64) -> Result<Option<Restaurant>, StoreError> {
        let sql = "SELECT id, name, address FROM restaurants WHERE id = ?";
        tracing::debug!(sql = %sql, id, "query");
        Ok(sqlx::query_as(sql).bind(id).fetch_optional(&self.pool).await?)
    }

    async fn pizzas(&self) -> Result<Vec<Pizza>, StoreError> {
        let sql = "SELECT id, name, ingredients FROM pizzas ORDER BY id";
        tracing::debug!(sql = %sql, "query");
        Ok(sqlx::query_as(sql).fetch_all(&self.pool).await?)
    }

    async fn pizza(&self, id: i64) -> Result<Option<Pizza>, StoreError> {
        let sql = "SELECT id, name, ingredients FROM pizzas WHERE id = ?";
        tracing::debug!(sql = %sql, id, "query");
        Ok(sqlx::query_as(sql).bind(id).fetch_optional(&self.pool).await?)
    }

    async fn pizzas_by_ids(&self, ids: &[i64]) -> Result<Vec<Pizza>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!(
            "SELECT id, name, ingredients FROM pizzas WHERE id IN ({}) ORDER BY id",
            placeholders
        );
        tracing::debug!(sql = %sql, ids = ?ids, "query");
        let mut query = sqlx::query_as::<_, Pizza>(&sql);
        for id in ids {
            query = query.bind(id);
        }
        Ok(query.fetch_all(&self.pool).await?)
    }

    async fn restaurant_pizzas_of(&self, restaurant_id: i64) -> Result<Vec<RestaurantPizza>, StoreError> {
        let sql = "SELECT id, price, restaurant_id, pizza_id FROM restaurant_pizzas WHERE restaurant_id = ? ORDER BY id";
        tracing::debug!(sql = %sql, restaurant_id, "query");
        Ok(sqlx::query_as(sql).bind(restaurant_id).fetch_all(&self.pool).await?)
    }

    async fn count_restaurant_pizzas(&self) -> Result<i64, StoreError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM restaurant_pizzas")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn create_restaurant_pizza(&self, new: &NewRestaurantPizza) -> Result<RestaurantPizza, StoreError> {
        let sql = "INSERT INTO restaurant_pizzas (price, restaurant_id, pizza_id) VALUES (?, ?, ?) \
                   RETURNING id, price, restaurant_id, pizza_id";
        tracing::debug!(sql = %sql, new = ?new, "query (tx)");
        let mut tx = self.pool.begin().await?;
        let row: RestaurantPizza = sqlx::query_as(sql)
            .bind(new.price.value())
            .bind(new.restaurant_id)
            .bind(new.pizza_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(StoreError::from_write)?;
        tx.commit().await?;
        Ok(row)
    }

    async fn delete_restaurant(&self, id: i64) -> Result<bool, StoreError> {
        let sql = "DELETE FROM restaurants WHERE id = ?";
        tracing::debug!(sql = %sql, id, "query (tx)");
        let mut tx = self.pool.begin().await?;
        // restaurant_pizzas rows go with it via ON DELETE CASCADE
        let result = sqlx::query(sql)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(StoreError::from_write)?;
        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_restaurant(&self, name: &str, address: &str) -> Result<Restaurant, StoreError> {
        sqlx::query_as("INSERT INTO restaurants (name, address) VALUES (?, ?) RETURNING id, name, address")
            .bind(name)
            .bind(address)
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::from_write)
    }

    async fn insert_pizza(&self, name: &str, ingredients: &str) -> Result<Pizza, StoreError> {
        sqlx::query_as("INSERT INTO pizzas (name, ingredients) VALUES (?, ?) RETURNING id, name, ingredients")
            .bind(name)
            .bind(ingredients)
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::from_write)
    }

    async fn clear(&self) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        for table in ["restaurant_pizzas", "restaurants", "pizzas"] {
            sqlx::query(&format!("DELETE FROM {}", table))
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }
}
