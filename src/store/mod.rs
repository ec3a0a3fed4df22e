//! Persistence seam. Handlers and services only see [`Store`]; the server wires in
//! [`SqliteStore`], tests may use [`MemoryStore`].

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::error::StoreError;
use crate::models::{NewRestaurantPizza, Pizza, Restaurant, RestaurantPizza};
use async_trait::async_trait;

#[async_trait]
pub trait Store: Send + Sync + 'static {
    async fn restaurants(&self) -> Result<Vec<Restaurant>, StoreError>;

    async fn restaurant(&self, id: i64) -> Result<Option<Restaurant>, StoreError>;

    async fn pizzas(&self) -> Result<Vec<Pizza>, StoreError>;

    async fn pizza(&self, id: i64) -> Result<Option<Pizza>, StoreError>;

    /// Pizzas with the given ids, in id order. Unknown ids are skipped.
    async fn pizzas_by_ids(&self, ids: &[i64]) -> Result<Vec<Pizza>, StoreError>;

    /// Join rows of one restaurant, in id order.
    async fn restaurant_pizzas_of(&self, restaurant_id: i64) -> Result<Vec<RestaurantPizza>, StoreError>;

    async fn count_restaurant_pizzas(&self) -> Result<i64, StoreError>;

    /// Persist a validated pairing in one transaction. Unknown restaurant or pizza
    /// yields [`StoreError::Integrity`] and nothing is written.
    async fn create_restaurant_pizza(&self, new: &NewRestaurantPizza) -> Result<RestaurantPizza, StoreError>;

    /// Delete a restaurant and its join rows atomically. Returns false if it did not exist.
    async fn delete_restaurant(&self, id: i64) -> Result<bool, StoreError>;

    async fn insert_restaurant(&self, name: &str, address: &str) -> Result<Restaurant, StoreError>;

    async fn insert_pizza(&self, name: &str, ingredients: &str) -> Result<Pizza, StoreError>;

    /// Remove every row from all three tables.
    async fn clear(&self) -> Result<(), StoreError>;

    /// Cheap round trip used by readiness checks.
    async fn ping(&self) -> Result<(), StoreError>;
}
