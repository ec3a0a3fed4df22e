//! In-process store with the same integrity rules as the SQL schema.

use super::Store;
use crate::error::StoreError;
use crate::models::{NewRestaurantPizza, Pizza, Restaurant, RestaurantPizza};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Default)]
struct Tables {
    sequences: [i64; 3],
    restaurants: BTreeMap<i64, Restaurant>,
    pizzas: BTreeMap<i64, Pizza>,
    restaurant_pizzas: BTreeMap<i64, RestaurantPizza>,
}

/// Next id after the largest ever used, like AUTOINCREMENT.
fn next_id<T>(rows: &BTreeMap<i64, T>, floor: &mut i64) -> i64 {
    let id = rows.keys().next_back().copied().unwrap_or(0).max(*floor) + 1;
    *floor = id;
    id
}

/// Cloning shares the underlying tables.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, StoreError> {
        self.tables
            .read()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, StoreError> {
        self.tables
            .write()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".into()))
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn restaurants(&self) -> Result<Vec<Restaurant>, StoreError> {
        Ok(self.read()?.restaurants.values().cloned().collect())
    }

    async fn restaurant(&self, id: i64) -> Result<Option<Restaurant>, StoreError> {
        Ok(self.read()?.restaurants.get(&id).cloned())
    }

    async fn pizzas(&self) -> Result<Vec<Pizza>, StoreError> {
        Ok(self.read()?.pizzas.values().cloned().collect())
    }

    async fn pizza(&self, id: i64) -> Result<Option<Pizza>, StoreError> {
        Ok(self.read()?.pizzas.get(&id).cloned())
    }

    async fn pizzas_by_ids(&self, ids: &[i64]) -> Result<Vec<Pizza>, StoreError> {
        Ok(self
            .read()?
            .pizzas
            .values()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn restaurant_pizzas_of(&self, restaurant_id: i64) -> Result<Vec<RestaurantPizza>, StoreError> {
        Ok(self
            .read()?
            .restaurant_pizzas
            .values()
            .filter(|rp| rp.restaurant_id == restaurant_id)
            .cloned()
            .collect())
    }

    async fn count_restaurant_pizzas(&self) -> Result<i64, StoreError> {
        Ok(self.read()?.restaurant_pizzas.len() as i64)
    }

    async fn create_restaurant_pizza(&self, new: &NewRestaurantPizza) -> Result<RestaurantPizza, StoreError> {
        let mut guard = self.write()?;
        let tables = &mut *guard;
        if !tables.restaurants.contains_key(&new.restaurant_id) {
            return Err(StoreError::Integrity(format!("no restaurant {}", new.restaurant_id)));
        }
        if !tables.pizzas.contains_key(&new.pizza_id) {
            return Err(StoreError::Integrity(format!("no pizza {}", new.pizza_id)));
        }
        let row = RestaurantPizza {
            id: next_id(&tables.restaurant_pizzas, &mut tables.sequences[2]),
            price: new.price,
            restaurant_id: new.restaurant_id,
            pizza_id: new.pizza_id,
        };
        tables.restaurant_pizzas.insert(row.id, row.clone());
        Ok(row)
    }

    async fn delete_restaurant(&self, id: i64) -> Result<bool, StoreError> {
        let mut guard = self.write()?;
        let tables = &mut *guard;
        if tables.restaurants.remove(&id).is_none() {
            return Ok(false);
        }
        tables.restaurant_pizzas.retain(|_, rp| rp.restaurant_id != id);
        Ok(true)
    }

    async fn insert_restaurant(&self, name: &str, address: &str) -> Result<Restaurant, StoreError> {
        let mut guard = self.write()?;
        let tables = &mut *guard;
        let row = Restaurant {
            id: next_id(&tables.restaurants, &mut tables.sequences[0]),
            name: name.to_string(),
            address: address.to_string(),
        };
        tables.restaurants.insert(row.id, row.clone());
        Ok(row)
    }

    async fn insert_pizza(&self, name: &str, ingredients: &str) -> Result<Pizza, StoreError> {
        let mut guard = self.write()?;
        let tables = &mut *guard;
        let row = Pizza {
            id: next_id(&tables.pizzas, &mut tables.sequences[1]),
            name: name.to_string(),
            ingredients: ingredients.to_string(),
        };
        tables.pizzas.insert(row.id, row.clone());
        Ok(row)
    }

    async fn clear(&self) -> Result<(), StoreError> {
        let mut guard = self.write()?;
        let tables = &mut *guard;
        tables.restaurant_pizzas.clear();
        tables.restaurants.clear();
        tables.pizzas.clear();
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.read().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn rejects_unknown_references_without_writing() {
        let store = MemoryStore::new();
        let pizza = store.insert_pizza("Margherita", "Dough, Tomato, Cheese").await.unwrap();
        let new = NewRestaurantPizza::new(10.0, 999, pizza.id).unwrap();
        let err = store.create_restaurant_pizza(&new).await.unwrap_err();
        assert!(matches!(err, StoreError::Integrity(_)));
        assert_eq!(store.count_restaurant_pizzas().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn delete_cascades_to_join_rows() {
        let store = MemoryStore::new();
        let kept = store.insert_restaurant("Kiki's", "1 Main St").await.unwrap();
        let gone = store.insert_restaurant("Sottocasa", "2 Side St").await.unwrap();
        let pizza = store.insert_pizza("Emma", "Dough, Cheese").await.unwrap();
        for r in [&kept, &gone] {
            let new = NewRestaurantPizza::new(9.0, r.id, pizza.id).unwrap();
            store.create_restaurant_pizza(&new).await.unwrap();
        }

        assert!(store.delete_restaurant(gone.id).await.unwrap());
        assert!(!store.delete_restaurant(gone.id).await.unwrap());
        assert!(store.restaurant_pizzas_of(gone.id).await.unwrap().is_empty());
        assert_eq!(store.restaurant_pizzas_of(kept.id).await.unwrap().len(), 1);
    }
}
