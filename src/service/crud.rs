//! The API operations, written against the [`Store`] handle they are given.

use crate::error::AppError;
use crate::serializer::{Graph, Rules};
use crate::service::RequestValidator;
use crate::store::Store;
use serde_json::Value;

pub struct PizzeriaService;

impl PizzeriaService {
    /// All restaurants, shallow.
    pub async fn list_restaurants(store: &dyn Store) -> Result<Value, AppError> {
        let mut graph = Graph::new();
        let roots = graph.extend_restaurants(store.restaurants().await?);
        Ok(Rules::shallow().to_values(&graph, &roots))
    }

    /// One restaurant with its join rows and their pizzas.
    pub async fn restaurant_detail(store: &dyn Store, id: i64) -> Result<Value, AppError> {
        let restaurant = store.restaurant(id).await?.ok_or(AppError::NotFound("Restaurant"))?;
        let links = store.restaurant_pizzas_of(id).await?;
        let mut pizza_ids: Vec<i64> = links.iter().map(|rp| rp.pizza_id).collect();
        pizza_ids.sort_unstable();
        pizza_ids.dedup();
        let pizzas = store.pizzas_by_ids(&pizza_ids).await?;

        let mut graph = Graph::new();
        let root = graph.add_restaurant(restaurant);
        graph.extend_restaurant_pizzas(links);
        graph.extend_pizzas(pizzas);
        Ok(Rules::restaurant_detail().to_value(&graph, root))
    }

    /// Delete a restaurant (and, through the store, its join rows).
    pub async fn delete_restaurant(store: &dyn Store, id: i64) -> Result<(), AppError> {
        if store.restaurant(id).await?.is_none() {
            return Err(AppError::NotFound("Restaurant"));
        }
        if !store.delete_restaurant(id).await? {
            // removed by a concurrent request in between
            return Err(AppError::NotFound("Restaurant"));
        }
        tracing::info!(restaurant_id = id, "restaurant deleted");
        Ok(())
    }

    /// All pizzas, shallow.
    pub async fn list_pizzas(store: &dyn Store) -> Result<Value, AppError> {
        let mut graph = Graph::new();
        let roots = graph.extend_pizzas(store.pizzas().await?);
        Ok(Rules::shallow().to_values(&graph, &roots))
    }

    /// Validate and persist a join row; returns it with both ends nested.
    pub async fn create_restaurant_pizza(store: &dyn Store, body: &Value) -> Result<Value, AppError> {
        let new = RequestValidator::restaurant_pizza(body)?;
        let created = store.create_restaurant_pizza(&new).await?;
        tracing::info!(
            restaurant_pizza_id = created.id,
            restaurant_id = created.restaurant_id,
            pizza_id = created.pizza_id,
            "restaurant pizza created"
        );

        let mut graph = Graph::new();
        if let Some(restaurant) = store.restaurant(created.restaurant_id).await? {
            graph.add_restaurant(restaurant);
        }
        if let Some(pizza) = store.pizza(created.pizza_id).await? {
            graph.add_pizza(pizza);
        }
        let root = graph.add_restaurant_pizza(created);
        Ok(Rules::restaurant_pizza_created().to_value(&graph, root))
    }
}
