//! Sample data for local runs.

use crate::error::AppError;
use crate::models::NewRestaurantPizza;
use crate::store::Store;

const RESTAURANTS: &[(&str, &str)] = &[
    ("Karen's Pizza Shack", "address1"),
    ("Sanjay's Pizza", "address2"),
    ("Kiki's Pizza", "address3"),
];

const PIZZAS: &[(&str, &str)] = &[
    ("Emma", "Dough, Tomato Sauce, Cheese"),
    ("Geri", "Dough, Tomato Sauce, Cheese, Pepperoni"),
    ("Melanie", "Dough, Sauce, Ricotta, Red peppers, Mustard"),
];

/// (restaurant index, pizza index, price)
const MENU: &[(usize, usize, f64)] = &[(0, 0, 1.0), (1, 1, 4.0), (2, 2, 5.0)];

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub restaurants: usize,
    pub pizzas: usize,
    pub restaurant_pizzas: usize,
}

/// Replace all data with the sample set.
pub async fn seed_sample_data(store: &dyn Store) -> Result<SeedSummary, AppError> {
    store.clear().await?;

    let mut restaurants = Vec::with_capacity(RESTAURANTS.len());
    for (name, address) in RESTAURANTS {
        restaurants.push(store.insert_restaurant(name, address).await?);
    }
    let mut pizzas = Vec::with_capacity(PIZZAS.len());
    for (name, ingredients) in PIZZAS {
        pizzas.push(store.insert_pizza(name, ingredients).await?);
    }
    for &(r, p, price) in MENU {
        let new = NewRestaurantPizza::new(price, restaurants[r].id, pizzas[p].id)?;
        store.create_restaurant_pizza(&new).await?;
    }

    let summary = SeedSummary {
        restaurants: restaurants.len(),
        pizzas: pizzas.len(),
        restaurant_pizzas: MENU.len(),
    };
    tracing::info!(?summary, "seeded sample data");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn seeding_twice_replaces_data() {
        let store = MemoryStore::new();
        seed_sample_data(&store).await.unwrap();
        let summary = seed_sample_data(&store).await.unwrap();
        assert_eq!(summary.restaurants, 3);
        assert_eq!(store.restaurants().await.unwrap().len(), 3);
        assert_eq!(store.pizzas().await.unwrap().len(), 3);
        assert_eq!(store.count_restaurant_pizzas().await.unwrap(), 3);
    }
}
