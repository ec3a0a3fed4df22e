mod common;

use common::seed_fixture;
use pizzeria_api::{apply_migrations, AppConfig, NewRestaurantPizza, SqliteStore, Store, StoreError};

#[tokio::test]
async fn foreign_keys_are_enforced() {
    let store = SqliteStore::in_memory().await.unwrap();
    seed_fixture(&store).await;

    let err = store
        .create_restaurant_pizza(&NewRestaurantPizza::new(5.0, 42, 1).unwrap())
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::Integrity(_)), "got {err:?}");
    assert_eq!(store.count_restaurant_pizzas().await.unwrap(), 1);
}

#[tokio::test]
async fn price_check_backs_up_validation() {
    let store = SqliteStore::in_memory().await.unwrap();
    seed_fixture(&store).await;

    let err = sqlx::query("INSERT INTO restaurant_pizzas (price, restaurant_id, pizza_id) VALUES (50, 1, 1)")
        .execute(store.pool())
        .await
        .map_err(StoreError::from_write)
        .unwrap_err();

    assert!(matches!(err, StoreError::Integrity(_)), "got {err:?}");
}

#[tokio::test]
async fn deleting_a_pizza_cascades_too() {
    let store = SqliteStore::in_memory().await.unwrap();
    seed_fixture(&store).await;

    sqlx::query("DELETE FROM pizzas WHERE id = 2")
        .execute(store.pool())
        .await
        .unwrap();

    assert_eq!(store.count_restaurant_pizzas().await.unwrap(), 0);
    assert!(store.restaurant(1).await.unwrap().is_some());
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let store = SqliteStore::in_memory().await.unwrap();
    seed_fixture(&store).await;

    apply_migrations(store.pool()).await.unwrap();

    assert_eq!(store.restaurants().await.unwrap().len(), 2);
}

#[tokio::test]
async fn pizzas_by_ids_skips_unknown_and_orders_by_id() {
    let store = SqliteStore::in_memory().await.unwrap();
    seed_fixture(&store).await;

    let pizzas = store.pizzas_by_ids(&[2, 7, 1]).await.unwrap();

    assert_eq!(pizzas.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1, 2]);
    assert!(store.pizzas_by_ids(&[]).await.unwrap().is_empty());
}

#[tokio::test]
async fn file_database_is_created_and_persists() {
    let path = std::env::temp_dir().join(format!("pizzeria-api-test-{}.db", std::process::id()));
    let _ = std::fs::remove_file(&path);
    let config = AppConfig {
        database_url: format!("sqlite://{}", path.display()),
        ..AppConfig::default()
    };

    {
        let store = SqliteStore::connect(&config).await.unwrap();
        seed_fixture(&store).await;
        store.pool().close().await;
    }
    let reopened = SqliteStore::connect(&config).await.unwrap();
    let restaurant_pizzas = reopened.restaurant_pizzas_of(1).await.unwrap();

    assert_eq!(restaurant_pizzas.len(), 1);
    assert_eq!(restaurant_pizzas[0].price.value(), 10.0);
    reopened.pool().close().await;
    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn clear_empties_every_table() {
    let store = SqliteStore::in_memory().await.unwrap();
    seed_fixture(&store).await;

    store.clear().await.unwrap();

    assert!(store.restaurants().await.unwrap().is_empty());
    assert!(store.pizzas().await.unwrap().is_empty());
    assert_eq!(store.count_restaurant_pizzas().await.unwrap(), 0);
    store.ping().await.unwrap();
}
