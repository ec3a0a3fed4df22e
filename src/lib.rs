//! Pizzeria API: restaurants, pizzas and priced restaurant/pizza pairings over REST.

pub mod config;
pub mod error;
pub mod handlers;
pub mod migration;
pub mod models;
pub mod openapi;
pub mod response;
pub mod routes;
pub mod seed;
pub mod serializer;
pub mod service;
pub mod state;
pub mod store;

pub use config::AppConfig;
pub use error::{AppError, ConfigError, StoreError, ValidationError};
pub use migration::apply_migrations;
pub use models::{NewRestaurantPizza, Pizza, Price, Restaurant, RestaurantPizza};
pub use routes::{app, common_routes, entity_routes};
pub use serializer::{Graph, Node, Rules};
pub use service::PizzeriaService;
pub use state::AppState;
pub use store::{MemoryStore, SqliteStore, Store};
