//! OpenAPI document served at `/openapi.json`.

use crate::error::{ErrorBody, ErrorsBody};
use crate::handlers::entity;
use crate::models::{Pizza, Restaurant, RestaurantPizza};
use utoipa::{OpenApi, ToSchema};

/// Request body of `POST /restaurant_pizzas`.
#[derive(ToSchema)]
pub struct CreateRestaurantPizza {
    /// Between 1 and 30 inclusive.
    pub price: f64,
    pub restaurant_id: i64,
    pub pizza_id: i64,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        entity::list_restaurants,
        entity::read_restaurant,
        entity::delete_restaurant,
        entity::list_pizzas,
        entity::create_restaurant_pizza,
    ),
    components(schemas(Restaurant, Pizza, RestaurantPizza, CreateRestaurantPizza, ErrorBody, ErrorsBody)),
    tags(
        (name = "restaurants", description = "Restaurants and their menus"),
        (name = "pizzas", description = "Pizza catalogue"),
        (name = "restaurant_pizzas", description = "Priced pizza offerings of a restaurant"),
    )
)]
pub struct ApiDoc;
