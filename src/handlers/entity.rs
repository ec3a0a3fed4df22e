//! Entity handlers: restaurant list/read/delete, pizza list, restaurant_pizza create.

use crate::error::{AppError, ErrorBody, ErrorsBody, ValidationError};
use crate::models::{Pizza, Restaurant, RestaurantPizza};
use crate::openapi::CreateRestaurantPizza;
use crate::response;
use crate::service::PizzeriaService;
use crate::state::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    response::IntoResponse,
    Json,
};
use serde_json::Value;
use tracing::instrument;

#[utoipa::path(
    get,
    path = "/restaurants",
    responses((status = 200, description = "All restaurants, without nested rows", body = [Restaurant])),
    tag = "restaurants"
)]
#[instrument(skip(state))]
pub async fn list_restaurants(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let data = PizzeriaService::list_restaurants(state.store.as_ref()).await?;
    Ok(response::ok(data))
}

/// An id that is not an i64 names no restaurant.
fn restaurant_id(id: Result<Path<i64>, PathRejection>) -> Result<i64, AppError> {
    let Path(id) = id.map_err(|rejection| {
        tracing::debug!(error = %rejection.body_text(), "unparseable restaurant id");
        AppError::NotFound("Restaurant")
    })?;
    Ok(id)
}

#[utoipa::path(
    get,
    path = "/restaurants/{id}",
    params(("id" = i64, Path, description = "Restaurant id")),
    responses(
        (status = 200, description = "Restaurant with restaurant_pizzas, each with its pizza", body = Restaurant),
        (status = 404, description = "Restaurant not found", body = ErrorBody),
    ),
    tag = "restaurants"
)]
#[instrument(skip(state))]
pub async fn read_restaurant(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = restaurant_id(id)?;
    let data = PizzeriaService::restaurant_detail(state.store.as_ref(), id).await?;
    Ok(response::ok(data))
}

#[utoipa::path(
    delete,
    path = "/restaurants/{id}",
    params(("id" = i64, Path, description = "Restaurant id")),
    responses(
        (status = 204, description = "Restaurant and its restaurant_pizzas deleted"),
        (status = 404, description = "Restaurant not found", body = ErrorBody),
    ),
    tag = "restaurants"
)]
#[instrument(skip(state))]
pub async fn delete_restaurant(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = restaurant_id(id)?;
    PizzeriaService::delete_restaurant(state.store.as_ref(), id).await?;
    Ok(response::no_content())
}

#[utoipa::path(
    get,
    path = "/pizzas",
    responses((status = 200, description = "All pizzas", body = [Pizza])),
    tag = "pizzas"
)]
#[instrument(skip(state))]
pub async fn list_pizzas(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let data = PizzeriaService::list_pizzas(state.store.as_ref()).await?;
    Ok(response::ok(data))
}

#[utoipa::path(
    post,
    path = "/restaurant_pizzas",
    request_body = CreateRestaurantPizza,
    responses(
        (status = 201, description = "Created, with restaurant and pizza nested", body = RestaurantPizza),
        (status = 400, description = "Invalid price, unknown restaurant or pizza, or malformed body", body = ErrorsBody),
    ),
    tag = "restaurant_pizzas"
)]
#[instrument(skip(state, payload))]
pub async fn create_restaurant_pizza(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(body) = payload.map_err(|rejection| ValidationError::MalformedBody(rejection.body_text()))?;
    let data = PizzeriaService::create_restaurant_pizza(state.store.as_ref(), &body).await?;
    Ok(response::created(data))
}
