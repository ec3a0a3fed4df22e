//! Request payload validation.

use crate::error::ValidationError;
use crate::models::NewRestaurantPizza;
use serde_json::{Map, Value};

pub struct RequestValidator;

impl RequestValidator {
    /// Validate a create payload `{price, restaurant_id, pizza_id}`. Unknown keys are ignored.
    pub fn restaurant_pizza(body: &Value) -> Result<NewRestaurantPizza, ValidationError> {
        let obj = body.as_object().ok_or(ValidationError::NotAnObject)?;
        let price = required(obj, "price")?
            .as_f64()
            .ok_or(ValidationError::InvalidField {
                field: "price",
                reason: "must be a number",
            })?;
        let restaurant_id = integer(obj, "restaurant_id")?;
        let pizza_id = integer(obj, "pizza_id")?;
        NewRestaurantPizza::new(price, restaurant_id, pizza_id)
    }
}

fn required<'a>(obj: &'a Map<String, Value>, field: &'static str) -> Result<&'a Value, ValidationError> {
    match obj.get(field) {
        None | Some(Value::Null) => Err(ValidationError::MissingField(field)),
        Some(v) => Ok(v),
    }
}

fn integer(obj: &Map<String, Value>, field: &'static str) -> Result<i64, ValidationError> {
    required(obj, field)?
        .as_i64()
        .ok_or(ValidationError::InvalidField {
            field,
            reason: "must be an integer",
        })
}
