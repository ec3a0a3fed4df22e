//! Entity rows and the validated constructor for new restaurant/pizza pairings.

use crate::error::ValidationError;
use serde::{Serialize, Serializer};
use utoipa::ToSchema;

/// Inclusive price bounds for a restaurant's pizza.
pub const MIN_PRICE: f64 = 1.0;
pub const MAX_PRICE: f64 = 30.0;

#[derive(Clone, Debug, PartialEq, Serialize, sqlx::FromRow, ToSchema)]
pub struct Restaurant {
    pub id: i64,
    pub name: String,
    pub address: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, sqlx::FromRow, ToSchema)]
pub struct Pizza {
    pub id: i64,
    pub name: String,
    pub ingredients: String,
}

/// Join row between a restaurant and a pizza, carrying the price.
#[derive(Clone, Debug, PartialEq, Serialize, sqlx::FromRow, ToSchema)]
pub struct RestaurantPizza {
    pub id: i64,
    #[sqlx(try_from = "f64")]
    #[schema(value_type = f64)]
    pub price: Price,
    pub restaurant_id: i64,
    pub pizza_id: i64,
}

/// A price already checked against [`MIN_PRICE`]..=[`MAX_PRICE`].
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct Price(f64);

impl Price {
    pub fn new(value: f64) -> Result<Self, ValidationError> {
        if !value.is_finite() {
            return Err(ValidationError::PriceNotFinite);
        }
        if !(MIN_PRICE..=MAX_PRICE).contains(&value) {
            return Err(ValidationError::PriceOutOfRange { price: value });
        }
        Ok(Price(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Price {
    type Error = ValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Price::new(value)
    }
}

/// Whole prices go out as integers so `5` comes back as `5`, not `5.0`.
impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0.fract() == 0.0 {
            serializer.serialize_i64(self.0 as i64)
        } else {
            serializer.serialize_f64(self.0)
        }
    }
}

/// A restaurant/pizza pairing that passed validation and may be persisted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NewRestaurantPizza {
    pub price: Price,
    pub restaurant_id: i64,
    pub pizza_id: i64,
}

impl NewRestaurantPizza {
    pub fn new(price: f64, restaurant_id: i64, pizza_id: i64) -> Result<Self, ValidationError> {
        Ok(NewRestaurantPizza {
            price: Price::new(price)?,
            restaurant_id,
            pizza_id,
        })
    }
}
