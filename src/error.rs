//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Message listed in every 400 body. Clients are not told which field failed.
pub const VALIDATION_ERRORS: &str = "validation errors";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("price {price} is outside 1..=30")]
    PriceOutOfRange { price: f64 },
    #[error("price must be a finite number")]
    PriceNotFinite,
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("{field} {reason}")]
    InvalidField { field: &'static str, reason: &'static str },
    #[error("body must be a JSON object")]
    NotAnObject,
    #[error("malformed body: {0}")]
    MalformedBody(String),
}

#[derive(Error, Debug)]
pub enum StoreError {
    /// Foreign-key or check constraint rejected the write.
    #[error("integrity: {0}")]
    Integrity(String),
    #[error("database: {0}")]
    Database(#[from] sqlx::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Sort a sqlx failure into integrity violations and everything else.
    pub fn from_write(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            if db.is_foreign_key_violation() || db.is_check_violation() {
                return StoreError::Integrity(db.message().to_string());
            }
        }
        StoreError::Database(err)
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("validation: {0}")]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Body of a 404 or 500.
#[derive(Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

/// Body of a 400.
#[derive(Serialize, ToSchema)]
pub struct ErrorsBody {
    pub errors: Vec<String>,
}

impl ErrorsBody {
    pub fn validation() -> Self {
        ErrorsBody {
            errors: vec![VALIDATION_ERRORS.to_string()],
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound(kind) => (
                StatusCode::NOT_FOUND,
                Json(ErrorBody {
                    error: format!("{} not found", kind),
                }),
            )
                .into_response(),
            AppError::Validation(e) => {
                tracing::warn!(error = %e, "rejected invalid request");
                (StatusCode::BAD_REQUEST, Json(ErrorsBody::validation())).into_response()
            }
            AppError::Store(StoreError::Integrity(msg)) => {
                tracing::warn!(error = %msg, "rejected write violating integrity");
                (StatusCode::BAD_REQUEST, Json(ErrorsBody::validation())).into_response()
            }
            AppError::Store(e) => {
                tracing::error!(error = %e, "store failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorBody {
                        error: "internal server error".into(),
                    }),
                )
                    .into_response()
            }
        }
    }
}
