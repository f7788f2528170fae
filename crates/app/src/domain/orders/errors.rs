//! Checkout service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::orders::state::IllegalTransition;

#[derive(Debug, Error)]
pub enum CheckoutServiceError {
    #[error("missing required field: {field}")]
    Validation { field: &'static str },

    #[error("cart is empty")]
    EmptyCart,

    #[error("promo not found")]
    PromoNotFound,

    #[error("promo has expired")]
    PromoExpired,

    #[error("cart subtotal is below the promo minimum of {minimum}")]
    PromoBelowMinimum { minimum: u64 },

    #[error("insufficient stock for product {product}")]
    InsufficientStock { product: Uuid },

    #[error(transparent)]
    State(#[from] IllegalTransition),

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for CheckoutServiceError {
    fn from(error: Error) -> Self {
        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            _ => Self::Sql(error),
        }
    }
}
