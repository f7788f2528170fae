//! Errors

use salvo::http::StatusError;
use tracing::error;

use cradle_app::domain::orders::CheckoutServiceError;

pub(crate) fn into_status_error(error: CheckoutServiceError) -> StatusError {
    match error {
        CheckoutServiceError::Validation { field } => {
            StatusError::bad_request().brief(format!("Missing required field: {field}"))
        }
        CheckoutServiceError::EmptyCart => StatusError::bad_request().brief("Cart is empty"),
        CheckoutServiceError::PromoNotFound => {
            StatusError::bad_request().brief("Unknown promo code")
        }
        CheckoutServiceError::PromoExpired => {
            StatusError::bad_request().brief("Promo code has expired")
        }
        CheckoutServiceError::PromoBelowMinimum { minimum } => StatusError::bad_request()
            .brief(format!("Cart subtotal is below the promo minimum of {minimum}")),
        CheckoutServiceError::InsufficientStock { product } => {
            StatusError::bad_request().brief(format!("Insufficient stock for product {product}"))
        }
        CheckoutServiceError::InvalidReference
        | CheckoutServiceError::MissingRequiredData
        | CheckoutServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid checkout payload")
        }
        CheckoutServiceError::State(source) => {
            error!("checkout state machine error: {source}");

            StatusError::internal_server_error()
        }
        CheckoutServiceError::Sql(source) => {
            error!("checkout storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
