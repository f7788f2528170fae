//! Errors

use salvo::http::StatusError;
use tracing::error;

use cradle_app::domain::promos::PromosServiceError;

pub(crate) fn into_status_error(error: PromosServiceError) -> StatusError {
    match error {
        PromosServiceError::NotFound => StatusError::not_found().brief("Promo code not found"),
        PromosServiceError::CartNotFound => StatusError::not_found().brief("Cart is empty"),
        PromosServiceError::Expired => StatusError::bad_request().brief("Promo code has expired"),
        PromosServiceError::BelowMinimum { minimum } => StatusError::bad_request()
            .brief(format!("Cart subtotal is below the promo minimum of {minimum}")),
        PromosServiceError::AlreadyExists => {
            StatusError::conflict().brief("Promo code already exists")
        }
        PromosServiceError::InvalidReference
        | PromosServiceError::MissingRequiredData
        | PromosServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid promo payload")
        }
        PromosServiceError::Sql(source) => {
            error!("promo storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
