//! Add Cart Item Handler

use std::sync::Arc;

use salvo::{oapi::extract::JsonBody, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cradle_app::domain::products::models::ProductUuid;

use crate::{
    cart::{errors::into_status_error, handlers::get::CartLineResponse},
    extensions::*,
    state::State,
};

/// Add Item Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AddItemRequest {
    /// The product to add
    pub product_uuid: Uuid,

    /// How many units to add; merged into an existing line for the same
    /// product
    pub quantity: u32,
}

/// Add Item Handler
///
/// Adds a quantity of a product to the authenticated user's cart. Adding a
/// product already in the cart increments that line's quantity.
#[endpoint(
    tags("cart"),
    summary = "Add Item to Cart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Item added"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<AddItemRequest>,
    depot: &mut Depot,
) -> Result<Json<CartLineResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    let request = json.into_inner();

    let line = state
        .app
        .carts
        .add_item(
            user,
            ProductUuid::from_uuid(request.product_uuid),
            request.quantity,
        )
        .await
        .map_err(into_status_error)?;

    Ok(Json(line.into()))
}
