//! Get Cart Handler

use std::{string::ToString, sync::Arc};

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cradle_app::domain::carts::models::{Cart, CartLine};

use crate::{cart::errors::into_status_error, extensions::*, state::State};

/// Cart Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartResponse {
    /// The owning user
    pub user_uuid: Uuid,

    /// The lines in the cart, joined with live product details
    pub lines: Vec<CartLineResponse>,

    /// Sum of line totals, in minor currency units
    pub subtotal: u64,

    /// When the cart was last changed; absent for a never-stored cart
    pub updated_at: Option<String>,
}

impl From<Cart> for CartResponse {
    fn from(cart: Cart) -> Self {
        Self {
            user_uuid: cart.user_uuid.into_uuid(),
            lines: cart.lines.into_iter().map(CartLineResponse::from).collect(),
            subtotal: cart.subtotal,
            updated_at: cart.updated_at.as_ref().map(ToString::to_string),
        }
    }
}

/// Cart Line Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartLineResponse {
    /// The unique identifier of the cart line
    pub uuid: Uuid,

    /// The product in this line
    pub product_uuid: Uuid,

    /// The product's current display name
    pub name: String,

    /// The product's current price in minor currency units
    pub unit_price: u64,

    /// How many units of the product are in the cart
    pub quantity: u32,

    /// `unit_price × quantity`
    pub line_total: u64,
}

impl From<CartLine> for CartLineResponse {
    fn from(line: CartLine) -> Self {
        Self {
            line_total: line.line_total(),
            uuid: line.uuid.into_uuid(),
            product_uuid: line.product_uuid.into_uuid(),
            name: line.name,
            unit_price: line.unit_price,
            quantity: line.quantity,
        }
    }
}

/// Get Cart Handler
///
/// Returns the authenticated user's cart. A user with no stored cart gets
/// an empty cart, not a 404.
#[endpoint(
    tags("cart"),
    summary = "Get Cart",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    let cart = state
        .app
        .carts
        .get_cart(user)
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use cradle_app::domain::carts::{CartsServiceError, MockCartsService};

    use crate::test_helpers::{TEST_USER_UUID, carts_service, make_cart};

    use super::*;

    fn make_service(carts: MockCartsService) -> Service {
        carts_service(carts, Router::with_path("cart").get(handler))
    }

    #[tokio::test]
    async fn test_get_returns_cart_with_subtotal() -> TestResult {
        let mut carts = MockCartsService::new();
        let cart = make_cart();
        let subtotal = cart.subtotal;

        carts
            .expect_get_cart()
            .once()
            .withf(|user| *user == TEST_USER_UUID)
            .return_once(move |_| Ok(cart));

        let mut res = TestClient::get("http://example.com/cart")
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: CartResponse = res.take_json().await?;

        assert_eq!(body.user_uuid, TEST_USER_UUID.into_uuid());
        assert_eq!(body.subtotal, subtotal);
        assert_eq!(body.lines.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_get_absent_cart_returns_empty_cart() -> TestResult {
        let mut carts = MockCartsService::new();

        carts
            .expect_get_cart()
            .once()
            .return_once(|user| Ok(Cart::empty(user)));

        let mut res = TestClient::get("http://example.com/cart")
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: CartResponse = res.take_json().await?;

        assert!(body.lines.is_empty());
        assert_eq!(body.subtotal, 0);
        assert_eq!(body.updated_at, None);

        Ok(())
    }

    #[tokio::test]
    async fn test_get_storage_error_returns_500() -> TestResult {
        let mut carts = MockCartsService::new();

        carts
            .expect_get_cart()
            .once()
            .return_once(|_| Err(CartsServiceError::Sql(sqlx::Error::PoolClosed)));

        let res = TestClient::get("http://example.com/cart")
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::INTERNAL_SERVER_ERROR));

        Ok(())
    }
}
