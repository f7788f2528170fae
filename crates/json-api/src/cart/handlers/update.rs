//! Update Cart Line Handler

use std::sync::Arc;

use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    cart::{errors::into_status_error, handlers::get::CartLineResponse},
    extensions::*,
    state::State,
};

/// Update Line Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateLineRequest {
    /// The new quantity for the line; must be at least 1
    pub quantity: u32,
}

/// Update Cart Line Handler
///
/// Sets the quantity of one cart line. The path segment accepts either the
/// line UUID or the product UUID; both address the same line.
#[endpoint(
    tags("cart"),
    summary = "Update Cart Line",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Line updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Line not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    line: PathParam<Uuid>,
    json: JsonBody<UpdateLineRequest>,
    depot: &mut Depot,
) -> Result<Json<CartLineResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    let updated = state
        .app
        .carts
        .update_item(user, line.into_inner().into(), json.into_inner().quantity)
        .await
        .map_err(into_status_error)?;

    Ok(Json(updated.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use cradle_app::domain::carts::{
        CartsServiceError, MockCartsService,
        models::{CartLine, CartLineUuid, LineSelector},
    };
    use cradle_app::domain::products::models::ProductUuid;

    use crate::test_helpers::{TEST_USER_UUID, carts_service};

    use super::*;

    fn make_service(carts: MockCartsService) -> Service {
        carts_service(carts, Router::with_path("cart/{line}").put(handler))
    }

    #[tokio::test]
    async fn test_update_sets_quantity() -> TestResult {
        let line_uuid = CartLineUuid::new();

        let line = CartLine {
            uuid: line_uuid,
            product_uuid: ProductUuid::new(),
            name: "Sleep Sack".to_string(),
            unit_price: 30_00,
            quantity: 5,
        };

        let mut carts = MockCartsService::new();

        carts
            .expect_update_item()
            .once()
            .withf(move |user, selector, quantity| {
                *user == TEST_USER_UUID
                    && *selector == LineSelector(line_uuid.into_uuid())
                    && *quantity == 5
            })
            .return_once(move |_, _, _| Ok(line));

        let mut res = TestClient::put(format!("http://example.com/cart/{line_uuid}"))
            .json(&UpdateLineRequest { quantity: 5 })
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: CartLineResponse = res.take_json().await?;

        assert_eq!(body.quantity, 5);
        assert_eq!(body.line_total, 150_00);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_missing_line_returns_404() -> TestResult {
        let mut carts = MockCartsService::new();

        carts
            .expect_update_item()
            .once()
            .return_once(|_, _, _| Err(CartsServiceError::NotFound));

        let res = TestClient::put(format!("http://example.com/cart/{}", Uuid::now_v7()))
            .json(&UpdateLineRequest { quantity: 2 })
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }

    #[tokio::test]
    async fn test_update_insufficient_stock_returns_400() -> TestResult {
        let mut carts = MockCartsService::new();

        carts
            .expect_update_item()
            .once()
            .return_once(|_, _, _| Err(CartsServiceError::InsufficientStock { available: 4 }));

        let res = TestClient::put(format!("http://example.com/cart/{}", Uuid::now_v7()))
            .json(&UpdateLineRequest { quantity: 9 })
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
