//! Remove Cart Line By Product Handler

use std::sync::Arc;

use salvo::{oapi::extract::JsonBody, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{cart::errors::into_status_error, extensions::*, state::State};

/// Remove By Product Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct RemoveByProductRequest {
    /// The product whose line should be removed
    pub product_uuid: Uuid,
}

/// Remove Cart Line By Product Handler
///
/// Body-addressed variant of line removal kept for older storefront
/// clients that track products rather than line ids. Idempotent.
#[endpoint(
    tags("cart"),
    summary = "Remove Cart Line by Product",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Line removed (or already absent)"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<RemoveByProductRequest>,
    depot: &mut Depot,
) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    state
        .app
        .carts
        .remove_item(user, json.into_inner().product_uuid.into())
        .await
        .map_err(into_status_error)?;

    Ok(StatusCode::OK)
}

#[cfg(test)]
mod tests {
    use salvo::test::TestClient;
    use testresult::TestResult;

    use cradle_app::domain::carts::{MockCartsService, models::LineSelector};

    use crate::test_helpers::{TEST_USER_UUID, carts_service};

    use super::*;

    fn make_service(carts: MockCartsService) -> Service {
        carts_service(carts, Router::with_path("cart").patch(handler))
    }

    #[tokio::test]
    async fn test_remove_by_product_returns_200() -> TestResult {
        let product = Uuid::now_v7();

        let mut carts = MockCartsService::new();

        carts
            .expect_remove_item()
            .once()
            .withf(move |user, selector| {
                *user == TEST_USER_UUID && *selector == LineSelector(product)
            })
            .return_once(|_, _| Ok(()));

        let res = TestClient::patch("http://example.com/cart")
            .json(&RemoveByProductRequest {
                product_uuid: product,
            })
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }
}
