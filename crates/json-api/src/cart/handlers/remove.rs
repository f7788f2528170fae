//! Remove Cart Line Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{cart::errors::into_status_error, extensions::*, state::State};

/// Remove Cart Line Handler
///
/// Removes one cart line, addressed by line UUID or product UUID. Removing
/// a line that is not in the cart succeeds; the operation is idempotent.
#[endpoint(
    tags("cart"),
    summary = "Remove Cart Line",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Line removed (or already absent)"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    line: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    state
        .app
        .carts
        .remove_item(user, line.into_inner().into())
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
        carts_service(carts, Router::with_path("cart/{line}").delete(handler))
    }

    #[tokio::test]
    async fn test_remove_returns_200() -> TestResult {
        let line = Uuid::now_v7();

        let mut carts = MockCartsService::new();

        carts
            .expect_remove_item()
            .once()
            .withf(move |user, selector| {
                *user == TEST_USER_UUID && *selector == LineSelector(line)
            })
            .return_once(|_, _| Ok(()));

        let res = TestClient::delete(format!("http://example.com/cart/{line}"))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_remove_absent_line_still_returns_200() -> TestResult {
        let mut carts = MockCartsService::new();

        // The service treats removing an absent line as a successful no-op.
        carts.expect_remove_item().once().return_once(|_, _| Ok(()));

        let res = TestClient::delete(format!("http://example.com/cart/{}", Uuid::now_v7()))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }
}
