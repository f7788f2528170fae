//! Apply Promo Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{oapi::extract::JsonBody, prelude::*};
use serde::{Deserialize, Serialize};

use cradle_app::domain::promos::models::PromoEvaluation;

use crate::{extensions::*, promos::errors::into_status_error, state::State};

/// Apply Promo Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ApplyPromoRequest {
    /// The promo code; matched case-insensitively after trimming
    pub code: String,
}

/// Promo Evaluation Response
///
/// Nothing is persisted by evaluation; the client re-submits the code at
/// checkout, where it is validated again against the locked price.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PromoEvaluationResponse {
    /// The normalized promo code
    pub code: String,

    /// The discount kind: `percentage_off` or `amount_off`
    pub discount_kind: String,

    /// The percentage (0-100) or fixed amount, per kind
    pub discount_value: u64,

    /// The cart subtotal the discount was computed against
    pub subtotal: u64,

    /// The discount amount in minor currency units; never exceeds subtotal
    pub discount: u64,

    /// `subtotal - discount`
    pub total: u64,
}

impl From<PromoEvaluation> for PromoEvaluationResponse {
    fn from(evaluation: PromoEvaluation) -> Self {
        Self {
            code: evaluation.promo.code,
            discount_kind: evaluation.promo.discount.kind_as_str().to_string(),
            discount_value: evaluation.promo.discount.value(),
            subtotal: evaluation.subtotal,
            discount: evaluation.discount,
            total: evaluation.subtotal.saturating_sub(evaluation.discount),
        }
    }
}

/// Apply Promo Handler
///
/// Evaluates a promo code against the authenticated user's current cart.
#[endpoint(
    tags("promos"),
    summary = "Apply Promo Code",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Promo evaluated"),
        (status_code = StatusCode::NOT_FOUND, description = "Promo or cart not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Expired or below minimum"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<ApplyPromoRequest>,
    depot: &mut Depot,
) -> Result<Json<PromoEvaluationResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    let evaluation = state
        .app
        .promos
        .evaluate(user, &json.into_inner().code, Timestamp::now())
        .await
        .map_err(into_status_error)?;

    Ok(Json(evaluation.into()))
}
