//! Checkout Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{oapi::extract::JsonBody, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cradle_app::domain::orders::models::{
    CheckoutRequest, Order, OrderItem, PaymentMethod, ShippingAddress,
};

use crate::{checkout::errors::into_status_error, extensions::*, state::State};

const IDEMPOTENCY_KEY_HEADER: &str = "idempotency-key";

/// Shipping Address Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ShippingAddressRequest {
    pub recipient: String,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub country: String,
    pub phone: Option<String>,
}

impl From<ShippingAddressRequest> for ShippingAddress {
    fn from(request: ShippingAddressRequest) -> Self {
        Self {
            recipient: request.recipient,
            line1: request.line1,
            line2: request.line2,
            city: request.city,
            country: request.country,
            phone: request.phone,
        }
    }
}

/// Payment Method Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub(crate) enum PaymentMethodRequest {
    Card { reference: String },
    MobileMoney { phone: String },
    CashOnDelivery,
}

impl From<PaymentMethodRequest> for PaymentMethod {
    fn from(request: PaymentMethodRequest) -> Self {
        match request {
            PaymentMethodRequest::Card { reference } => Self::Card { reference },
            PaymentMethodRequest::MobileMoney { phone } => Self::MobileMoney { phone },
            PaymentMethodRequest::CashOnDelivery => Self::CashOnDelivery,
        }
    }
}

/// Checkout Request Body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CheckoutRequestBody {
    /// Where to ship the order
    pub shipping_address: ShippingAddressRequest,

    /// How the order will be paid
    pub payment_method: PaymentMethodRequest,

    /// Promo code to apply; re-validated against the locked price
    pub promo_code: Option<String>,
}

/// Order Item Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderItemResponse {
    pub product_uuid: Uuid,
    pub name: String,

    /// The price captured at checkout, not the live catalog price
    pub unit_price: u64,
    pub quantity: u32,
}

impl From<OrderItem> for OrderItemResponse {
    fn from(item: OrderItem) -> Self {
        Self {
            product_uuid: item.product_uuid.into_uuid(),
            name: item.name,
            unit_price: item.unit_price,
            quantity: item.quantity,
        }
    }
}

/// Order Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderResponse {
    pub order_uuid: Uuid,
    pub items: Vec<OrderItemResponse>,
    pub subtotal: u64,
    pub discount: u64,
    pub total: u64,
    pub promo_code: Option<String>,
    pub status: String,
    pub created_at: String,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            order_uuid: order.uuid.into_uuid(),
            items: order.items.into_iter().map(OrderItemResponse::from).collect(),
            subtotal: order.subtotal,
            discount: order.discount,
            total: order.total,
            promo_code: order.promo_code,
            status: order.status.as_str().to_string(),
            created_at: order.created_at.to_string(),
        }
    }
}

/// Checkout Handler
///
/// Converts the authenticated user's cart into an order: locks prices,
/// reserves stock, snapshots the items, and clears the cart. Replaying a
/// request with the same `Idempotency-Key` header returns the order the
/// first attempt created instead of placing a second one.
#[endpoint(
    tags("checkout"),
    summary = "Checkout",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Order placed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CheckoutRequestBody>,
    req: &mut Request,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;
    let idempotency_key = extract_idempotency_key(req)?;

    let body = json.into_inner();

    let request = CheckoutRequest {
        shipping: body.shipping_address.into(),
        payment: body.payment_method.into(),
        promo_code: body.promo_code,
        idempotency_key,
    };

    let order = state
        .app
        .checkout
        .checkout(user, request, Timestamp::now())
        .await
        .map_err(into_status_error)?;

    Ok(Json(order.into()))
}

fn extract_idempotency_key(req: &Request) -> Result<Option<Uuid>, StatusError> {
    let Some(value) = req.headers().get(IDEMPOTENCY_KEY_HEADER) else {
        return Ok(None);
    };

    value
        .to_str()
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .map(Some)
        .ok_or_else(|| StatusError::bad_request().brief("Idempotency-Key must be a UUID"))
}
