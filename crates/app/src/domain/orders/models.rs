//! Order Models

use jiff::Timestamp;
use uuid::Uuid;

use crate::{auth::UserUuid, domain::products::models::ProductUuid, uuids::TypedUuid};

/// Order UUID
pub type OrderUuid = TypedUuid<Order>;

/// Order Model
///
/// A snapshot of the cart at checkout time: item prices are captured, not
/// joined live, so later catalog changes cannot alter a placed order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub uuid: OrderUuid,
    pub user_uuid: UserUuid,
    pub items: Vec<OrderItem>,
    pub subtotal: u64,
    pub discount: u64,
    pub total: u64,
    pub promo_code: Option<String>,
    pub shipping: ShippingAddress,
    pub payment: PaymentMethod,
    pub status: OrderStatus,
    pub idempotency_key: Option<Uuid>,
    pub created_at: Timestamp,
}

/// One snapshotted order line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItem {
    pub product_uuid: ProductUuid,
    pub name: String,
    pub unit_price: u64,
    pub quantity: u32,
}

/// Order Status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    Paid,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Storage tag for the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    /// Rebuild a status from its storage tag.
    #[must_use]
    pub fn from_str_tag(tag: &str) -> Option<Self> {
        match tag {
            "pending" => Some(Self::Pending),
            "paid" => Some(Self::Paid),
            "shipped" => Some(Self::Shipped),
            "delivered" => Some(Self::Delivered),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

/// Shipping Address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShippingAddress {
    pub recipient: String,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub country: String,
    pub phone: Option<String>,
}

/// Payment Method
///
/// Capture itself is delegated to the external gateways; only the reference
/// needed to hand off is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentMethod {
    Card { reference: String },
    MobileMoney { phone: String },
    CashOnDelivery,
}

impl PaymentMethod {
    /// Storage tag for the payment kind.
    #[must_use]
    pub const fn kind_as_str(&self) -> &'static str {
        match self {
            Self::Card { .. } => "card",
            Self::MobileMoney { .. } => "mobile_money",
            Self::CashOnDelivery => "cash_on_delivery",
        }
    }

    /// The gateway reference column, when the kind carries one.
    #[must_use]
    pub fn reference(&self) -> Option<&str> {
        match self {
            Self::Card { reference } => Some(reference),
            Self::MobileMoney { phone } => Some(phone),
            Self::CashOnDelivery => None,
        }
    }

    /// Rebuild a payment method from storage columns.
    #[must_use]
    pub fn from_parts(kind: &str, reference: Option<String>) -> Option<Self> {
        match (kind, reference) {
            ("card", Some(reference)) => Some(Self::Card { reference }),
            ("mobile_money", Some(phone)) => Some(Self::MobileMoney { phone }),
            ("cash_on_delivery", None) => Some(Self::CashOnDelivery),
            _ => None,
        }
    }
}

/// Checkout Request Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRequest {
    pub shipping: ShippingAddress,
    pub payment: PaymentMethod,
    /// Re-submitted promo code; re-validated against the price-locked
    /// subtotal, never trusted from an earlier evaluation.
    pub promo_code: Option<String>,
    pub idempotency_key: Option<Uuid>,
}
