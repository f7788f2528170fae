//! Promo Models

use jiff::Timestamp;

use crate::{domain::promos::discount::Discount, uuids::TypedUuid};

/// Promo UUID
pub type PromoUuid = TypedUuid<Promo>;

/// Promo Model
///
/// Immutable reference data from this core's point of view; lifecycle is
/// owned by the external admin surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Promo {
    pub uuid: PromoUuid,
    /// Uppercase-normalized, unique code.
    pub code: String,
    pub discount: Discount,
    pub expires_at: Timestamp,
    pub min_cart_value: Option<u64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Promo {
    /// Whether the promo's validity window has closed at `at`.
    #[must_use]
    pub fn expired_at(&self, at: Timestamp) -> bool {
        at >= self.expires_at
    }

    /// The unmet minimum-spend threshold, if any, for a given subtotal.
    #[must_use]
    pub fn unmet_minimum(&self, subtotal: u64) -> Option<u64> {
        self.min_cart_value
            .filter(|minimum| subtotal < *minimum)
    }
}

/// New Promo Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPromo {
    pub uuid: PromoUuid,
    pub code: String,
    pub discount: Discount,
    pub expires_at: Timestamp,
    pub min_cart_value: Option<u64>,
}

/// The outcome of evaluating a promo code against a cart.
///
/// Nothing is persisted; totals are re-derived at checkout time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromoEvaluation {
    pub promo: Promo,
    pub subtotal: u64,
    pub discount: u64,
}

/// Normalize a client-supplied promo code for lookup.
#[must_use]
pub fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}
