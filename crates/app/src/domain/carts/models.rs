//! Cart Models

use jiff::Timestamp;
use uuid::Uuid;

use crate::{auth::UserUuid, domain::products::models::ProductUuid, uuids::TypedUuid};

/// Cart UUID
pub type CartUuid = TypedUuid<CartRecord>;

/// Cart Line UUID
pub type CartLineUuid = TypedUuid<CartLine>;

/// The stored cart row; one per user.
#[derive(Debug, Clone)]
pub struct CartRecord {
    pub uuid: CartUuid,
    pub user_uuid: UserUuid,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A cart as returned to callers: lines joined with the live product
/// snapshot at read time.
#[derive(Debug, Clone)]
pub struct Cart {
    pub user_uuid: UserUuid,
    pub lines: Vec<CartLine>,
    pub subtotal: u64,
    pub updated_at: Option<Timestamp>,
}

impl Cart {
    /// An empty cart for a user with no stored cart document.
    #[must_use]
    pub fn empty(user_uuid: UserUuid) -> Self {
        Self {
            user_uuid,
            lines: Vec::new(),
            subtotal: 0,
            updated_at: None,
        }
    }
}

/// One cart entry, expanded with the product's current name and price.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub uuid: CartLineUuid,
    pub product_uuid: ProductUuid,
    pub name: String,
    pub unit_price: u64,
    pub quantity: u32,
}

impl CartLine {
    /// `unit_price × quantity` for this line.
    #[must_use]
    pub fn line_total(&self) -> u64 {
        self.unit_price.saturating_mul(u64::from(self.quantity))
    }
}

/// Compute a cart subtotal from joined lines.
#[must_use]
pub fn subtotal(lines: &[CartLine]) -> u64 {
    lines.iter().fold(0, |acc, line| acc.saturating_add(line.line_total()))
}

/// A line addressed by either its generated line UUID or its product UUID.
///
/// Older storefront clients address cart entries by product; newer ones by
/// line. Both resolve to the same row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSelector(pub Uuid);

impl From<Uuid> for LineSelector {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}
