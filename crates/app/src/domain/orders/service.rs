//! Checkout service.
//!
//! Orchestrates one checkout attempt: lock prices, reserve stock, snapshot
//! the order, clear the cart. Everything happens inside a single
//! transaction, so an aborted reservation rolls back every decrement made
//! for earlier lines.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use sqlx::error::{DatabaseError, ErrorKind};
use tracing::{Span, info};

use crate::{
    auth::UserUuid,
    database::Db,
    domain::{
        carts::{PgCartLinesRepository, PgCartsRepository, models::subtotal},
        orders::{
            errors::CheckoutServiceError,
            models::{CheckoutRequest, Order, OrderItem, OrderStatus, OrderUuid, PaymentMethod},
            repository::PgOrdersRepository,
            state::{CheckoutProgress, CheckoutState},
        },
        products::PgProductsRepository,
        promos::{PgPromosRepository, models::normalize_code},
    },
};

#[derive(Debug, Clone)]
pub struct PgCheckoutService {
    db: Db,
    carts: PgCartsRepository,
    lines: PgCartLinesRepository,
    products: PgProductsRepository,
    promos: PgPromosRepository,
    orders: PgOrdersRepository,
}

impl PgCheckoutService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            carts: PgCartsRepository::new(),
            lines: PgCartLinesRepository::new(),
            products: PgProductsRepository::new(),
            promos: PgPromosRepository::new(),
            orders: PgOrdersRepository::new(),
        }
    }

    /// A concurrent attempt with the same idempotency key won the insert
    /// race; fetch and return its order instead of failing.
    async fn replay_existing(
        &self,
        user: UserUuid,
        request: &CheckoutRequest,
    ) -> Result<Option<Order>, CheckoutServiceError> {
        let Some(key) = request.idempotency_key else {
            return Ok(None);
        };

        let mut tx = self.db.begin().await?;

        let existing = self.orders.find_by_idempotency_key(&mut tx, user, key).await?;

        tx.commit().await?;

        Ok(existing)
    }
}

#[async_trait]
impl CheckoutService for PgCheckoutService {
    #[tracing::instrument(
        name = "checkout.service.checkout",
        skip(self, request),
        fields(
            user_uuid = %user,
            order_uuid = tracing::field::Empty,
            state = tracing::field::Empty,
            replayed = tracing::field::Empty
        ),
        err
    )]
    async fn checkout(
        &self,
        user: UserUuid,
        request: CheckoutRequest,
        at: Timestamp,
    ) -> Result<Order, CheckoutServiceError> {
        let span = Span::current();
        let mut progress = CheckoutProgress::new();

        validate_request(&request)?;

        let mut tx = self.db.begin().await?;

        // Replays return the original order before anything is touched.
        if let Some(key) = request.idempotency_key {
            if let Some(existing) = self.orders.find_by_idempotency_key(&mut tx, user, key).await? {
                span.record("replayed", true);
                span.record("order_uuid", tracing::field::display(existing.uuid));

                tx.commit().await?;

                return Ok(existing);
            }
        }

        // Price lock: totals come from the live cart and catalog inside this
        // transaction, never from the client.
        let cart = self
            .carts
            .get_cart(&mut tx, user)
            .await?
            .ok_or(CheckoutServiceError::EmptyCart)?;

        let lines = self.lines.list_lines(&mut tx, cart.uuid).await?;

        if lines.is_empty() {
            return Err(CheckoutServiceError::EmptyCart);
        }

        let locked_subtotal = subtotal(&lines);

        let (promo_code, discount) = match &request.promo_code {
            Some(code) => {
                let code = normalize_code(code);

                let promo = self
                    .promos
                    .find_by_code(&mut tx, &code)
                    .await?
                    .ok_or(CheckoutServiceError::PromoNotFound)?;

                if promo.expired_at(at) {
                    return Err(CheckoutServiceError::PromoExpired);
                }

                if let Some(minimum) = promo.unmet_minimum(locked_subtotal) {
                    return Err(CheckoutServiceError::PromoBelowMinimum { minimum });
                }

                (Some(code), promo.discount.amount_for(locked_subtotal))
            }
            None => (None, 0),
        };

        progress.advance(CheckoutState::PriceLocked)?;
        span.record("state", progress.state().as_str());

        // Reserve stock line by line; a single failed conditional decrement
        // aborts the attempt and the rollback restores every earlier line.
        for line in &lines {
            let rows_affected = self
                .products
                .reserve_stock(&mut tx, line.product_uuid, line.quantity)
                .await?;

            if rows_affected == 0 {
                return Err(CheckoutServiceError::InsufficientStock {
                    product: line.product_uuid.into_uuid(),
                });
            }
        }

        progress.advance(CheckoutState::StockReserved)?;
        span.record("state", progress.state().as_str());

        let order = Order {
            uuid: OrderUuid::new(),
            user_uuid: user,
            items: lines
                .iter()
                .map(|line| OrderItem {
                    product_uuid: line.product_uuid,
                    name: line.name.clone(),
                    unit_price: line.unit_price,
                    quantity: line.quantity,
                })
                .collect(),
            subtotal: locked_subtotal,
            discount,
            total: locked_subtotal - discount,
            promo_code,
            shipping: request.shipping.clone(),
            payment: request.payment.clone(),
            status: OrderStatus::Pending,
            idempotency_key: request.idempotency_key,
            created_at: at,
        };

        if let Err(error) = self.orders.create_order(&mut tx, &order).await {
            // A concurrent request with the same idempotency key committed
            // first; drop our transaction (reversing the reservations) and
            // hand back the winner's order.
            let unique_violation = matches!(
                error.as_database_error().map(DatabaseError::kind),
                Some(ErrorKind::UniqueViolation)
            );

            if unique_violation {
                drop(tx);

                if let Some(existing) = self.replay_existing(user, &request).await? {
                    span.record("replayed", true);
                    span.record("order_uuid", tracing::field::display(existing.uuid));

                    return Ok(existing);
                }
            }

            return Err(error.into());
        }

        progress.advance(CheckoutState::OrderCreated)?;
        span.record("state", progress.state().as_str());

        self.carts.delete_cart(&mut tx, user).await?;

        progress.advance(CheckoutState::CartCleared)?;
        span.record("state", progress.state().as_str());

        // The commit makes the order write and the cart clear durable
        // together; the cart is never gone without its order.
        tx.commit().await?;

        progress.advance(CheckoutState::Completed)?;
        span.record("state", progress.state().as_str());
        span.record("order_uuid", tracing::field::display(order.uuid));

        info!(order_uuid = %order.uuid, total = order.total, "checkout completed");

        Ok(order)
    }
}

/// Shape validation for the checkout request; runs before any data access.
fn validate_request(request: &CheckoutRequest) -> Result<(), CheckoutServiceError> {
    let shipping = &request.shipping;

    for (field, value) in [
        ("shipping.recipient", &shipping.recipient),
        ("shipping.line1", &shipping.line1),
        ("shipping.city", &shipping.city),
        ("shipping.country", &shipping.country),
    ] {
        if value.trim().is_empty() {
            return Err(CheckoutServiceError::Validation { field });
        }
    }

    match &request.payment {
        PaymentMethod::Card { reference } if reference.trim().is_empty() => {
            Err(CheckoutServiceError::Validation {
                field: "payment.reference",
            })
        }
        PaymentMethod::MobileMoney { phone } if phone.trim().is_empty() => {
            Err(CheckoutServiceError::Validation {
                field: "payment.phone",
            })
        }
        _ => Ok(()),
    }
}

#[automock]
#[async_trait]
pub trait CheckoutService: Send + Sync {
    /// Convert the user's cart into an order exactly once.
    ///
    /// `at` stamps the order and anchors promo expiry checks.
    async fn checkout(
        &self,
        user: UserUuid,
        request: CheckoutRequest,
        at: Timestamp,
    ) -> Result<Order, CheckoutServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;
    use uuid::Uuid;

    use crate::{
        domain::{carts::CartsService, orders::models::ShippingAddress, products::ProductsService},
        test::TestContext,
    };

    use super::*;

    fn request() -> CheckoutRequest {
        CheckoutRequest {
            shipping: ShippingAddress {
                recipient: "Amina K".to_string(),
                line1: "12 Acacia Avenue".to_string(),
                line2: None,
                city: "Kampala".to_string(),
                country: "UG".to_string(),
                phone: Some("+256700000000".to_string()),
            },
            payment: PaymentMethod::Card {
                reference: "tok_visa".to_string(),
            },
            promo_code: None,
            idempotency_key: Some(Uuid::now_v7()),
        }
    }

    #[test]
    fn well_formed_request_passes_validation() {
        assert!(validate_request(&request()).is_ok());
    }

    #[test]
    fn blank_shipping_fields_are_rejected_by_name() {
        let mut bad = request();
        bad.shipping.city = "   ".to_string();

        let result = validate_request(&bad);

        assert!(
            matches!(
                result,
                Err(CheckoutServiceError::Validation {
                    field: "shipping.city"
                })
            ),
            "expected shipping.city validation failure, got {result:?}"
        );
    }

    #[test]
    fn card_payment_requires_a_reference() {
        let mut bad = request();
        bad.payment = PaymentMethod::Card {
            reference: String::new(),
        };

        assert!(matches!(
            validate_request(&bad),
            Err(CheckoutServiceError::Validation {
                field: "payment.reference"
            })
        ));
    }

    #[test]
    fn mobile_money_requires_a_phone() {
        let mut bad = request();
        bad.payment = PaymentMethod::MobileMoney {
            phone: " ".to_string(),
        };

        assert!(matches!(
            validate_request(&bad),
            Err(CheckoutServiceError::Validation {
                field: "payment.phone"
            })
        ));
    }

    #[test]
    fn cash_on_delivery_needs_no_reference() {
        let mut req = request();
        req.payment = PaymentMethod::CashOnDelivery;

        assert!(validate_request(&req).is_ok());
    }

    #[test]
    fn optional_line2_may_be_absent_or_blank() {
        let mut req = request();
        req.shipping.line2 = Some(String::new());

        assert!(validate_request(&req).is_ok());
    }

    #[tokio::test]
    async fn checkout_snapshots_the_cart_and_clears_it() -> TestResult {
        let ctx = TestContext::new().await;
        let crib = ctx.create_product("Convertible Crib", 250_00, 5).await;

        ctx.carts.add_item(ctx.user, crib.uuid, 2).await?;

        let order = ctx
            .checkout
            .checkout(ctx.user, request(), Timestamp::now())
            .await?;

        assert_eq!(order.subtotal, 500_00);
        assert_eq!(order.total, 500_00);
        assert_eq!(order.items.len(), 1);

        let crib_after = ctx.products.get_product(crib.uuid).await?;

        assert_eq!(crib_after.stock, 3, "checkout should decrement stock");
        assert!(
            ctx.carts.get_cart(ctx.user).await?.lines.is_empty(),
            "checkout should clear the cart"
        );

        Ok(())
    }

    #[tokio::test]
    async fn failed_reservation_rolls_back_earlier_decrements() -> TestResult {
        let ctx = TestContext::new().await;
        let crib = ctx.create_product("Convertible Crib", 250_00, 5).await;
        let monitor = ctx.create_product("Baby Monitor", 99_00, 2).await;

        ctx.carts.add_item(ctx.user, crib.uuid, 2).await?;
        ctx.carts.add_item(ctx.user, monitor.uuid, 2).await?;

        // A rival order drains the monitor stock between add and checkout.
        let rival = UserUuid::from_uuid(Uuid::now_v7());

        ctx.carts.add_item(rival, monitor.uuid, 2).await?;
        ctx.checkout
            .checkout(rival, request(), Timestamp::now())
            .await?;

        let result = ctx
            .checkout
            .checkout(ctx.user, request(), Timestamp::now())
            .await;

        assert!(
            matches!(
                result,
                Err(CheckoutServiceError::InsufficientStock { product })
                    if product == monitor.uuid.into_uuid()
            ),
            "expected InsufficientStock for the monitor, got {result:?}"
        );

        // The crib was reserved before the monitor failed; that decrement
        // must be gone.
        let crib_after = ctx.products.get_product(crib.uuid).await?;

        assert_eq!(crib_after.stock, 5, "aborted checkout must restore stock");

        let cart = ctx.carts.get_cart(ctx.user).await?;

        assert_eq!(cart.lines.len(), 2, "the cart survives a failed checkout");

        Ok(())
    }

    #[tokio::test]
    async fn idempotency_key_replay_does_not_double_decrement() -> TestResult {
        let ctx = TestContext::new().await;
        let crib = ctx.create_product("Convertible Crib", 250_00, 5).await;

        ctx.carts.add_item(ctx.user, crib.uuid, 2).await?;

        let key = Uuid::now_v7();

        let mut first_attempt = request();
        first_attempt.idempotency_key = Some(key);

        let first = ctx
            .checkout
            .checkout(ctx.user, first_attempt, Timestamp::now())
            .await?;

        assert_eq!(ctx.products.get_product(crib.uuid).await?.stock, 3);

        let mut retry = request();
        retry.idempotency_key = Some(key);

        let replayed = ctx
            .checkout
            .checkout(ctx.user, retry, Timestamp::now())
            .await?;

        assert_eq!(replayed.uuid, first.uuid, "a replay returns the original order");
        assert_eq!(replayed.total, first.total);
        assert_eq!(
            ctx.products.get_product(crib.uuid).await?.stock,
            3,
            "a replay must not decrement stock again"
        );

        let order_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(ctx.db.pool())
            .await?;

        assert_eq!(order_count, 1, "a replay must not write a second order");

        Ok(())
    }
}
