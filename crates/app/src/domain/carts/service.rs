//! Carts service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    auth::UserUuid,
    database::Db,
    domain::{
        carts::{
            errors::CartsServiceError,
            models::{Cart, CartLine, CartLineUuid, LineSelector, subtotal},
            repositories::{PgCartLinesRepository, PgCartsRepository},
        },
        products::{PgProductsRepository, models::ProductUuid},
    },
};

#[derive(Debug, Clone)]
pub struct PgCartsService {
    db: Db,
    carts: PgCartsRepository,
    lines: PgCartLinesRepository,
    products: PgProductsRepository,
}

impl PgCartsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            carts: PgCartsRepository::new(),
            lines: PgCartLinesRepository::new(),
            products: PgProductsRepository::new(),
        }
    }
}

#[async_trait]
impl CartsService for PgCartsService {
    async fn get_cart(&self, user: UserUuid) -> Result<Cart, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let Some(cart) = self.carts.get_cart(&mut tx, user).await? else {
            return Ok(Cart::empty(user));
        };

        let lines = self.lines.list_lines(&mut tx, cart.uuid).await?;

        tx.commit().await?;

        let subtotal = subtotal(&lines);

        Ok(Cart {
            user_uuid: user,
            lines,
            subtotal,
            updated_at: Some(cart.updated_at),
        })
    }

    #[tracing::instrument(
        name = "carts.service.add_item",
        skip(self),
        fields(user_uuid = %user, product_uuid = %product, quantity),
        err
    )]
    async fn add_item(
        &self,
        user: UserUuid,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<CartLine, CartsServiceError> {
        if quantity == 0 {
            return Err(CartsServiceError::ZeroQuantity);
        }

        let mut tx = self.db.begin().await?;

        let record = self
            .products
            .get_product(&mut tx, product)
            .await?
            .ok_or(CartsServiceError::ProductNotFound)?;

        // The requested quantity alone is checked against stock, not the
        // cumulative line quantity. Documented upstream behavior; the
        // cumulative check happens at update and checkout time.
        if quantity > record.stock {
            return Err(CartsServiceError::InsufficientStock {
                available: record.stock,
            });
        }

        let cart = self.carts.ensure_cart(&mut tx, user).await?;

        let (line_uuid, merged_quantity) = self
            .lines
            .upsert_line(&mut tx, cart.uuid, CartLineUuid::new(), product, quantity)
            .await?;

        tx.commit().await?;

        info!(line_uuid = %line_uuid, "added cart line");

        Ok(CartLine {
            uuid: line_uuid,
            product_uuid: product,
            name: record.name,
            unit_price: record.price,
            quantity: merged_quantity,
        })
    }

    #[tracing::instrument(
        name = "carts.service.update_item",
        skip(self),
        fields(user_uuid = %user, selector = %selector.0, quantity),
        err
    )]
    async fn update_item(
        &self,
        user: UserUuid,
        selector: LineSelector,
        quantity: u32,
    ) -> Result<CartLine, CartsServiceError> {
        if quantity == 0 {
            return Err(CartsServiceError::ZeroQuantity);
        }

        let mut tx = self.db.begin().await?;

        let cart = self
            .carts
            .get_cart(&mut tx, user)
            .await?
            .ok_or(CartsServiceError::NotFound)?;

        let found = self
            .lines
            .find_line(&mut tx, cart.uuid, selector)
            .await?
            .ok_or(CartsServiceError::NotFound)?;

        if quantity > found.stock {
            return Err(CartsServiceError::InsufficientStock {
                available: found.stock,
            });
        }

        let rows_affected = self
            .lines
            .update_quantity(&mut tx, cart.uuid, selector, quantity)
            .await?;

        if rows_affected == 0 {
            return Err(CartsServiceError::NotFound);
        }

        self.carts.touch_cart(&mut tx, cart.uuid).await?;

        tx.commit().await?;

        Ok(CartLine {
            quantity,
            ..found.line
        })
    }

    async fn remove_item(
        &self,
        user: UserUuid,
        selector: LineSelector,
    ) -> Result<(), CartsServiceError> {
        let mut tx = self.db.begin().await?;

        // Removing from an absent cart, or removing an absent line, is a
        // successful no-op. Only an actual deletion counts as a mutation
        // worth stamping on the cart row.
        if let Some(cart) = self.carts.get_cart(&mut tx, user).await? {
            let rows_affected = self.lines.delete_line(&mut tx, cart.uuid, selector).await?;

            if rows_affected > 0 {
                self.carts.touch_cart(&mut tx, cart.uuid).await?;
            }
        }

        tx.commit().await?;

        Ok(())
    }

    async fn clear_cart(&self, user: UserUuid) -> Result<(), CartsServiceError> {
        let mut tx = self.db.begin().await?;

        // Clearing an already-absent cart succeeds; clear is idempotent.
        self.carts.delete_cart(&mut tx, user).await?;

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Retrieve the user's cart with lines joined against the live catalog.
    ///
    /// A user with no stored cart gets an empty cart.
    async fn get_cart(&self, user: UserUuid) -> Result<Cart, CartsServiceError>;

    /// Add `quantity` of a product, merging into an existing line for the
    /// same product.
    async fn add_item(
        &self,
        user: UserUuid,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<CartLine, CartsServiceError>;

    /// Set the quantity of a line addressed by line or product UUID.
    async fn update_item(
        &self,
        user: UserUuid,
        selector: LineSelector,
        quantity: u32,
    ) -> Result<CartLine, CartsServiceError>;

    /// Remove a line addressed by line or product UUID; idempotent.
    async fn remove_item(
        &self,
        user: UserUuid,
        selector: LineSelector,
    ) -> Result<(), CartsServiceError>;

    /// Delete the user's cart; idempotent.
    async fn clear_cart(&self, user: UserUuid) -> Result<(), CartsServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::test::TestContext;

    use super::*;

    #[tokio::test]
    async fn add_item_merges_lines_for_the_same_product() -> TestResult {
        let ctx = TestContext::new().await;
        let crib = ctx.create_product("Convertible Crib", 250_00, 10).await;

        let first = ctx.carts.add_item(ctx.user, crib.uuid, 2).await?;
        let merged = ctx.carts.add_item(ctx.user, crib.uuid, 3).await?;

        assert_eq!(merged.uuid, first.uuid, "the existing line should be reused");
        assert_eq!(merged.quantity, 5);

        let cart = ctx.carts.get_cart(ctx.user).await?;

        assert_eq!(cart.lines.len(), 1, "merging must not create a second line");
        assert_eq!(cart.lines.first().map(|line| line.quantity), Some(5));
        assert_eq!(cart.subtotal, 1250_00);

        Ok(())
    }

    #[tokio::test]
    async fn failed_add_leaves_the_cart_unchanged() -> TestResult {
        let ctx = TestContext::new().await;
        let chair = ctx.create_product("Rocking Chair", 420_00, 2).await;

        let result = ctx.carts.add_item(ctx.user, chair.uuid, 3).await;

        assert!(
            matches!(
                result,
                Err(CartsServiceError::InsufficientStock { available: 2 })
            ),
            "expected InsufficientStock, got {result:?}"
        );

        let cart = ctx.carts.get_cart(ctx.user).await?;

        assert!(cart.lines.is_empty(), "a rejected add must not create a line");
        assert_eq!(cart.subtotal, 0);

        Ok(())
    }

    #[tokio::test]
    async fn line_mutations_advance_the_cart_timestamp() -> TestResult {
        let ctx = TestContext::new().await;
        let swaddle = ctx.create_product("Muslin Swaddle", 18_00, 10).await;

        ctx.carts.add_item(ctx.user, swaddle.uuid, 1).await?;

        let after_add = ctx.carts.get_cart(ctx.user).await?.updated_at;
        let selector = LineSelector::from(swaddle.uuid.into_uuid());

        ctx.carts.update_item(ctx.user, selector, 4).await?;

        let after_update = ctx.carts.get_cart(ctx.user).await?.updated_at;

        assert!(
            after_update > after_add,
            "update_item should refresh the cart timestamp"
        );

        ctx.carts.remove_item(ctx.user, selector).await?;

        let after_remove = ctx.carts.get_cart(ctx.user).await?.updated_at;

        assert!(
            after_remove > after_update,
            "remove_item should refresh the cart timestamp"
        );

        Ok(())
    }

    #[tokio::test]
    async fn removing_an_absent_line_does_not_advance_the_cart_timestamp() -> TestResult {
        let ctx = TestContext::new().await;
        let swaddle = ctx.create_product("Muslin Swaddle", 18_00, 10).await;

        ctx.carts.add_item(ctx.user, swaddle.uuid, 1).await?;

        let before = ctx.carts.get_cart(ctx.user).await?.updated_at;

        ctx.carts
            .remove_item(ctx.user, LineSelector::from(uuid::Uuid::now_v7()))
            .await?;

        let after = ctx.carts.get_cart(ctx.user).await?.updated_at;

        assert_eq!(after, before, "a no-op remove is not a mutation");

        Ok(())
    }
}
