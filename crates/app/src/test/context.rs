//! Test context for service-level integration tests.

use uuid::Uuid;

use crate::{
    auth::UserUuid,
    database::Db,
    domain::{
        carts::PgCartsService,
        orders::PgCheckoutService,
        products::{
            PgProductsService, ProductsService,
            models::{NewProduct, Product, ProductUuid},
        },
    },
};

use super::db::TestDb;

/// Real services wired against an isolated per-test database, plus a user
/// to act as.
pub(crate) struct TestContext {
    pub db: TestDb,
    pub user: UserUuid,
    pub products: PgProductsService,
    pub carts: PgCartsService,
    pub checkout: PgCheckoutService,
}

impl TestContext {
    pub(crate) async fn new() -> Self {
        let db = TestDb::new().await;
        let handle = Db::new(db.pool().clone());

        Self {
            user: UserUuid::from_uuid(Uuid::now_v7()),
            products: PgProductsService::new(handle.clone()),
            carts: PgCartsService::new(handle.clone()),
            checkout: PgCheckoutService::new(handle),
            db,
        }
    }

    /// Seed a catalog product.
    pub(crate) async fn create_product(&self, name: &str, price: u64, stock: u32) -> Product {
        self.products
            .create_product(NewProduct {
                uuid: ProductUuid::new(),
                name: name.to_string(),
                price,
                stock,
            })
            .await
            .expect("failed to seed test product")
    }
}
