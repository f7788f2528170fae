//! Test helpers.

use std::sync::Arc;

use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use cradle_app::{
    auth::{MockAuthService, UserUuid},
    context::AppContext,
    domain::{
        carts::{
            MockCartsService,
            models::{Cart, CartLine, CartLineUuid},
        },
        orders::MockCheckoutService,
        products::{MockProductsService, models::ProductUuid},
        promos::MockPromosService,
    },
};

use crate::{extensions::*, state::State};

pub(crate) const TEST_USER_UUID: UserUuid = UserUuid::from_uuid(Uuid::nil());

/// Stands in for the auth middleware: every request is the test user.
#[salvo::handler]
pub(crate) async fn inject_user(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_user_uuid(TEST_USER_UUID);
    ctrl.call_next(req, depot, res).await;
}

/// A one-line cart for handler tests.
pub(crate) fn make_cart() -> Cart {
    let line = CartLine {
        uuid: CartLineUuid::new(),
        product_uuid: ProductUuid::new(),
        name: "Convertible Crib".to_string(),
        unit_price: 250_00,
        quantity: 2,
    };

    Cart {
        user_uuid: TEST_USER_UUID,
        subtotal: line.line_total(),
        lines: vec![line],
        updated_at: None,
    }
}

fn strict_auth_mock() -> MockAuthService {
    let mut auth = MockAuthService::new();

    auth.expect_authenticate_bearer().never();

    auth
}

fn strict_products_mock() -> MockProductsService {
    let mut products = MockProductsService::new();

    products.expect_list_products().never();
    products.expect_get_product().never();
    products.expect_create_product().never();

    products
}

fn strict_carts_mock() -> MockCartsService {
    let mut carts = MockCartsService::new();

    carts.expect_get_cart().never();
    carts.expect_add_item().never();
    carts.expect_update_item().never();
    carts.expect_remove_item().never();
    carts.expect_clear_cart().never();

    carts
}

fn strict_promos_mock() -> MockPromosService {
    let mut promos = MockPromosService::new();

    promos.expect_evaluate().never();
    promos.expect_create_promo().never();

    promos
}

fn strict_checkout_mock() -> MockCheckoutService {
    let mut checkout = MockCheckoutService::new();

    checkout.expect_checkout().never();

    checkout
}

struct Mocks {
    products: MockProductsService,
    carts: MockCartsService,
    promos: MockPromosService,
    checkout: MockCheckoutService,
    auth: MockAuthService,
}

impl Mocks {
    fn strict() -> Self {
        Self {
            products: strict_products_mock(),
            carts: strict_carts_mock(),
            promos: strict_promos_mock(),
            checkout: strict_checkout_mock(),
            auth: strict_auth_mock(),
        }
    }

    fn into_state(self) -> Arc<State> {
        Arc::new(State::new(AppContext {
            products: Arc::new(self.products),
            carts: Arc::new(self.carts),
            promos: Arc::new(self.promos),
            checkout: Arc::new(self.checkout),
            auth: Arc::new(self.auth),
        }))
    }
}

pub(crate) fn state_with_auth(auth: MockAuthService) -> Arc<State> {
    Mocks { auth, ..Mocks::strict() }.into_state()
}

fn service_with(state: Arc<State>, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state))
            .hoop(inject_user)
            .push(route),
    )
}

pub(crate) fn carts_service(carts: MockCartsService, route: Router) -> Service {
    service_with(Mocks { carts, ..Mocks::strict() }.into_state(), route)
}

pub(crate) fn promos_service(promos: MockPromosService, route: Router) -> Service {
    service_with(Mocks { promos, ..Mocks::strict() }.into_state(), route)
}

pub(crate) fn checkout_service(checkout: MockCheckoutService, route: Router) -> Service {
    service_with(Mocks { checkout, ..Mocks::strict() }.into_state(), route)
}
