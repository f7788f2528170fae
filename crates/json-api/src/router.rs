//! App Router

use salvo::Router;

use crate::{auth, cart, checkout, promos};

pub fn app_router() -> Router {
    Router::new()
        .hoop(auth::middleware::handler)
        .push(
            Router::with_path("cart")
                .get(cart::handlers::get::handler)
                .post(cart::handlers::add::handler)
                .patch(cart::handlers::remove_by_product::handler)
                .delete(cart::handlers::clear::handler)
                .push(Router::with_path("apply-promo").post(promos::handlers::apply::handler))
                .push(
                    Router::with_path("{line}")
                        .put(cart::handlers::update::handler)
                        .delete(cart::handlers::remove::handler),
                ),
        )
        .push(Router::with_path("checkout").post(checkout::handlers::create::handler))
}
