//! Promos service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tracing::info;

use crate::{
    auth::UserUuid,
    database::Db,
    domain::{
        carts::{PgCartLinesRepository, PgCartsRepository, models::subtotal},
        promos::{
            errors::PromosServiceError,
            models::{NewPromo, Promo, PromoEvaluation, normalize_code},
            repository::PgPromosRepository,
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgPromosService {
    db: Db,
    promos: PgPromosRepository,
    carts: PgCartsRepository,
    lines: PgCartLinesRepository,
}

impl PgPromosService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            promos: PgPromosRepository::new(),
            carts: PgCartsRepository::new(),
            lines: PgCartLinesRepository::new(),
        }
    }
}

#[async_trait]
impl PromosService for PgPromosService {
    #[tracing::instrument(
        name = "promos.service.evaluate",
        skip(self, code),
        fields(user_uuid = %user, promo_code = tracing::field::Empty),
        err
    )]
    async fn evaluate(
        &self,
        user: UserUuid,
        code: &str,
        at: Timestamp,
    ) -> Result<PromoEvaluation, PromosServiceError> {
        let code = normalize_code(code);

        tracing::Span::current().record("promo_code", tracing::field::display(&code));

        let mut tx = self.db.begin().await?;

        let promo = self
            .promos
            .find_by_code(&mut tx, &code)
            .await?
            .ok_or(PromosServiceError::NotFound)?;

        if promo.expired_at(at) {
            return Err(PromosServiceError::Expired);
        }

        let cart = self
            .carts
            .get_cart(&mut tx, user)
            .await?
            .ok_or(PromosServiceError::CartNotFound)?;

        let lines = self.lines.list_lines(&mut tx, cart.uuid).await?;

        tx.commit().await?;

        // An empty cart has no subtotal to discount.
        if lines.is_empty() {
            return Err(PromosServiceError::CartNotFound);
        }

        let subtotal = subtotal(&lines);

        if let Some(minimum) = promo.unmet_minimum(subtotal) {
            return Err(PromosServiceError::BelowMinimum { minimum });
        }

        let discount = promo.discount.amount_for(subtotal);

        Ok(PromoEvaluation {
            promo,
            subtotal,
            discount,
        })
    }

    async fn create_promo(&self, promo: NewPromo) -> Result<Promo, PromosServiceError> {
        let mut tx = self.db.begin().await?;

        let promo = NewPromo {
            code: normalize_code(&promo.code),
            ..promo
        };

        let created = self.promos.create_promo(&mut tx, &promo).await?;

        tx.commit().await?;

        info!(promo_uuid = %created.uuid, code = %created.code, "created promo");

        Ok(created)
    }
}

#[automock]
#[async_trait]
pub trait PromosService: Send + Sync {
    /// Evaluate a promo code against the user's current cart at an instant.
    ///
    /// Pure in (cart subtotal, promo record, `at`): repeated calls without
    /// intervening cart or promo mutations return the same discount, and
    /// nothing is persisted.
    async fn evaluate(
        &self,
        user: UserUuid,
        code: &str,
        at: Timestamp,
    ) -> Result<PromoEvaluation, PromosServiceError>;

    /// Create a promo (admin/seed surface). The code is normalized before
    /// storage.
    async fn create_promo(&self, promo: NewPromo) -> Result<Promo, PromosServiceError>;
}
