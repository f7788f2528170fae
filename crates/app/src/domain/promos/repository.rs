//! Promos Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::domain::{
    products::repository::{to_db_amount, try_get_amount},
    promos::{
        discount::Discount,
        models::{NewPromo, Promo, PromoUuid},
    },
};

const FIND_PROMO_BY_CODE_SQL: &str = include_str!("sql/find_promo_by_code.sql");
const CREATE_PROMO_SQL: &str = include_str!("sql/create_promo.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgPromosRepository;

impl PgPromosRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Look up a promo by its already-normalized code.
    pub(crate) async fn find_by_code(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: &str,
    ) -> Result<Option<Promo>, sqlx::Error> {
        query_as::<Postgres, Promo>(FIND_PROMO_BY_CODE_SQL)
            .bind(code)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn create_promo(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        promo: &NewPromo,
    ) -> Result<Promo, sqlx::Error> {
        query_as::<Postgres, Promo>(CREATE_PROMO_SQL)
            .bind(promo.uuid.into_uuid())
            .bind(&promo.code)
            .bind(promo.discount.kind_as_str())
            .bind(to_db_amount(promo.discount.value())?)
            .bind(SqlxTimestamp::from(promo.expires_at))
            .bind(promo.min_cart_value.map(to_db_amount).transpose()?)
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for Promo {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let kind: String = row.try_get("discount_kind")?;
        let value = try_get_amount(row, "discount_value")?;

        // Reject malformed reference data at the storage boundary instead of
        // letting it reach the evaluator.
        let discount =
            Discount::from_parts(&kind, value).ok_or_else(|| sqlx::Error::ColumnDecode {
                index: "discount_kind".to_string(),
                source: format!("unknown discount kind or out-of-range value: {kind} {value}")
                    .into(),
            })?;

        Ok(Self {
            uuid: PromoUuid::from_uuid(row.try_get("uuid")?),
            code: row.try_get("code")?,
            discount,
            expires_at: row.try_get::<SqlxTimestamp, _>("expires_at")?.to_jiff(),
            min_cart_value: row
                .try_get::<Option<i64>, _>("min_cart_value")?
                .map(|minimum| {
                    u64::try_from(minimum).map_err(|e| sqlx::Error::ColumnDecode {
                        index: "min_cart_value".to_string(),
                        source: Box::new(e),
                    })
                })
                .transpose()?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
