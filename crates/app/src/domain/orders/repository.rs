//! Orders Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::{
    auth::UserUuid,
    domain::{
        orders::models::{Order, OrderItem, OrderStatus, OrderUuid, PaymentMethod, ShippingAddress},
        products::{
            models::ProductUuid,
            repository::{to_db_amount, try_get_amount, try_get_count},
        },
    },
};

const CREATE_ORDER_SQL: &str = include_str!("sql/create_order.sql");
const CREATE_ORDER_ITEM_SQL: &str = include_str!("sql/create_order_item.sql");
const FIND_ORDER_BY_IDEMPOTENCY_KEY_SQL: &str =
    include_str!("sql/find_order_by_idempotency_key.sql");
const LIST_ORDER_ITEMS_SQL: &str = include_str!("sql/list_order_items.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Find a previously placed order for an idempotency-key replay.
    pub(crate) async fn find_by_idempotency_key(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        key: Uuid,
    ) -> Result<Option<Order>, sqlx::Error> {
        let Some(mut order) = query_as::<Postgres, Order>(FIND_ORDER_BY_IDEMPOTENCY_KEY_SQL)
            .bind(user.into_uuid())
            .bind(key)
            .fetch_optional(&mut **tx)
            .await?
        else {
            return Ok(None);
        };

        order.items = self.list_order_items(tx, order.uuid).await?;

        Ok(Some(order))
    }

    pub(crate) async fn list_order_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Vec<OrderItem>, sqlx::Error> {
        query_as::<Postgres, OrderItem>(LIST_ORDER_ITEMS_SQL)
            .bind(order.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    /// Persist the order snapshot and its items.
    pub(crate) async fn create_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: &Order,
    ) -> Result<(), sqlx::Error> {
        query(CREATE_ORDER_SQL)
            .bind(order.uuid.into_uuid())
            .bind(order.user_uuid.into_uuid())
            .bind(to_db_amount(order.subtotal)?)
            .bind(to_db_amount(order.discount)?)
            .bind(to_db_amount(order.total)?)
            .bind(order.promo_code.as_deref())
            .bind(&order.shipping.recipient)
            .bind(&order.shipping.line1)
            .bind(order.shipping.line2.as_deref())
            .bind(&order.shipping.city)
            .bind(&order.shipping.country)
            .bind(order.shipping.phone.as_deref())
            .bind(order.payment.kind_as_str())
            .bind(order.payment.reference())
            .bind(order.status.as_str())
            .bind(order.idempotency_key)
            .execute(&mut **tx)
            .await?;

        for item in &order.items {
            query(CREATE_ORDER_ITEM_SQL)
                .bind(order.uuid.into_uuid())
                .bind(item.product_uuid.into_uuid())
                .bind(&item.name)
                .bind(to_db_amount(item.unit_price)?)
                .bind(i64::from(item.quantity))
                .execute(&mut **tx)
                .await?;
        }

        Ok(())
    }
}

impl<'r> FromRow<'r, PgRow> for Order {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let status_tag: String = row.try_get("status")?;

        let status =
            OrderStatus::from_str_tag(&status_tag).ok_or_else(|| sqlx::Error::ColumnDecode {
                index: "status".to_string(),
                source: format!("unknown order status: {status_tag}").into(),
            })?;

        let payment_kind: String = row.try_get("payment_kind")?;
        let payment_reference: Option<String> = row.try_get("payment_reference")?;

        let payment = PaymentMethod::from_parts(&payment_kind, payment_reference).ok_or_else(
            || sqlx::Error::ColumnDecode {
                index: "payment_kind".to_string(),
                source: format!("malformed payment method: {payment_kind}").into(),
            },
        )?;

        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            user_uuid: UserUuid::from_uuid(row.try_get::<Uuid, _>("user_uuid")?),
            items: Vec::new(),
            subtotal: try_get_amount(row, "subtotal")?,
            discount: try_get_amount(row, "discount")?,
            total: try_get_amount(row, "total")?,
            promo_code: row.try_get("promo_code")?,
            shipping: ShippingAddress {
                recipient: row.try_get("recipient")?,
                line1: row.try_get("line1")?,
                line2: row.try_get("line2")?,
                city: row.try_get("city")?,
                country: row.try_get("country")?,
                phone: row.try_get("phone")?,
            },
            payment,
            status,
            idempotency_key: row.try_get("idempotency_key")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for OrderItem {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            name: row.try_get("name")?,
            unit_price: try_get_amount(row, "unit_price")?,
            quantity: try_get_count(row, "quantity")?,
        })
    }
}
