//! Cart Lines Repository

use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::domain::{
    carts::models::{CartLine, CartLineUuid, CartUuid, LineSelector},
    products::{
        models::ProductUuid,
        repository::{try_get_amount, try_get_count},
    },
};

const LIST_CART_LINES_SQL: &str = include_str!("../sql/list_cart_lines.sql");
const FIND_CART_LINE_SQL: &str = include_str!("../sql/find_cart_line.sql");
const UPSERT_CART_LINE_SQL: &str = include_str!("../sql/upsert_cart_line.sql");
const UPDATE_LINE_QUANTITY_SQL: &str = include_str!("../sql/update_line_quantity.sql");
const DELETE_CART_LINE_SQL: &str = include_str!("../sql/delete_cart_line.sql");

/// A line joined with the live stock level, used for quantity re-validation.
#[derive(Debug, Clone)]
pub(crate) struct LineWithStock {
    pub line: CartLine,
    pub stock: u32,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCartLinesRepository;

impl PgCartLinesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// All lines of a cart joined with current product name and price.
    ///
    /// Lines whose product has been removed from the catalog are not
    /// returned (inner join against the live catalog).
    pub(crate) async fn list_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
    ) -> Result<Vec<CartLine>, sqlx::Error> {
        query_as::<Postgres, CartLine>(LIST_CART_LINES_SQL)
            .bind(cart.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    /// Resolve a line by line UUID or product UUID, with its product's stock.
    pub(crate) async fn find_line(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        selector: LineSelector,
    ) -> Result<Option<LineWithStock>, sqlx::Error> {
        query_as::<Postgres, LineWithStock>(FIND_CART_LINE_SQL)
            .bind(cart.into_uuid())
            .bind(selector.0)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Insert a line, or add to the quantity of the existing line for the
    /// same product. The increment happens inside the statement, so two
    /// concurrent adds can never overwrite each other.
    pub(crate) async fn upsert_line(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        line: CartLineUuid,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<(CartLineUuid, u32), sqlx::Error> {
        let row = query(UPSERT_CART_LINE_SQL)
            .bind(line.into_uuid())
            .bind(cart.into_uuid())
            .bind(product.into_uuid())
            .bind(i64::from(quantity))
            .fetch_one(&mut **tx)
            .await?;

        Ok((
            CartLineUuid::from_uuid(row.try_get("uuid")?),
            try_get_count(&row, "quantity")?,
        ))
    }

    pub(crate) async fn update_quantity(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        selector: LineSelector,
        quantity: u32,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(UPDATE_LINE_QUANTITY_SQL)
            .bind(cart.into_uuid())
            .bind(selector.0)
            .bind(i64::from(quantity))
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn delete_line(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        selector: LineSelector,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_CART_LINE_SQL)
            .bind(cart.into_uuid())
            .bind(selector.0)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for CartLine {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: CartLineUuid::from_uuid(row.try_get("uuid")?),
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            name: row.try_get("name")?,
            unit_price: try_get_amount(row, "price")?,
            quantity: try_get_count(row, "quantity")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for LineWithStock {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            line: CartLine::from_row(row)?,
            stock: try_get_count(row, "stock")?,
        })
    }
}
