//! Order lookup over the host platform's tables.
//!
//! Reads `orders` and `order_items`. Both tables are host-owned; the
//! notifier never writes them.
//!
//! Expected columns:
//! - `orders(id BIGINT, number TEXT, total_amount NUMERIC, currency TEXT,
//!   customer_id BIGINT NULL, placed_at TIMESTAMPTZ)`
//! - `order_items(id BIGINT, order_id BIGINT, product_id BIGINT,
//!   quantity INT)` - `id` preserves insertion order

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Row};

use dialout_core::{CurrencyCode, OrderId, Price, ProductId, UserId};

use super::{LineItem, LookupError, Order, OrderLookup};

/// Order lookup backed by the host's `PostgreSQL` tables.
#[derive(Clone)]
pub struct PgOrderLookup {
    pool: PgPool,
}

impl PgOrderLookup {
    /// Create a new lookup over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderLookup for PgOrderLookup {
    async fn order(&self, id: OrderId) -> Result<Option<Order>, LookupError> {
        let row = sqlx::query(
            r"
            SELECT id, number, total_amount, currency, customer_id, placed_at
            FROM orders
            WHERE id = $1
            ",
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let amount: Decimal = row.try_get("total_amount")?;
        let currency: String = row.try_get("currency")?;
        let currency = currency
            .parse::<CurrencyCode>()
            .map_err(|e| LookupError::Data(e.to_string()))?;
        let number: String = row.try_get("number")?;
        let customer: Option<i64> = row.try_get("customer_id")?;
        let placed_at: DateTime<Utc> = row.try_get("placed_at")?;

        let item_rows = sqlx::query(
            r"
            SELECT product_id, quantity
            FROM order_items
            WHERE order_id = $1
            ORDER BY id
            ",
        )
        .bind(id.as_i64())
        .fetch_all(&self.pool)
        .await?;

        let mut items = Vec::with_capacity(item_rows.len());
        for item in item_rows {
            let product_id: i64 = item.try_get("product_id")?;
            let quantity: i32 = item.try_get("quantity")?;
            items.push(LineItem {
                product_id: ProductId::new(product_id),
                quantity,
            });
        }

        Ok(Some(Order {
            id,
            number,
            total: Price::new(amount, currency),
            customer: customer.map(UserId::new),
            placed_at,
            items,
        }))
    }
}
