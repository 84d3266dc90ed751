//! Order lookup collaborator.
//!
//! Orders belong to the host platform; this crate only resolves them when a
//! completion event arrives. [`OrderLookup`] is the seam, with a
//! `PostgreSQL` implementation over the host's tables and an in-memory one
//! for tests.

mod memory;
mod postgres;

pub use memory::MemoryOrderLookup;
pub use postgres::PgOrderLookup;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use dialout_core::{OrderId, Price, ProductId, UserId};

/// A completed order, as much of it as notification needs.
#[derive(Debug, Clone)]
pub struct Order {
    /// Host identifier.
    pub id: OrderId,
    /// Display number shown to the customer (not always the id).
    pub number: String,
    /// Order total, for the message body.
    pub total: Price,
    /// Purchasing account; `None` for guest checkouts.
    pub customer: Option<UserId>,
    /// When the order was placed.
    pub placed_at: DateTime<Utc>,
    /// Line items in their stored order.
    pub items: Vec<LineItem>,
}

/// One line of an order.
#[derive(Debug, Clone)]
pub struct LineItem {
    /// The purchased listing.
    pub product_id: ProductId,
    /// Units purchased.
    pub quantity: i32,
}

/// Error type for order lookups.
#[derive(Debug, Error)]
pub enum LookupError {
    /// Database error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored value could not be interpreted.
    #[error("invalid order data: {0}")]
    Data(String),
}

/// Resolve orders by identifier.
#[async_trait]
pub trait OrderLookup: Send + Sync {
    /// Fetch an order, `Ok(None)` if the id is unknown.
    async fn order(&self, id: OrderId) -> Result<Option<Order>, LookupError>;
}
