//! Entity metadata persistence.
//!
//! The host platform attaches arbitrary key-value fields to users, products,
//! and orders through a generic metadata layer. [`MetadataStore`] is that
//! layer's seam: the phone fields this crate owns are plain string values
//! under the keys in [`keys`], with no validation, versioning, or locking
//! beyond the database's own statement atomicity.
//!
//! Two implementations:
//! - [`PgMetaStore`] - the `notifier.entity_meta` table
//! - [`MemoryMetaStore`] - tests and dry runs

mod memory;
mod postgres;

pub use memory::MemoryMetaStore;
pub use postgres::{MIGRATOR, PgMetaStore, create_pool};

use async_trait::async_trait;
use thiserror::Error;

use dialout_core::{OrderId, ProductId, UserId};

/// Metadata keys this crate reads and writes.
pub mod keys {
    /// Account phone number, stored on the user.
    pub const USER_PHONE: &str = "twilio_phone";

    /// Seller phone number, stored on the product. The underscore prefix
    /// keeps the key out of the host's user-visible custom-field listings.
    pub const PRODUCT_PHONE: &str = "_twilio_phone";

    /// Guest-entered phone number, stored on the order at checkout.
    pub const ORDER_GUEST_PHONE: &str = "guest_twilio_phone";

    /// Marker set once an order's confirmation dispatch has run. Only
    /// consulted under [`crate::hooks::NotifyPolicy::OncePerOrder`].
    pub const ORDER_NOTIFIED: &str = "_sms_notification_sent";
}

/// Error type for metadata operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// The entity kinds metadata can attach to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum EntityKind {
    User,
    Product,
    Order,
}

impl EntityKind {
    pub(crate) const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Product => "product",
            Self::Order => "order",
        }
    }
}

/// Read/write access to the host's entity metadata.
///
/// Reads of absent keys return `Ok(None)`, never an error. Writes overwrite
/// unconditionally, including with the empty string - clearing a field is an
/// overwrite, not a delete.
#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// Get a user metadata value.
    async fn user_meta(&self, user: UserId, key: &str) -> Result<Option<String>, StoreError>;

    /// Set a user metadata value.
    async fn set_user_meta(&self, user: UserId, key: &str, value: &str)
    -> Result<(), StoreError>;

    /// Get a product metadata value.
    async fn product_meta(
        &self,
        product: ProductId,
        key: &str,
    ) -> Result<Option<String>, StoreError>;

    /// Set a product metadata value.
    async fn set_product_meta(
        &self,
        product: ProductId,
        key: &str,
        value: &str,
    ) -> Result<(), StoreError>;

    /// Get an order metadata value.
    async fn order_meta(&self, order: OrderId, key: &str) -> Result<Option<String>, StoreError>;

    /// Set an order metadata value.
    async fn set_order_meta(
        &self,
        order: OrderId,
        key: &str,
        value: &str,
    ) -> Result<(), StoreError>;
}
