//! `PostgreSQL`-backed metadata store.
//!
//! One table, `notifier.entity_meta`, keyed by `(entity_type, entity_id,
//! meta_key)` with upsert writes. Queries are runtime-bound because meta
//! keys are dynamic strings.
//!
//! # Migrations
//!
//! Migrations live in `crates/notifier/migrations/` and are NOT run on
//! startup. Run them explicitly via:
//! ```bash
//! cargo run -p dialout-cli -- migrate
//! ```

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use dialout_core::{OrderId, ProductId, UserId};

use super::{EntityKind, MetadataStore, StoreError};

/// Embedded migrations for the `notifier` schema.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Metadata store backed by `notifier.entity_meta`.
#[derive(Clone)]
pub struct PgMetaStore {
    pool: PgPool,
}

impl PgMetaStore {
    /// Create a new store over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn get(
        &self,
        kind: EntityKind,
        id: i64,
        key: &str,
    ) -> Result<Option<String>, StoreError> {
        let value = sqlx::query_scalar::<_, String>(
            r"
            SELECT meta_value FROM notifier.entity_meta
            WHERE entity_type = $1 AND entity_id = $2 AND meta_key = $3
            ",
        )
        .bind(kind.as_str())
        .bind(id)
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(value)
    }

    async fn set(
        &self,
        kind: EntityKind,
        id: i64,
        key: &str,
        value: &str,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r"
            INSERT INTO notifier.entity_meta (entity_type, entity_id, meta_key, meta_value)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (entity_type, entity_id, meta_key)
            DO UPDATE SET meta_value = EXCLUDED.meta_value, updated_at = NOW()
            ",
        )
        .bind(kind.as_str())
        .bind(id)
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl MetadataStore for PgMetaStore {
    async fn user_meta(&self, user: UserId, key: &str) -> Result<Option<String>, StoreError> {
        self.get(EntityKind::User, user.as_i64(), key).await
    }

    async fn set_user_meta(
        &self,
        user: UserId,
        key: &str,
        value: &str,
    ) -> Result<(), StoreError> {
        self.set(EntityKind::User, user.as_i64(), key, value).await
    }

    async fn product_meta(
        &self,
        product: ProductId,
        key: &str,
    ) -> Result<Option<String>, StoreError> {
        self.get(EntityKind::Product, product.as_i64(), key).await
    }

    async fn set_product_meta(
        &self,
        product: ProductId,
        key: &str,
        value: &str,
    ) -> Result<(), StoreError> {
        self.set(EntityKind::Product, product.as_i64(), key, value)
            .await
    }

    async fn order_meta(&self, order: OrderId, key: &str) -> Result<Option<String>, StoreError> {
        self.get(EntityKind::Order, order.as_i64(), key).await
    }

    async fn set_order_meta(
        &self,
        order: OrderId,
        key: &str,
        value: &str,
    ) -> Result<(), StoreError> {
        self.set(EntityKind::Order, order.as_i64(), key, value)
            .await
    }
}
