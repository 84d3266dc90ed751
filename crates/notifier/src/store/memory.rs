//! In-memory metadata store for tests and dry runs.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use dialout_core::{OrderId, ProductId, UserId};

use super::{EntityKind, MetadataStore, StoreError};

/// Metadata store backed by a process-local map. Never errors.
#[derive(Debug, Default)]
pub struct MemoryMetaStore {
    entries: RwLock<HashMap<(EntityKind, i64, String), String>>,
}

impl MemoryMetaStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    async fn get(&self, kind: EntityKind, id: i64, key: &str) -> Option<String> {
        self.entries
            .read()
            .await
            .get(&(kind, id, key.to_owned()))
            .cloned()
    }

    async fn set(&self, kind: EntityKind, id: i64, key: &str, value: &str) {
        self.entries
            .write()
            .await
            .insert((kind, id, key.to_owned()), value.to_owned());
    }
}

#[async_trait]
impl MetadataStore for MemoryMetaStore {
    async fn user_meta(&self, user: UserId, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.get(EntityKind::User, user.as_i64(), key).await)
    }

    async fn set_user_meta(
        &self,
        user: UserId,
        key: &str,
        value: &str,
    ) -> Result<(), StoreError> {
        self.set(EntityKind::User, user.as_i64(), key, value).await;
        Ok(())
    }

    async fn product_meta(
        &self,
        product: ProductId,
        key: &str,
    ) -> Result<Option<String>, StoreError> {
        Ok(self.get(EntityKind::Product, product.as_i64(), key).await)
    }

    async fn set_product_meta(
        &self,
        product: ProductId,
        key: &str,
        value: &str,
    ) -> Result<(), StoreError> {
        self.set(EntityKind::Product, product.as_i64(), key, value)
            .await;
        Ok(())
    }

    async fn order_meta(&self, order: OrderId, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.get(EntityKind::Order, order.as_i64(), key).await)
    }

    async fn set_order_meta(
        &self,
        order: OrderId,
        key: &str,
        value: &str,
    ) -> Result<(), StoreError> {
        self.set(EntityKind::Order, order.as_i64(), key, value)
            .await;
        Ok(())
    }
}
