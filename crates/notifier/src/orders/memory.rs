//! In-memory order lookup for tests.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use dialout_core::OrderId;

use super::{LookupError, Order, OrderLookup};

/// Order lookup backed by a process-local map. Never errors.
#[derive(Debug, Default)]
pub struct MemoryOrderLookup {
    orders: RwLock<HashMap<OrderId, Order>>,
}

impl MemoryOrderLookup {
    /// Create an empty lookup.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an order.
    pub async fn insert(&self, order: Order) {
        self.orders.write().await.insert(order.id, order);
    }
}

#[async_trait]
impl OrderLookup for MemoryOrderLookup {
    async fn order(&self, id: OrderId) -> Result<Option<Order>, LookupError> {
        Ok(self.orders.read().await.get(&id).cloned())
    }
}
