//! Integration tests for Dialout.
//!
//! The tests drive [`dialout_notifier::hooks::PhoneManager`] through the
//! [`dialout_notifier::hooks::LifecycleHooks`] trait - the same surface a
//! host adapter uses - with in-memory collaborators standing in for the
//! database and Twilio.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p dialout-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `notifier_dispatch` - recipient resolution and send fan-out
//! - `notifier_phone_fields` - field rendering and save semantics

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;

use dialout_core::{CurrencyCode, OrderId, PhoneNumber, Price, ProductId, UserId};
use dialout_notifier::hooks::{NotifyPolicy, PhoneManager};
use dialout_notifier::notify::{Dispatcher, SendError, SmsSender};
use dialout_notifier::orders::{LineItem, MemoryOrderLookup, Order};
use dialout_notifier::store::MemoryMetaStore;

/// SMS transport fake: records every send, rejects configured numbers.
#[derive(Default)]
pub struct RecordingSender {
    sent: Mutex<Vec<(String, String)>>,
    fail: HashSet<String>,
}

impl RecordingSender {
    /// A sender that accepts everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A sender that rejects the given destination numbers.
    #[must_use]
    pub fn failing_for(numbers: &[&str]) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: numbers.iter().map(|&n| n.to_owned()).collect(),
        }
    }

    /// Every `(to, body)` pair accepted so far, in send order.
    ///
    /// # Panics
    ///
    /// Panics if the interior lock is poisoned.
    #[must_use]
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().expect("lock poisoned").clone()
    }

    /// Destination numbers accepted so far, in send order.
    #[must_use]
    pub fn sent_numbers(&self) -> Vec<String> {
        self.sent().into_iter().map(|(to, _)| to).collect()
    }
}

#[async_trait]
impl SmsSender for RecordingSender {
    async fn send(&self, to: &PhoneNumber, body: &str) -> Result<(), SendError> {
        if self.fail.contains(to.as_str()) {
            return Err(SendError::new("injected failure"));
        }
        self.sent
            .lock()
            .expect("lock poisoned")
            .push((to.as_str().to_owned(), body.to_owned()));
        Ok(())
    }
}

/// Everything a hook-level test needs, wired over in-memory collaborators.
pub struct TestHarness {
    pub meta: Arc<MemoryMetaStore>,
    pub orders: Arc<MemoryOrderLookup>,
    pub sms: Arc<RecordingSender>,
    pub manager: PhoneManager,
}

impl TestHarness {
    /// Harness with the default (duplicate-prone) notify policy.
    #[must_use]
    pub fn new() -> Self {
        Self::with_policy(NotifyPolicy::EveryEvent, RecordingSender::new())
    }

    /// Harness with an explicit policy and sender.
    #[must_use]
    pub fn with_policy(policy: NotifyPolicy, sender: RecordingSender) -> Self {
        let meta = Arc::new(MemoryMetaStore::new());
        let orders = Arc::new(MemoryOrderLookup::new());
        let sms = Arc::new(sender);
        let dispatcher = Dispatcher::new(meta.clone(), orders.clone(), sms.clone());
        let manager = PhoneManager::new(meta.clone(), dispatcher, policy);
        Self {
            meta,
            orders,
            sms,
            manager,
        }
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// An order with a USD total given in cents and one-unit line items.
#[must_use]
pub fn order(id: i64, number: &str, total_cents: i64, customer: Option<i64>, products: &[i64]) -> Order {
    Order {
        id: OrderId::new(id),
        number: number.to_owned(),
        total: Price::from_cents(total_cents, CurrencyCode::USD),
        customer: customer.map(UserId::new),
        placed_at: Utc::now(),
        items: products
            .iter()
            .map(|&product_id| LineItem {
                product_id: ProductId::new(product_id),
                quantity: 1,
            })
            .collect(),
    }
}
