//! Recipient resolution and send fan-out for completed orders.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, error, instrument};

use dialout_core::{OrderId, PhoneNumber};

use super::message::order_placed_body;
use super::{SendError, SmsSender};
use crate::orders::{LookupError, OrderLookup};
use crate::store::{MetadataStore, StoreError, keys};

/// Which stored phone a send was addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipient {
    /// The purchasing account's stored number.
    Account,
    /// The first order line item whose listing has a stored number.
    Listing,
    /// The guest number entered at checkout.
    Guest,
}

impl Recipient {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Account => "account",
            Self::Listing => "listing",
            Self::Guest => "guest",
        }
    }
}

impl std::fmt::Display for Recipient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of one dispatch run.
#[derive(Debug, Clone, Copy)]
pub struct DispatchReport {
    /// The order that was dispatched.
    pub order: OrderId,
    /// Recipients with a non-empty stored number.
    pub attempted: usize,
    /// Sends the transport accepted.
    pub sent: usize,
    /// Sends the transport rejected (logged, not propagated).
    pub failed: usize,
}

/// Errors that abort a dispatch before any send happens.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The completion event named an order the lookup cannot resolve.
    #[error("order {0} not found")]
    OrderNotFound(OrderId),

    /// Metadata read failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Order lookup failed.
    #[error(transparent)]
    Lookup(#[from] LookupError),
}

/// Sends order confirmations to up to three recipients.
///
/// The dispatcher is stateless across invocations and keeps no record of
/// orders it has already handled: calling [`Dispatcher::dispatch`] twice for
/// the same order sends every message twice. Once-per-order semantics live
/// in [`crate::hooks::PhoneManager`], behind an explicit policy.
pub struct Dispatcher {
    meta: Arc<dyn MetadataStore>,
    orders: Arc<dyn OrderLookup>,
    sms: Arc<dyn SmsSender>,
}

impl Dispatcher {
    /// Create a dispatcher over the three collaborators.
    #[must_use]
    pub fn new(
        meta: Arc<dyn MetadataStore>,
        orders: Arc<dyn OrderLookup>,
        sms: Arc<dyn SmsSender>,
    ) -> Self {
        Self { meta, orders, sms }
    }

    /// Resolve recipients for a completed order and send each the
    /// confirmation message.
    ///
    /// Recipients with no stored number are skipped silently - absence is
    /// normal, not an error. Send failures are captured per recipient and
    /// the remaining sends still run.
    ///
    /// # Errors
    ///
    /// Returns an error if the order cannot be resolved or a metadata read
    /// fails. Transport failures are reported in the [`DispatchReport`],
    /// not as errors.
    #[instrument(skip(self), fields(order = %order_id))]
    pub async fn dispatch(&self, order_id: OrderId) -> Result<DispatchReport, DispatchError> {
        let order = self
            .orders
            .order(order_id)
            .await?
            .ok_or(DispatchError::OrderNotFound(order_id))?;

        let account = match order.customer {
            Some(user) => self.meta.user_meta(user, keys::USER_PHONE).await?,
            None => None,
        };

        // First line item with a stored phone wins; later listings in the
        // same order are not notified.
        let mut listing = None;
        for item in &order.items {
            let phone = self
                .meta
                .product_meta(item.product_id, keys::PRODUCT_PHONE)
                .await?;
            if let Some(phone) = phone.filter(|p| !p.is_empty()) {
                listing = Some(phone);
                break;
            }
        }

        let guest = self.meta.order_meta(order_id, keys::ORDER_GUEST_PHONE).await?;

        let body = order_placed_body(&order.number, &order.total);

        let candidates = [
            (Recipient::Account, account),
            (Recipient::Listing, listing),
            (Recipient::Guest, guest),
        ];

        let mut report = DispatchReport {
            order: order_id,
            attempted: 0,
            sent: 0,
            failed: 0,
        };

        for (recipient, phone) in candidates {
            let Some(phone) = phone.filter(|p| !p.is_empty()) else {
                continue;
            };
            let to = PhoneNumber::new(phone);
            report.attempted += 1;

            match self.sms.send(&to, &body).await {
                Ok(()) => {
                    report.sent += 1;
                    debug!(
                        recipient = %recipient,
                        to = %to.masked(),
                        "order notification sent"
                    );
                }
                Err(e) => {
                    report.failed += 1;
                    log_send_failure(recipient, &to, &e);
                }
            }
        }

        Ok(report)
    }
}

fn log_send_failure(recipient: Recipient, to: &PhoneNumber, error: &SendError) {
    error!(
        recipient = %recipient,
        to = %to.masked(),
        error = %error,
        "order notification failed"
    );
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::Utc;

    use dialout_core::{CurrencyCode, Price, ProductId, UserId};

    use super::*;
    use crate::orders::{LineItem, MemoryOrderLookup, Order};
    use crate::store::MemoryMetaStore;

    /// Records every send; numbers in `fail` are rejected.
    #[derive(Default)]
    struct RecordingSender {
        sent: Mutex<Vec<(String, String)>>,
        fail: HashSet<String>,
    }

    impl RecordingSender {
        fn sent(&self) -> Vec<(String, String)> {
            self.sent.lock().expect("lock poisoned").clone()
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

    fn order_1001(customer: Option<UserId>, product_ids: &[i64]) -> Order {
        Order {
            id: OrderId::new(1001),
            number: "1001".to_string(),
            total: Price::from_cents(4250, CurrencyCode::USD),
            customer,
            placed_at: Utc::now(),
            items: product_ids
                .iter()
                .map(|&id| LineItem {
                    product_id: ProductId::new(id),
                    quantity: 1,
                })
                .collect(),
        }
    }

    struct Fixture {
        meta: Arc<MemoryMetaStore>,
        orders: Arc<MemoryOrderLookup>,
        sms: Arc<RecordingSender>,
        dispatcher: Dispatcher,
    }

    fn fixture() -> Fixture {
        fixture_with_failures(&[])
    }

    fn fixture_with_failures(fail: &[&str]) -> Fixture {
        let meta = Arc::new(MemoryMetaStore::new());
        let orders = Arc::new(MemoryOrderLookup::new());
        let sms = Arc::new(RecordingSender {
            sent: Mutex::new(Vec::new()),
            fail: fail.iter().map(|&s| s.to_owned()).collect(),
        });
        let dispatcher = Dispatcher::new(meta.clone(), orders.clone(), sms.clone());
        Fixture {
            meta,
            orders,
            sms,
            dispatcher,
        }
    }

    #[tokio::test]
    async fn test_no_phones_no_sends() {
        let fx = fixture();
        fx.orders
            .insert(order_1001(Some(UserId::new(1)), &[10, 11]))
            .await;

        let report = fx.dispatcher.dispatch(OrderId::new(1001)).await.unwrap();

        assert_eq!(report.attempted, 0);
        assert!(fx.sms.sent().is_empty());
    }

    #[tokio::test]
    async fn test_single_source_single_send_exact_body() {
        let fx = fixture();
        fx.orders
            .insert(order_1001(Some(UserId::new(1)), &[10]))
            .await;
        fx.meta
            .set_user_meta(UserId::new(1), keys::USER_PHONE, "+15550100199")
            .await
            .unwrap();

        let report = fx.dispatcher.dispatch(OrderId::new(1001)).await.unwrap();

        assert_eq!(report.attempted, 1);
        assert_eq!(report.sent, 1);
        assert_eq!(
            fx.sms.sent(),
            vec![(
                "+15550100199".to_string(),
                "Order #1001 has been placed.\nTotal: $42.50".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn test_guest_only_send() {
        let fx = fixture();
        fx.orders.insert(order_1001(None, &[10])).await;
        fx.meta
            .set_order_meta(OrderId::new(1001), keys::ORDER_GUEST_PHONE, "+15550100300")
            .await
            .unwrap();

        let report = fx.dispatcher.dispatch(OrderId::new(1001)).await.unwrap();

        assert_eq!(report.sent, 1);
        assert_eq!(fx.sms.sent()[0].0, "+15550100300");
    }

    #[tokio::test]
    async fn test_first_listing_with_phone_wins() {
        let fx = fixture();
        fx.orders.insert(order_1001(None, &[10, 11])).await;
        fx.meta
            .set_product_meta(ProductId::new(10), keys::PRODUCT_PHONE, "+15550100201")
            .await
            .unwrap();
        fx.meta
            .set_product_meta(ProductId::new(11), keys::PRODUCT_PHONE, "+15550100202")
            .await
            .unwrap();

        fx.dispatcher.dispatch(OrderId::new(1001)).await.unwrap();

        let sent = fx.sms.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "+15550100201");
    }

    #[tokio::test]
    async fn test_empty_listing_phone_skipped_for_next_item() {
        let fx = fixture();
        fx.orders.insert(order_1001(None, &[10, 11])).await;
        // First listing cleared its number; the second still has one.
        fx.meta
            .set_product_meta(ProductId::new(10), keys::PRODUCT_PHONE, "")
            .await
            .unwrap();
        fx.meta
            .set_product_meta(ProductId::new(11), keys::PRODUCT_PHONE, "+15550100202")
            .await
            .unwrap();

        fx.dispatcher.dispatch(OrderId::new(1001)).await.unwrap();

        let sent = fx.sms.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "+15550100202");
    }

    #[tokio::test]
    async fn test_all_three_sources_three_sends() {
        let fx = fixture();
        fx.orders
            .insert(order_1001(Some(UserId::new(1)), &[10]))
            .await;
        fx.meta
            .set_user_meta(UserId::new(1), keys::USER_PHONE, "+15550100101")
            .await
            .unwrap();
        fx.meta
            .set_product_meta(ProductId::new(10), keys::PRODUCT_PHONE, "+15550100201")
            .await
            .unwrap();
        fx.meta
            .set_order_meta(OrderId::new(1001), keys::ORDER_GUEST_PHONE, "+15550100301")
            .await
            .unwrap();

        let report = fx.dispatcher.dispatch(OrderId::new(1001)).await.unwrap();

        assert_eq!(report.attempted, 3);
        assert_eq!(report.sent, 3);
        let numbers: Vec<String> = fx.sms.sent().into_iter().map(|(to, _)| to).collect();
        assert_eq!(
            numbers,
            vec!["+15550100101", "+15550100201", "+15550100301"]
        );
    }

    #[tokio::test]
    async fn test_double_dispatch_sends_six() {
        let fx = fixture();
        fx.orders
            .insert(order_1001(Some(UserId::new(1)), &[10]))
            .await;
        fx.meta
            .set_user_meta(UserId::new(1), keys::USER_PHONE, "+15550100101")
            .await
            .unwrap();
        fx.meta
            .set_product_meta(ProductId::new(10), keys::PRODUCT_PHONE, "+15550100201")
            .await
            .unwrap();
        fx.meta
            .set_order_meta(OrderId::new(1001), keys::ORDER_GUEST_PHONE, "+15550100301")
            .await
            .unwrap();

        fx.dispatcher.dispatch(OrderId::new(1001)).await.unwrap();
        fx.dispatcher.dispatch(OrderId::new(1001)).await.unwrap();

        // The dispatcher itself holds no dedupe state: a repeated completion
        // event repeats every send.
        assert_eq!(fx.sms.sent().len(), 6);
    }

    #[tokio::test]
    async fn test_one_failure_does_not_block_remaining_sends() {
        let fx = fixture_with_failures(&["+15550100101"]);
        fx.orders
            .insert(order_1001(Some(UserId::new(1)), &[10]))
            .await;
        fx.meta
            .set_user_meta(UserId::new(1), keys::USER_PHONE, "+15550100101")
            .await
            .unwrap();
        fx.meta
            .set_order_meta(OrderId::new(1001), keys::ORDER_GUEST_PHONE, "+15550100301")
            .await
            .unwrap();

        let report = fx.dispatcher.dispatch(OrderId::new(1001)).await.unwrap();

        assert_eq!(report.attempted, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(report.sent, 1);
        assert_eq!(fx.sms.sent()[0].0, "+15550100301");
    }

    #[tokio::test]
    async fn test_unknown_order_is_an_error() {
        let fx = fixture();

        let result = fx.dispatcher.dispatch(OrderId::new(404)).await;

        assert!(matches!(result, Err(DispatchError::OrderNotFound(_))));
        assert!(fx.sms.sent().is_empty());
    }
}
