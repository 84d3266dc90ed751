//! Manual notification dispatch.
//!
//! Replays the order-completion event outside the host lifecycle, for
//! support cases where the thank-you event was missed. The configured
//! notify policy applies: with `DIALOUT_NOTIFY_ONCE=true`, an order whose
//! sent marker is already set is skipped.
//!
//! `--dry-run` swaps Twilio for a logging sender and ignores the sent
//! marker, so recipients can be checked without texting anyone or touching
//! order metadata.

use std::sync::Arc;

use async_trait::async_trait;

use dialout_core::{OrderId, PhoneNumber};
use dialout_notifier::config::NotifierConfig;
use dialout_notifier::hooks::{LifecycleHooks, NotifyPolicy, PhoneManager};
use dialout_notifier::notify::{Dispatcher, SendError, SmsSender};
use dialout_notifier::orders::PgOrderLookup;
use dialout_notifier::store::{PgMetaStore, create_pool};
use dialout_notifier::twilio::TwilioClient;

/// Sender that logs each would-be message instead of calling Twilio.
struct LoggingSender;

#[async_trait]
impl SmsSender for LoggingSender {
    async fn send(&self, to: &PhoneNumber, body: &str) -> Result<(), SendError> {
        tracing::info!(to = %to.masked(), body_chars = body.chars().count(), "dry-run send");
        Ok(())
    }
}

/// Dispatch confirmations for one order.
pub async fn run(order_id: i64, dry_run: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = NotifierConfig::from_env()?;
    let pool = create_pool(&config.database_url).await?;

    let meta = Arc::new(PgMetaStore::new(pool.clone()));
    let orders = Arc::new(PgOrderLookup::new(pool));

    let (sms, policy): (Arc<dyn SmsSender>, NotifyPolicy) = if dry_run {
        // Dry runs never consult or set the sent marker.
        (Arc::new(LoggingSender), NotifyPolicy::EveryEvent)
    } else {
        (
            Arc::new(TwilioClient::new(&config.twilio)),
            NotifyPolicy::from_notify_once(config.notify_once),
        )
    };

    let dispatcher = Dispatcher::new(meta.clone(), orders, sms);
    let manager = PhoneManager::new(meta, dispatcher, policy);

    manager.order_placed(OrderId::new(order_id)).await?;
    tracing::info!(order = order_id, "dispatch complete");

    Ok(())
}
