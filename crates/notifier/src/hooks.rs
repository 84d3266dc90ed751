//! Callback implementations for the host platform's extension points.
//!
//! The host exposes named lifecycle events and invokes registered callbacks
//! synchronously at each one. [`LifecycleHooks`] is the contract between the
//! host adapter and this crate; [`PhoneManager`] is the implementation. The
//! registrations mirror the events the host fires:
//!
//! | Host event | Callback |
//! |---|---|
//! | profile view/edit screen | [`LifecycleHooks::profile_fields`] |
//! | profile update | [`LifecycleHooks::save_profile_fields`] |
//! | product edit form | [`LifecycleHooks::product_fields`] |
//! | product save | [`LifecycleHooks::save_product_fields`] |
//! | checkout form | [`LifecycleHooks::checkout_fields`] |
//! | checkout order creation | [`LifecycleHooks::save_checkout_fields`] |
//! | admin order screen | [`LifecycleHooks::order_billing_panel`] |
//! | order thank-you page | [`LifecycleHooks::order_placed`] |
//!
//! The host owns authorization: it must check that the acting user may edit
//! a profile before invoking the save callback.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info, warn};

use dialout_core::{OrderId, ProductId, UserId};

use crate::forms::{FieldSpec, FormData, sanitize_text};
use crate::notify::{DispatchError, Dispatcher};
use crate::store::{MetadataStore, StoreError, keys};

/// Dispatch policy for repeated order-completion events.
///
/// The thank-you event can fire more than once for one order (redirect
/// retries, page reloads).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NotifyPolicy {
    /// Dispatch on every completion event, duplicates included.
    #[default]
    EveryEvent,
    /// Dispatch at most once per order, tracked by a durable order-meta
    /// marker.
    OncePerOrder,
}

impl NotifyPolicy {
    /// Map the `DIALOUT_NOTIFY_ONCE` configuration flag to a policy.
    #[must_use]
    pub const fn from_notify_once(notify_once: bool) -> Self {
        if notify_once {
            Self::OncePerOrder
        } else {
            Self::EveryEvent
        }
    }
}

/// Errors surfaced to the host adapter from hook callbacks.
#[derive(Debug, Error)]
pub enum HookError {
    /// Metadata read or write failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Notification dispatch failed before any send.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

/// The lifecycle callbacks this crate registers with the host.
#[async_trait]
pub trait LifecycleHooks: Send + Sync {
    /// Fields for the account profile screen, prefilled with stored values.
    async fn profile_fields(&self, user: UserId) -> Result<Vec<FieldSpec>, HookError>;

    /// Persist the account phone from a profile submission.
    async fn save_profile_fields(&self, user: UserId, form: &FormData) -> Result<(), HookError>;

    /// Fields for the product edit form.
    async fn product_fields(&self, product: ProductId) -> Result<Vec<FieldSpec>, HookError>;

    /// Persist the seller phone from a product save.
    async fn save_product_fields(
        &self,
        product: ProductId,
        form: &FormData,
    ) -> Result<(), HookError>;

    /// Fields for the checkout form. `draft` carries previously submitted
    /// values for redisplay after a failed validation round-trip.
    fn checkout_fields(&self, draft: &FormData) -> Vec<FieldSpec>;

    /// Persist the guest phone against the newly created order.
    async fn save_checkout_fields(
        &self,
        order: OrderId,
        form: &FormData,
    ) -> Result<(), HookError>;

    /// Admin order-screen snippet showing the guest phone, if one was
    /// entered.
    async fn order_billing_panel(&self, order: OrderId) -> Result<Option<String>, HookError>;

    /// The order thank-you event: dispatch SMS confirmations.
    async fn order_placed(&self, order: OrderId) -> Result<(), HookError>;
}

/// The phone-field and notification callbacks, wired over the metadata
/// store and dispatcher.
pub struct PhoneManager {
    meta: Arc<dyn MetadataStore>,
    dispatcher: Dispatcher,
    policy: NotifyPolicy,
}

impl PhoneManager {
    /// Create the callback set.
    #[must_use]
    pub fn new(meta: Arc<dyn MetadataStore>, dispatcher: Dispatcher, policy: NotifyPolicy) -> Self {
        Self {
            meta,
            dispatcher,
            policy,
        }
    }

    async fn already_notified(&self, order: OrderId) -> Result<bool, StoreError> {
        let marker = self.meta.order_meta(order, keys::ORDER_NOTIFIED).await?;
        Ok(marker.is_some_and(|m| !m.is_empty()))
    }
}

#[async_trait]
impl LifecycleHooks for PhoneManager {
    async fn profile_fields(&self, user: UserId) -> Result<Vec<FieldSpec>, HookError> {
        let value = self
            .meta
            .user_meta(user, keys::USER_PHONE)
            .await?
            .unwrap_or_default();

        Ok(vec![FieldSpec {
            id: keys::USER_PHONE,
            label: "Twilio Phone No.",
            value,
            placeholder: None,
            description: None,
        }])
    }

    async fn save_profile_fields(&self, user: UserId, form: &FormData) -> Result<(), HookError> {
        // Present-but-empty clears the stored number; an absent field leaves
        // it untouched.
        if let Some(raw) = form.get(keys::USER_PHONE) {
            self.meta
                .set_user_meta(user, keys::USER_PHONE, &sanitize_text(raw))
                .await?;
        }
        Ok(())
    }

    async fn product_fields(&self, product: ProductId) -> Result<Vec<FieldSpec>, HookError> {
        let value = self
            .meta
            .product_meta(product, keys::PRODUCT_PHONE)
            .await?
            .unwrap_or_default();

        Ok(vec![FieldSpec {
            id: keys::PRODUCT_PHONE,
            label: "Seller Twilio Phone No.",
            value,
            placeholder: None,
            description: Some("Enter the Twilio phone number for the seller."),
        }])
    }

    async fn save_product_fields(
        &self,
        product: ProductId,
        form: &FormData,
    ) -> Result<(), HookError> {
        // The product form always saves: a missing field stores the empty
        // string.
        let value = form
            .get(keys::PRODUCT_PHONE)
            .map(sanitize_text)
            .unwrap_or_default();
        self.meta
            .set_product_meta(product, keys::PRODUCT_PHONE, &value)
            .await?;
        Ok(())
    }

    fn checkout_fields(&self, draft: &FormData) -> Vec<FieldSpec> {
        vec![FieldSpec {
            id: keys::ORDER_GUEST_PHONE,
            label: "Guest Twilio Phone No.",
            value: draft
                .get(keys::ORDER_GUEST_PHONE)
                .unwrap_or_default()
                .to_string(),
            placeholder: Some("Enter your Twilio phone number"),
            description: None,
        }]
    }

    async fn save_checkout_fields(
        &self,
        order: OrderId,
        form: &FormData,
    ) -> Result<(), HookError> {
        if let Some(raw) = form.get(keys::ORDER_GUEST_PHONE) {
            self.meta
                .set_order_meta(order, keys::ORDER_GUEST_PHONE, &sanitize_text(raw))
                .await?;
        }
        Ok(())
    }

    async fn order_billing_panel(&self, order: OrderId) -> Result<Option<String>, HookError> {
        let phone = self.meta.order_meta(order, keys::ORDER_GUEST_PHONE).await?;
        Ok(phone
            .filter(|p| !p.is_empty())
            .map(|p| format!("Guest Twilio Phone No: {p}")))
    }

    async fn order_placed(&self, order: OrderId) -> Result<(), HookError> {
        if self.policy == NotifyPolicy::OncePerOrder && self.already_notified(order).await? {
            debug!(order = %order, "order already notified, skipping dispatch");
            return Ok(());
        }

        let report = match self.dispatcher.dispatch(order).await {
            Ok(report) => report,
            Err(DispatchError::OrderNotFound(id)) => {
                // The thank-you page can fire with an id the shop no longer
                // resolves; the shopper must never see an error for it.
                warn!(order = %id, "completion event for unknown order");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        info!(
            order = %order,
            attempted = report.attempted,
            sent = report.sent,
            failed = report.failed,
            "order notification dispatch finished"
        );

        if self.policy == NotifyPolicy::OncePerOrder {
            self.meta
                .set_order_meta(order, keys::ORDER_NOTIFIED, "1")
                .await?;
        }

        Ok(())
    }
}
