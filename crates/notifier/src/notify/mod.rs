//! Order-completion SMS dispatch.
//!
//! This module provides:
//! - [`Dispatcher`] - resolves an order's recipients and sends each one the
//!   confirmation message
//! - [`order_placed_body`] - the message body factory
//! - [`SmsSender`] - the outbound transport seam
//!
//! # Flow
//!
//! 1. The host fires its order-completion extension point
//! 2. [`crate::hooks::PhoneManager`] calls [`Dispatcher::dispatch`]
//! 3. Up to three recipients are resolved from stored metadata
//! 4. One independent send per non-empty number; failures are logged and
//!    counted, never propagated

mod dispatcher;
mod message;

pub use dispatcher::{DispatchError, DispatchReport, Dispatcher, Recipient};
pub use message::order_placed_body;

use async_trait::async_trait;
use thiserror::Error;

use dialout_core::PhoneNumber;

/// Error returned by an SMS transport.
///
/// Transport-neutral on purpose: the dispatcher treats an invalid number,
/// an auth failure, and a network fault identically (log and move on).
#[derive(Debug, Error)]
#[error("sms send failed: {0}")]
pub struct SendError(String);

impl SendError {
    /// Wrap a transport error.
    pub fn new(source: impl std::fmt::Display) -> Self {
        Self(source.to_string())
    }
}

/// Outbound SMS transport.
#[async_trait]
pub trait SmsSender: Send + Sync {
    /// Send one message to one destination number.
    async fn send(&self, to: &PhoneNumber, body: &str) -> Result<(), SendError>;
}
