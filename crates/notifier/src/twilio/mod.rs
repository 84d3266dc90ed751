//! Twilio Messaging API integration.
//!
//! This module provides:
//! - [`TwilioClient`] for sending SMS messages
//! - Response types for the Messages endpoint
//!
//! The client speaks the `2010-04-01` Messages API: one form-encoded POST
//! per message, authenticated with the account SID and auth token.

mod client;
mod error;
mod types;

pub use client::TwilioClient;
pub use error::TwilioError;
pub use types::MessageResponse;
