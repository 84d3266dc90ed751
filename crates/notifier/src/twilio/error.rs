//! Twilio-related errors.

use thiserror::Error;

/// Errors that can occur when interacting with Twilio.
#[derive(Debug, Error)]
pub enum TwilioError {
    /// HTTP request failed.
    #[error("Twilio request failed: {0}")]
    Request(String),

    /// Failed to parse response.
    #[error("Twilio response error: {0}")]
    Response(String),

    /// Twilio API returned an error.
    #[error("Twilio API error {code}: {message}")]
    Api {
        /// Twilio error code (e.g. 21211 for an invalid 'To' number).
        code: i64,
        /// Human-readable message from the API.
        message: String,
    },
}
