//! Twilio Messages API payload types.
//!
//! Only the response fields this crate reads are modeled; Twilio returns
//! many more.

use serde::Deserialize;

/// Subset of the message resource returned by a successful create.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
    /// Message SID (`SM...`).
    pub sid: String,
    /// Delivery status at creation time (usually `queued`).
    pub status: String,
    /// Error code, populated when delivery already failed.
    #[serde(default)]
    pub error_code: Option<i64>,
    /// Error message, populated when delivery already failed.
    #[serde(default)]
    pub error_message: Option<String>,
}

/// Error body returned with non-2xx statuses.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorResponse {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
}
