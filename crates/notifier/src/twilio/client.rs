//! Twilio Messages API client.
//!
//! Sends SMS messages through the account's Messages endpoint. One request
//! per message; delivery is fire-and-forget from the caller's perspective.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, error, instrument};

use dialout_core::PhoneNumber;

use super::error::TwilioError;
use super::types::{ApiErrorResponse, MessageResponse};
use crate::config::TwilioConfig;
use crate::notify::{SendError, SmsSender};

/// Twilio REST API base URL.
const TWILIO_API_BASE: &str = "https://api.twilio.com/2010-04-01";

/// Twilio API client for sending SMS messages.
#[derive(Clone)]
pub struct TwilioClient {
    /// HTTP client.
    client: Client,
    /// Account SID, also the basic-auth username.
    account_sid: String,
    /// Auth token, the basic-auth password.
    auth_token: SecretString,
    /// Sender number used for every outbound message.
    from_number: PhoneNumber,
}

impl std::fmt::Debug for TwilioClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwilioClient")
            .field("account_sid", &self.account_sid)
            .field("auth_token", &"[REDACTED]")
            .field("from_number", &self.from_number)
            .finish_non_exhaustive()
    }
}

impl TwilioClient {
    /// Create a new Twilio client.
    #[must_use]
    pub fn new(config: &TwilioConfig) -> Self {
        Self {
            client: Client::new(),
            account_sid: config.account_sid.clone(),
            auth_token: config.auth_token.clone(),
            from_number: config.from_number.clone(),
        }
    }

    /// The configured sender number.
    #[must_use]
    pub const fn from_number(&self) -> &PhoneNumber {
        &self.from_number
    }

    /// Send one SMS message.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails, the response cannot be parsed,
    /// or Twilio rejects the message.
    #[instrument(skip(self, body), fields(to = %to.masked()))]
    pub async fn send_message(
        &self,
        to: &PhoneNumber,
        body: &str,
    ) -> Result<MessageResponse, TwilioError> {
        let url = format!(
            "{TWILIO_API_BASE}/Accounts/{}/Messages.json",
            self.account_sid
        );
        let params = [
            ("To", to.as_str()),
            ("From", self.from_number.as_str()),
            ("Body", body),
        ];

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.account_sid, Some(self.auth_token.expose_secret()))
            .form(&params)
            .send()
            .await
            .map_err(|e| TwilioError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let api_error: ApiErrorResponse = response
                .json()
                .await
                .map_err(|e| TwilioError::Response(e.to_string()))?;

            error!(
                code = api_error.code,
                status = status.as_u16(),
                "Twilio API error sending message"
            );
            return Err(TwilioError::Api {
                code: api_error.code,
                message: api_error.message,
            });
        }

        let result: MessageResponse = response
            .json()
            .await
            .map_err(|e| TwilioError::Response(e.to_string()))?;

        debug!(
            sid = %result.sid,
            status = %result.status,
            "message accepted by Twilio"
        );

        Ok(result)
    }
}

#[async_trait]
impl SmsSender for TwilioClient {
    async fn send(&self, to: &PhoneNumber, body: &str) -> Result<(), SendError> {
        self.send_message(to, body)
            .await
            .map(drop)
            .map_err(SendError::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> TwilioConfig {
        TwilioConfig {
            account_sid: "AC32a3c49700934481addd5ce1659f04d2".to_string(),
            auth_token: SecretString::from("test-auth-token-value"),
            from_number: PhoneNumber::new("+15550100100"),
        }
    }

    #[test]
    fn test_debug_redacts_auth_token() {
        let client = TwilioClient::new(&test_config());
        let debug_output = format!("{client:?}");

        assert!(debug_output.contains("AC32a3c49700934481addd5ce1659f04d2"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("test-auth-token-value"));
    }

    #[test]
    fn test_from_number() {
        let client = TwilioClient::new(&test_config());
        assert_eq!(client.from_number().as_str(), "+15550100100");
    }
}
