//! Notifier configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `DIALOUT_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   `DATABASE_URL`)
//! - `TWILIO_ACCOUNT_SID` - Twilio account SID
//! - `TWILIO_AUTH_TOKEN` - Twilio auth token
//! - `TWILIO_FROM_NUMBER` - Sender phone number for all notifications
//!
//! ## Optional
//! - `DIALOUT_NOTIFY_ONCE` - When `true`, an order is notified at most once
//!   even if its completion event fires repeatedly (default: `false`)
//!
//! Credentials are validated against a placeholder blocklist so that
//! copy-pasted sample values (`your_twilio_account_sid` and friends) fail at
//! startup instead of at the first send.

use secrecy::SecretString;
use thiserror::Error;

use dialout_core::PhoneNumber;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "your_",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "insert",
    "enter-",
    "enter_",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Notifier application configuration.
#[derive(Debug, Clone)]
pub struct NotifierConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// Twilio Messaging API configuration
    pub twilio: TwilioConfig,
    /// Notify each order at most once, even on repeated completion events
    pub notify_once: bool,
}

/// Twilio Messaging API configuration.
///
/// Implements `Debug` manually to redact the auth token.
#[derive(Clone)]
pub struct TwilioConfig {
    /// Account SID (public identifier, appears in request URLs)
    pub account_sid: String,
    /// Auth token (basic-auth password, server-side only)
    pub auth_token: SecretString,
    /// Sender phone number for all outbound messages
    pub from_number: PhoneNumber,
}

impl std::fmt::Debug for TwilioConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwilioConfig")
            .field("account_sid", &self.account_sid)
            .field("auth_token", &"[REDACTED]")
            .field("from_number", &self.from_number)
            .finish()
    }
}

impl NotifierConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if credentials look like unreplaced placeholders.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = database_url_from_env()?;
        let twilio = TwilioConfig::from_env()?;
        let notify_once = get_env_or_default("DIALOUT_NOTIFY_ONCE", "false")
            .parse::<bool>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("DIALOUT_NOTIFY_ONCE".to_string(), e.to_string())
            })?;

        Ok(Self {
            database_url,
            twilio,
            notify_once,
        })
    }
}

impl TwilioConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let account_sid = get_required_env("TWILIO_ACCOUNT_SID")?;
        validate_not_placeholder(&account_sid, "TWILIO_ACCOUNT_SID")?;

        let auth_token = get_required_env("TWILIO_AUTH_TOKEN")?;
        validate_not_placeholder(&auth_token, "TWILIO_AUTH_TOKEN")?;

        let from_number = get_required_env("TWILIO_FROM_NUMBER")?;
        validate_not_placeholder(&from_number, "TWILIO_FROM_NUMBER")?;

        Ok(Self {
            account_sid,
            auth_token: SecretString::from(auth_token),
            from_number: PhoneNumber::new(from_number),
        })
    }
}

/// Load only the database URL, for commands that never touch Twilio
/// (e.g. migrations).
///
/// # Errors
///
/// Returns `ConfigError::MissingEnvVar` if neither `DIALOUT_DATABASE_URL`
/// nor `DATABASE_URL` is set.
pub fn database_url_from_env() -> Result<SecretString, ConfigError> {
    // Load .env file if present (ignore errors if not found)
    let _ = dotenvy::dotenv();

    get_database_url("DIALOUT_DATABASE_URL")
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Reject values that look like unreplaced sample credentials.
fn validate_not_placeholder(value: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = value.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    Ok(())
}
