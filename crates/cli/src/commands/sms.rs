//! Twilio credential check.

use dialout_core::PhoneNumber;
use dialout_notifier::config::NotifierConfig;
use dialout_notifier::twilio::TwilioClient;

/// Send one canary message to the given number.
pub async fn run(to: &str) -> Result<(), Box<dyn std::error::Error>> {
    let config = NotifierConfig::from_env()?;
    let client = TwilioClient::new(&config.twilio);

    let response = client
        .send_message(&PhoneNumber::new(to), "Dialout test message")
        .await?;

    tracing::info!(
        sid = %response.sid,
        status = %response.status,
        "test message accepted"
    );

    Ok(())
}
