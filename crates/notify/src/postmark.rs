//! Postmark HTTP delivery channel.

use std::time::Duration;

use crewmarket_accounts::EmailAddress;

use crate::channel::{DeliveryChannel, DeliveryError};
use crate::message::EmailMessage;

const POSTMARK_URL: &str = "https://api.postmarkapp.com/email";

/// Transport-level request timeout, inside the dispatcher's own bound.
const DELIVERY_TIMEOUT: Duration = Duration::from_secs(4);

/// Delivery via the Postmark transactional email API.
pub struct PostmarkChannel {
    server_token: String,
    from: EmailAddress,
}

impl PostmarkChannel {
    pub fn new(server_token: impl Into<String>, from: EmailAddress) -> Self {
        Self {
            server_token: server_token.into(),
            from,
        }
    }
}

impl DeliveryChannel for PostmarkChannel {
    fn deliver(&self, message: &EmailMessage) -> Result<(), DeliveryError> {
        // The dispatcher calls this on a dedicated delivery thread, which is
        // where a blocking HTTP client is allowed to live.
        let client = reqwest::blocking::Client::builder()
            .timeout(DELIVERY_TIMEOUT)
            .build()
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        let response = client
            .post(POSTMARK_URL)
            .header("X-Postmark-Server-Token", &self.server_token)
            .json(&serde_json::json!({
                "From": self.from.as_str(),
                "To": message.to.as_str(),
                "Subject": message.subject,
                "TextBody": message.body,
                "MessageStream": "outbound",
            }))
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    DeliveryError::Timeout
                } else {
                    DeliveryError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let detail = response.text().unwrap_or_default();
            Err(DeliveryError::Rejected(format!("{status}: {detail}")))
        }
    }
}
