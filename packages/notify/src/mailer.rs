// ABOUTME: Mailer client posting JSON to a transactional mail API
// ABOUTME: Delivery failures are logged, never propagated to the caller

use serde::Serialize;
use tracing::{debug, error, info};

#[derive(Debug, Clone)]
pub struct MailerConfig {
    /// Mail API endpoint. None disables delivery.
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub from: String,
}

impl MailerConfig {
    pub fn disabled(from: impl Into<String>) -> Self {
        Self {
            api_url: None,
            api_key: None,
            from: from.into(),
        }
    }
}

#[derive(Serialize)]
struct OutboundMessage<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

/// Cheap to clone; handlers fire sends without awaiting delivery results.
#[derive(Clone)]
pub struct Mailer {
    client: reqwest::Client,
    config: MailerConfig,
}

impl Mailer {
    pub fn new(config: MailerConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Send a message, best effort. Without an API URL the message body is
    /// logged so local setups still surface OTP codes.
    pub async fn send(&self, to: &str, subject: &str, body: &str) {
        let Some(api_url) = &self.config.api_url else {
            info!("Mail (not sent) to {}: {} / {}", to, subject, body);
            return;
        };

        let message = OutboundMessage {
            from: &self.config.from,
            to,
            subject,
            text: body,
        };

        let mut request = self.client.post(api_url).json(&message);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        match request.send().await {
            Ok(response) if response.status().is_success() => {
                debug!("Mail sent to {}: {}", to, subject);
            }
            Ok(response) => {
                error!("Mail API returned {} for {}", response.status(), to);
            }
            Err(err) => {
                error!("Mail delivery to {} failed: {}", to, err);
            }
        }
    }
}
