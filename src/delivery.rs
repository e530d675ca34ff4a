//! Webhook delivery

use std::time::Duration;

use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, instrument, warn};

use crate::error::{NotifyError, Result};

/// How long to wait for the webhook to answer
pub const DELIVERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Sends a serialized payload to a webhook and returns the trimmed response body.
#[allow(async_fn_in_trait)]
pub trait Deliver {
    async fn deliver(&self, webhook_url: &str, payload: String) -> Result<String>;
}

/// Posts payloads over HTTP with a fixed timeout.
///
/// The HTTP client is only built on delivery, so a broken TLS backend can never
/// mask an input error.
#[derive(Debug, Clone)]
pub struct WebhookClient {
    timeout: Duration,
}

impl WebhookClient {
    pub fn new() -> Self {
        Self::with_timeout(DELIVERY_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for WebhookClient {
    fn default() -> Self {
        Self::new()
    }
}

impl Deliver for WebhookClient {
    #[instrument(skip(self, webhook_url, payload), fields(bytes = payload.len()))]
    async fn deliver(&self, webhook_url: &str, payload: String) -> Result<String> {
        debug!("Posting payload to webhook");

        let client = Client::builder().timeout(self.timeout).build()?;
        let response = client
            .post(webhook_url)
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?.trim().to_string();

        if !status.is_success() {
            warn!(%status, "Webhook rejected payload");
            return Err(NotifyError::Rejected { status, body });
        }

        debug!(%status, "Webhook accepted payload");
        Ok(body)
    }
}
