pub mod config;
pub mod delivery;
pub mod error;
pub mod logging;
pub mod message;
pub mod payload;

use tracing::info;

use config::NotificationContext;
use delivery::Deliver;
use error::Result;

/// What a successful run produced, to be printed on stdout.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Trimmed response body from the webhook
    Delivered(String),
    /// Serialized payload that would have been sent
    DryRun(String),
}

impl Outcome {
    pub fn output(&self) -> &str {
        match self {
            Outcome::Delivered(body) | Outcome::DryRun(body) => body,
        }
    }
}

/// Resolve inputs through `lookup`, build the message and hand it to `deliverer`.
/// Nothing is sent unless every input validates and the payload serializes.
pub async fn run<F, D>(lookup: F, deliverer: &D) -> Result<Outcome>
where
    F: Fn(&str) -> Option<String>,
    D: Deliver,
{
    let context = NotificationContext::resolve(lookup)?;
    let payload = payload::build_message(&context)?.to_json()?;

    if context.dry_run {
        info!("Dry run, payload not sent");
        return Ok(Outcome::DryRun(payload));
    }

    let body = deliverer.deliver(&context.webhook_url, payload).await?;
    info!(status = %context.status, repo = %context.repo, "Notification delivered");
    Ok(Outcome::Delivered(body))
}
