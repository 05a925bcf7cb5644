//! Alert delivery.

use std::time::Duration;

use reqwest::blocking::Client;
use url::Url;

use crate::core::system_monitor::AlertPayload;
use crate::error::{HostwatchError, Result};

pub trait Notifier {
    fn notify(&self, payload: &AlertPayload) -> Result<()>;
}

/// Posts alerts as JSON to a chat webhook
pub struct WebhookNotifier {
    client: Client,
    url: Url,
}

impl WebhookNotifier {
    /// Every request is abandoned after `timeout`
    pub fn new(url: Url, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("hostwatch/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, url })
    }
}

impl Notifier for WebhookNotifier {
    fn notify(&self, payload: &AlertPayload) -> Result<()> {
        let response = self.client.post(self.url.clone()).json(payload).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(HostwatchError::notification(format!(
                "webhook returned status {}: {}",
                status,
                response.text().unwrap_or_default()
            )));
        }

        Ok(())
    }
}

/// Prints alerts to stdout instead of sending them
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, payload: &AlertPayload) -> Result<()> {
        println!("{}", payload.to_json_pretty()?);
        Ok(())
    }
}

impl<N: Notifier + ?Sized> Notifier for Box<N> {
    fn notify(&self, payload: &AlertPayload) -> Result<()> {
        (**self).notify(payload)
    }
}
