use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::json;

use super::telegram::NOTIFY_TIMEOUT;
use crate::config::WebhookSettings;
use crate::plugins::traits::{NotificationMessage, NotificationResult, NotifierPlugin, Readiness};
use crate::utils::error::Result;

/// Posts the message to a Discord-style webhook as `{"content": ...}`.
pub struct DiscordNotifier {
    client: Client,
    settings: WebhookSettings,
}

impl DiscordNotifier {
    pub fn new(settings: WebhookSettings) -> Result<Self> {
        let client = Client::builder().timeout(NOTIFY_TIMEOUT).build()?;
        Ok(Self { client, settings })
    }

    fn webhook_url(&self) -> Option<&str> {
        self.settings.webhook_url.as_deref().filter(|url| !url.is_empty())
    }

    fn create_webhook_payload(message: &NotificationMessage) -> serde_json::Value {
        json!({ "content": message.body })
    }
}

#[async_trait]
impl NotifierPlugin for DiscordNotifier {
    fn name(&self) -> &'static str {
        "Discord Notifier"
    }

    fn plugin_type(&self) -> &'static str {
        "discord"
    }

    fn description(&self) -> &'static str {
        "Sends notifications via Discord webhooks"
    }

    fn readiness(&self) -> Readiness {
        if !self.settings.enabled {
            Readiness::Disabled
        } else if self.webhook_url().is_none() {
            Readiness::Unconfigured("webhook_url missing".to_string())
        } else {
            Readiness::Ready
        }
    }

    async fn notify(&self, message: &NotificationMessage) -> Result<NotificationResult> {
        let Some(url) = self.webhook_url() else {
            return Ok(NotificationResult::failed("webhook_url missing"));
        };

        let response = self
            .client
            .post(url)
            .json(&Self::create_webhook_payload(message))
            .send()
            .await?;

        // Discord answers 204 unless ?wait=true is set
        match response.status() {
            StatusCode::OK | StatusCode::NO_CONTENT => Ok(NotificationResult::sent(None)),
            status => Ok(NotificationResult::failed(format!("Webhook returned HTTP {}", status.as_u16()))),
        }
    }
}
