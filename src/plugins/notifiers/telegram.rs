use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::json;
use std::time::Duration;

use crate::config::{ChatId, TelegramSettings};
use crate::plugins::traits::{NotificationMessage, NotificationResult, NotifierPlugin, Readiness};
use crate::utils::error::Result;

pub const NOTIFY_TIMEOUT: Duration = Duration::from_secs(10);

pub struct TelegramNotifier {
    client: Client,
    settings: TelegramSettings,
}

impl TelegramNotifier {
    pub fn new(settings: TelegramSettings) -> Result<Self> {
        let client = Client::builder().timeout(NOTIFY_TIMEOUT).build()?;
        Ok(Self { client, settings })
    }

    fn credentials(&self) -> Option<(&str, &ChatId)> {
        let token = self.settings.bot_token.as_deref().filter(|t| !t.is_empty())?;
        let chat_id = self.settings.chat_id.as_ref()?;
        Some((token, chat_id))
    }

    fn endpoint(&self, token: &str) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.settings.api_base.trim_end_matches('/'),
            token
        )
    }

    fn create_payload(chat_id: &ChatId, message: &NotificationMessage) -> serde_json::Value {
        json!({
            "chat_id": chat_id,
            "text": message.body,
            "parse_mode": "Markdown",
            "disable_web_page_preview": false
        })
    }
}

#[async_trait]
impl NotifierPlugin for TelegramNotifier {
    fn name(&self) -> &'static str {
        "Telegram Notifier"
    }

    fn plugin_type(&self) -> &'static str {
        "telegram"
    }

    fn description(&self) -> &'static str {
        "Sends Markdown messages through the Telegram Bot API"
    }

    fn readiness(&self) -> Readiness {
        if !self.settings.enabled {
            Readiness::Disabled
        } else if self.credentials().is_none() {
            Readiness::Unconfigured("bot_token or chat_id missing".to_string())
        } else {
            Readiness::Ready
        }
    }

    async fn notify(&self, message: &NotificationMessage) -> Result<NotificationResult> {
        let Some((token, chat_id)) = self.credentials() else {
            return Ok(NotificationResult::failed("bot_token or chat_id missing"));
        };

        let response = self
            .client
            .post(self.endpoint(token))
            .json(&Self::create_payload(chat_id, message))
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Ok(NotificationResult::failed(format!("Telegram API returned HTTP {}", status.as_u16())));
        }

        let body: serde_json::Value = response.json().await.unwrap_or_default();
        let message_id = body["result"]["message_id"].as_i64().map(|id| id.to_string());
        Ok(NotificationResult::sent(message_id))
    }
}
