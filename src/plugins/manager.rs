use serde::Serialize;

use super::notifiers::{DiscordNotifier, EmailNotifier, TelegramNotifier};
use super::traits::{NotificationMessage, NotifierPlugin, Readiness};
use crate::config::AppConfig;
use crate::utils::error::Result;

pub type NotifierPluginBox = Box<dyn NotifierPlugin>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "lowercase")]
pub enum ChannelOutcome {
    Sent,
    Failed(String),
    Skipped(String),
}

/// Per-channel result of one dispatch, in registration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DispatchReport {
    pub outcomes: Vec<(String, ChannelOutcome)>,
}

impl DispatchReport {
    pub fn sent(&self) -> usize {
        self.count(|o| matches!(o, ChannelOutcome::Sent))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, ChannelOutcome::Failed(_)))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, ChannelOutcome::Skipped(_)))
    }

    pub fn outcome(&self, plugin_type: &str) -> Option<&ChannelOutcome> {
        self.outcomes
            .iter()
            .find(|(channel, _)| channel == plugin_type)
            .map(|(_, outcome)| outcome)
    }

    fn count(&self, pred: impl Fn(&ChannelOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|(_, o)| pred(o)).count()
    }
}

/// Fans one message out to every registered channel. A channel that fails
/// never stops the others.
#[derive(Default)]
pub struct NotifierManager {
    notifiers: Vec<NotifierPluginBox>,
}

impl NotifierManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Telegram, email and webhook channels, in that order. A missing settings
    /// block leaves the channel out entirely.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let mut manager = Self::new();

        if let Some(settings) = &config.telegram {
            manager.register_notifier(Box::new(TelegramNotifier::new(settings.clone())?));
        }
        if let Some(settings) = &config.email_notifications {
            manager.register_notifier(Box::new(EmailNotifier::new(settings.clone())));
        }
        if let Some(settings) = &config.discord_webhook {
            manager.register_notifier(Box::new(DiscordNotifier::new(settings.clone())?));
        }

        Ok(manager)
    }

    pub fn register_notifier(&mut self, plugin: NotifierPluginBox) {
        tracing::debug!("Registered notifier {}", plugin.plugin_type());
        self.notifiers.push(plugin);
    }

    pub fn notifier_types(&self) -> Vec<&str> {
        self.notifiers.iter().map(|n| n.plugin_type()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty()
    }

    pub async fn dispatch(&self, message: &NotificationMessage) -> DispatchReport {
        let mut report = DispatchReport::default();

        for notifier in &self.notifiers {
            let channel = notifier.plugin_type();
            let outcome = match notifier.readiness() {
                Readiness::Disabled => {
                    tracing::debug!("{} disabled, skipping", notifier.name());
                    ChannelOutcome::Skipped("disabled".to_string())
                }
                Readiness::Unconfigured(reason) => {
                    tracing::warn!("{} enabled but not configured: {}", notifier.name(), reason);
                    ChannelOutcome::Skipped(reason)
                }
                Readiness::Ready => match notifier.notify(message).await {
                    Ok(result) if result.success => {
                        tracing::info!("{} notification sent", notifier.name());
                        ChannelOutcome::Sent
                    }
                    Ok(result) => {
                        let error = result.error.unwrap_or_else(|| "unknown error".to_string());
                        tracing::error!("{} notification failed: {}", notifier.name(), error);
                        ChannelOutcome::Failed(error)
                    }
                    Err(e) => {
                        tracing::error!("{} notification error: {}", notifier.name(), e);
                        ChannelOutcome::Failed(e.to_string())
                    }
                },
            };
            report.outcomes.push((channel.to_string(), outcome));
        }

        report
    }
}
