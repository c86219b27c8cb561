use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::utils::error::Result;

/// One rendered alert, sent unchanged to every channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationMessage {
    pub subject: String,
    pub body: String, // Telegram-style Markdown
}

impl NotificationMessage {
    pub fn new(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
        }
    }

    /// Body without Markdown emphasis and alert emoji, for plain-text channels.
    pub fn plain_body(&self) -> String {
        self.body.replace("**", "").replace('🚨', "").replace('🛒', "")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationResult {
    pub success: bool,
    pub message_id: Option<String>,
    pub error: Option<String>,
}

impl NotificationResult {
    pub fn sent(message_id: Option<String>) -> Self {
        Self {
            success: true,
            message_id,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message_id: None,
            error: Some(error.into()),
        }
    }
}

/// Whether a channel should be attempted at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Readiness {
    Ready,
    Disabled,
    /// Enabled, but a required setting is missing
    Unconfigured(String),
}

/// Trait for implementing notification channels (Telegram, email, webhook)
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotifierPlugin: Send + Sync {
    /// Plugin metadata
    fn name(&self) -> &'static str;
    fn plugin_type(&self) -> &'static str;
    fn description(&self) -> &'static str;

    fn readiness(&self) -> Readiness;

    /// A delivery the remote side refused is `Ok` with `success == false`;
    /// `Err` is reserved for transport and setup failures.
    async fn notify(&self, message: &NotificationMessage) -> Result<NotificationResult>;
}
