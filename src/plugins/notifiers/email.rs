use async_trait::async_trait;
use lettre::message::{header, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::telegram::NOTIFY_TIMEOUT;
use crate::config::EmailSettings;
use crate::plugins::traits::{NotificationMessage, NotificationResult, NotifierPlugin, Readiness};
use crate::utils::error::Result;

/// Settings with every required field present.
#[derive(Debug, Clone)]
struct SmtpAccount<'a> {
    server: &'a str,
    port: u16,
    sender: &'a str,
    password: &'a str,
    recipient: &'a str,
}

pub struct EmailNotifier {
    settings: EmailSettings,
}

impl EmailNotifier {
    pub fn new(settings: EmailSettings) -> Self {
        Self { settings }
    }

    fn account(&self) -> std::result::Result<SmtpAccount<'_>, String> {
        fn required<'a>(value: &'a Option<String>, field: &str) -> std::result::Result<&'a str, String> {
            value
                .as_deref()
                .filter(|v| !v.is_empty())
                .ok_or_else(|| format!("Missing {}", field))
        }

        Ok(SmtpAccount {
            server: required(&self.settings.smtp_server, "smtp_server")?,
            port: self.settings.smtp_port,
            sender: required(&self.settings.sender_email, "sender_email")?,
            password: required(&self.settings.sender_password, "sender_password")?,
            recipient: required(&self.settings.recipient_email, "recipient_email")?,
        })
    }

    fn build_message(account: &SmtpAccount, message: &NotificationMessage) -> Result<Message> {
        let email = Message::builder()
            .from(account.sender.parse::<Mailbox>()?)
            .to(account.recipient.parse::<Mailbox>()?)
            .subject(message.subject.clone())
            .header(header::ContentType::TEXT_PLAIN)
            .body(message.plain_body())?;
        Ok(email)
    }
}

#[async_trait]
impl NotifierPlugin for EmailNotifier {
    fn name(&self) -> &'static str {
        "Email Notifier"
    }

    fn plugin_type(&self) -> &'static str {
        "email"
    }

    fn description(&self) -> &'static str {
        "Sends plain-text notifications via SMTP with STARTTLS"
    }

    fn readiness(&self) -> Readiness {
        if !self.settings.enabled {
            return Readiness::Disabled;
        }
        match self.account() {
            Ok(_) => Readiness::Ready,
            Err(reason) => Readiness::Unconfigured(reason),
        }
    }

    async fn notify(&self, message: &NotificationMessage) -> Result<NotificationResult> {
        let account = match self.account() {
            Ok(account) => account,
            Err(reason) => return Ok(NotificationResult::failed(reason)),
        };

        let email = Self::build_message(&account, message)?;

        let credentials = Credentials::new(account.sender.to_string(), account.password.to_string());
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(account.server)?
            .port(account.port)
            .credentials(credentials)
            .timeout(Some(NOTIFY_TIMEOUT))
            .build();

        match mailer.send(email).await {
            Ok(response) => Ok(NotificationResult::sent(Some(response.code().to_string()))),
            Err(e) => Ok(NotificationResult::failed(e.to_string())),
        }
    }
}
