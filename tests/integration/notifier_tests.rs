use super::*;

use restock_watcher::config::EmailSettings;
use restock_watcher::plugins::traits::NotificationMessage;
use restock_watcher::plugins::ChannelOutcome;

fn unreachable_email() -> EmailSettings {
    EmailSettings {
        enabled: true,
        sender_email: Some("watcher@example.com".to_string()),
        recipient_email: Some("me@example.com".to_string()),
        smtp_server: Some("localhost".to_string()),
        smtp_port: 1,
        sender_password: Some("app-password".to_string()),
    }
}

#[tokio::test]
async fn test_failing_webhook_does_not_block_other_channels() {
    let site = TestSite::start().await;
    mount_channel(&site.server, WEBHOOK_PATH, 500).await;

    let mut config = site.config();
    if let Some(telegram) = config.telegram.as_mut() {
        telegram.enabled = false;
    }
    config.email_notifications = Some(unreachable_email());

    let manager = NotifierManager::from_config(&config).expect("notifiers");
    let report = manager
        .dispatch(&NotificationMessage::new("Restock", "**Product:** AF1"))
        .await;

    assert_eq!(report.outcome("telegram"), Some(&ChannelOutcome::Skipped("disabled".to_string())));
    assert!(matches!(report.outcome("discord"), Some(ChannelOutcome::Failed(e)) if e.contains("500")));
    // Email was still attempted after the webhook failed
    assert!(matches!(report.outcome("email"), Some(ChannelOutcome::Failed(_))));
    assert_eq!(report.sent(), 0);
    assert_eq!(webhook_posts(&site.server).await, 1);
    assert!(telegram_texts(&site.server).await.is_empty());
}

#[tokio::test]
async fn test_unconfigured_channels_are_skipped() {
    let site = TestSite::start().await;
    mount_channel(&site.server, WEBHOOK_PATH, 204).await;

    let mut config = site.config();
    if let Some(telegram) = config.telegram.as_mut() {
        telegram.bot_token = None;
    }

    let manager = NotifierManager::from_config(&config).expect("notifiers");
    let report = manager.dispatch(&NotificationMessage::new("Restock", "hello")).await;

    assert!(matches!(report.outcome("telegram"), Some(ChannelOutcome::Skipped(_))));
    assert_eq!(report.outcome("discord"), Some(&ChannelOutcome::Sent));
}

#[tokio::test]
async fn test_telegram_receives_markdown_payload() {
    let site = TestSite::start().await;
    mount_channel(&site.server, TELEGRAM_PATH, 200).await;

    let mut config = site.config();
    config.discord_webhook = None;

    let manager = NotifierManager::from_config(&config).expect("notifiers");
    let report = manager
        .dispatch(&NotificationMessage::new("Restock", "🚨 **ALERT**"))
        .await;
    assert_eq!(report.sent(), 1);

    let requests = site.server.received_requests().await.unwrap_or_default();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).expect("json body");
    assert_eq!(body["chat_id"], 42);
    assert_eq!(body["text"], "🚨 **ALERT**");
    assert_eq!(body["parse_mode"], "Markdown");
    assert_eq!(body["disable_web_page_preview"], false);
}
