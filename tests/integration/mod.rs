// Integration tests for Restock Watcher
// These tests run whole cycles against local HTTP servers

pub mod monitor_tests;
pub mod notifier_tests;

use restock_watcher::config::{ChatId, TelegramSettings, WebhookSettings};
use restock_watcher::{AppConfig, ChangeDetector, Monitor, NotifierManager};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const LISTING_PATH: &str = "/w/air-force-1-aq0113";
pub const PARIS_PATH: &str = "/t/air-force-1-low-city-pack-paris/HF1234-100";
pub const TELEGRAM_PATH: &str = "/bot123:abc/sendMessage";
pub const WEBHOOK_PATH: &str = "/api/webhooks/1/abc";

/// Listing with the Paris shoe and an unrelated AF1.
pub fn listing_page() -> String {
    format!(
        r#"<html><body>
          <div class="product-grid">
            <div class="product-card">
              <div class="product-card__body">
                <a class="product-card__link-overlay" href="{}">View</a>
                <h3 class="product-card__title">Nike Air Force 1 Low City Pack Paris Patent</h3>
              </div>
            </div>
            <div class="product-card">
              <a href="/t/air-force-1-07/CW2288-111"><h3 class="product-card__title">Nike Air Force 1 '07</h3></a>
              <div class="product-price">$115</div>
            </div>
          </div>
        </body></html>"#,
        PARIS_PATH
    )
}

pub fn detail_page(sizes: &[&str]) -> String {
    let buttons: String = sizes
        .iter()
        .map(|s| format!(r#"<button class="size-grid-button">{}</button>"#, s))
        .collect();
    format!(
        r#"<html><body>
          <div class="product-price is--current-price">$130</div>
          <div class="size-grid">{}<button class="size-grid-button" disabled>12</button></div>
          <button class="add-to-cart-btn" disabled>Add to Bag</button>
        </body></html>"#,
        buttons
    )
}

/// Local site plus a scratch directory for state files.
pub struct TestSite {
    pub server: MockServer,
    pub dir: TempDir,
}

impl TestSite {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
            dir: TempDir::new().expect("temp dir"),
        }
    }

    pub async fn serve(&self, page: &str, body: String) {
        Mock::given(method("GET"))
            .and(path(page))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&self.server)
            .await;
    }

    /// Single-run config with Telegram and the webhook pointed at this server.
    pub fn config(&self) -> AppConfig {
        let mut config = AppConfig::builtin_with_telegram(None, None);
        config.target_url = format!("{}{}", self.server.uri(), LISTING_PATH);
        config.user_agent = "RestockWatcher-Test/1.0".to_string();
        config.single_run = true;
        config.state_file = self.dir.path().join("last_notification.json");
        config.telegram = Some(TelegramSettings {
            enabled: true,
            bot_token: Some("123:abc".to_string()),
            chat_id: Some(ChatId::Numeric(42)),
            api_base: self.server.uri(),
        });
        config.discord_webhook = Some(WebhookSettings {
            enabled: true,
            webhook_url: Some(format!("{}{}", self.server.uri(), WEBHOOK_PATH)),
        });
        config
    }

    pub fn monitor(&self, config: AppConfig) -> Monitor {
        let dispatcher = NotifierManager::from_config(&config).expect("notifiers");
        let detector = ChangeDetector::new(config.state_file.clone());
        Monitor::new(config, dispatcher, detector).expect("monitor")
    }
}

/// Accept posts to a channel endpoint with the given status.
pub async fn mount_channel(server: &MockServer, endpoint: &str, status: u16) {
    Mock::given(method("POST"))
        .and(path(endpoint))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Text of every Telegram message the server received.
pub async fn telegram_texts(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|r| r.url.path() == TELEGRAM_PATH)
        .filter_map(|r| serde_json::from_slice::<serde_json::Value>(&r.body).ok())
        .filter_map(|body| body["text"].as_str().map(str::to_string))
        .collect()
}

pub async fn webhook_posts(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() == WEBHOOK_PATH)
        .count()
}
