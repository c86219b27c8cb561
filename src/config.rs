use config::{Config, ConfigError, Environment, File, FileFormat};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use url::Url;

pub const DEFAULT_TARGET_URL: &str = "https://www.nike.com/w/air-force-1-aq0113";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
pub const DEFAULT_TELEGRAM_API: &str = "https://api.telegram.org";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub search_terms: Vec<String>,
    #[serde(alias = "nike_search_url", default = "default_target_url")]
    pub target_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Seconds between cycles.
    #[serde(default = "default_check_interval")]
    pub check_interval: u64,
    #[serde(default)]
    pub single_run: bool,
    /// Detail pages fetched at once within a cycle. 1 keeps fetches sequential.
    #[serde(default = "default_detail_concurrency")]
    pub detail_concurrency: usize,
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,
    #[serde(default)]
    pub telegram: Option<TelegramSettings>,
    #[serde(default)]
    pub email_notifications: Option<EmailSettings>,
    #[serde(default)]
    pub discord_webhook: Option<WebhookSettings>,
    #[serde(default)]
    pub extraction: ExtractionPatterns,
    #[serde(default)]
    pub alerts: AlertTemplates,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChatId {
    Numeric(i64),
    Text(String),
}

impl std::fmt::Display for ChatId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChatId::Numeric(id) => write!(f, "{}", id),
            ChatId::Text(id) => write!(f, "{}", id),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramSettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub bot_token: Option<String>,
    #[serde(default)]
    pub chat_id: Option<ChatId>,
    #[serde(default = "default_telegram_api")]
    pub api_base: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailSettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub sender_email: Option<String>,
    #[serde(default)]
    pub recipient_email: Option<String>,
    #[serde(default)]
    pub smtp_server: Option<String>,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    #[serde(default)]
    pub sender_password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookSettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub webhook_url: Option<String>,
}

/// Regular expressions used to pick product data out of page markup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionPatterns {
    pub card_pattern: String,
    pub link_pattern: String,
    pub title_pattern: String,
    pub name_keyword_pattern: String,
    pub price_pattern: String,
    pub detail_price_pattern: String,
    pub size_pattern: String,
    pub add_to_cart_pattern: String,
}

impl Default for ExtractionPatterns {
    fn default() -> Self {
        Self {
            card_pattern: "product-card".to_string(),
            link_pattern: "/t/".to_string(),
            title_pattern: "product-card__title|card-title".to_string(),
            name_keyword_pattern: "Air Force|AF1".to_string(),
            price_pattern: "price|product-price".to_string(),
            detail_price_pattern: "product-price|current-price".to_string(),
            size_pattern: "size|btn-size".to_string(),
            add_to_cart_pattern: "(?i)Add to Bag|Add to Cart".to_string(),
        }
    }
}

impl ExtractionPatterns {
    fn patterns(&self) -> [(&'static str, &str); 8] {
        [
            ("card_pattern", &self.card_pattern),
            ("link_pattern", &self.link_pattern),
            ("title_pattern", &self.title_pattern),
            ("name_keyword_pattern", &self.name_keyword_pattern),
            ("price_pattern", &self.price_pattern),
            ("detail_price_pattern", &self.detail_price_pattern),
            ("size_pattern", &self.size_pattern),
            ("add_to_cart_pattern", &self.add_to_cart_pattern),
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertTemplates {
    pub status_title: String,
    pub absence_status: String,
    pub next_check_hint: String,
    pub alert_title: String,
    pub email_subject: String,
}

impl Default for AlertTemplates {
    fn default() -> Self {
        Self {
            status_title: "Nike Monitor Status".to_string(),
            absence_status: "No AF1 City Pack Paris found".to_string(),
            next_check_hint: "5 minutes".to_string(),
            alert_title: "NIKE ALERT — AF1 City Pack Paris (Patent)".to_string(),
            email_subject: "Nike AF1 City Pack Paris Available!".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    Never,
    Daily,
    Hourly,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub file: PathBuf,
    pub level: String,
    pub rotation: LogRotation,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            file: PathBuf::from("monitor.log"),
            level: "info".to_string(),
            rotation: LogRotation::Never,
        }
    }
}

fn default_target_url() -> String {
    DEFAULT_TARGET_URL.to_string()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_check_interval() -> u64 {
    30
}

fn default_detail_concurrency() -> usize {
    1
}

fn default_state_file() -> PathBuf {
    PathBuf::from("last_notification.json")
}

fn default_telegram_api() -> String {
    DEFAULT_TELEGRAM_API.to_string()
}

fn default_smtp_port() -> u16 {
    587
}

impl AppConfig {
    /// Load configuration from a JSON file, overlaid with `RESTOCK_*` environment
    /// variables. A missing file yields the built-in defaults, still overlaid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if path.exists() {
            builder = builder.add_source(File::from(path).format(FileFormat::Json));
        } else {
            tracing::info!("No configuration at {}, using built-in defaults", path.display());
            builder = builder.add_source(Config::try_from(&Self::builtin())?);
        }

        let s = builder
            // Nested keys use a double underscore: RESTOCK_TELEGRAM__CHAT_ID
            .add_source(
                Environment::with_prefix("RESTOCK")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: AppConfig = s.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults used when no configuration file exists. Telegram credentials come
    /// from `TELEGRAM_BOT_TOKEN` and `TELEGRAM_CHAT_ID`.
    pub fn builtin() -> Self {
        Self::builtin_with_telegram(
            env::var("TELEGRAM_BOT_TOKEN").ok(),
            env::var("TELEGRAM_CHAT_ID").ok(),
        )
    }

    pub fn builtin_with_telegram(bot_token: Option<String>, chat_id: Option<String>) -> Self {
        Self {
            search_terms: vec![
                "Nike Air Force 1 Low".to_string(),
                "City Pack Paris".to_string(),
                "Patent".to_string(),
            ],
            target_url: default_target_url(),
            user_agent: default_user_agent(),
            check_interval: default_check_interval(),
            single_run: false,
            detail_concurrency: default_detail_concurrency(),
            state_file: default_state_file(),
            telegram: Some(TelegramSettings {
                enabled: true,
                bot_token,
                chat_id: chat_id.map(ChatId::Text),
                api_base: default_telegram_api(),
            }),
            email_notifications: None,
            discord_webhook: None,
            extraction: ExtractionPatterns::default(),
            alerts: AlertTemplates::default(),
            logging: LoggingSettings::default(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if Url::parse(&self.target_url).is_err() {
            return Err(ConfigError::Message(format!("Invalid target URL: {}", self.target_url)));
        }

        if self.check_interval == 0 {
            return Err(ConfigError::Message("check_interval must be greater than 0".into()));
        }

        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::Message("user_agent must not be empty".into()));
        }

        if self.detail_concurrency == 0 {
            return Err(ConfigError::Message("detail_concurrency must be greater than 0".into()));
        }

        for (name, pattern) in self.extraction.patterns() {
            if let Err(e) = Regex::new(pattern) {
                return Err(ConfigError::Message(format!("Invalid extraction.{}: {}", name, e)));
            }
        }

        Ok(())
    }
}
