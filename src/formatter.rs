use chrono::{DateTime, Utc};

use crate::config::AlertTemplates;
use crate::models::Product;
use crate::plugins::traits::NotificationMessage;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Renders a cycle's products into the single message every channel receives.
#[derive(Debug, Clone, Default)]
pub struct NotificationFormatter {
    templates: AlertTemplates,
}

impl NotificationFormatter {
    pub fn new(templates: AlertTemplates) -> Self {
        Self { templates }
    }

    pub fn format(&self, products: &[Product], now: DateTime<Utc>) -> NotificationMessage {
        let timestamp = now.format(TIMESTAMP_FORMAT).to_string();

        if products.is_empty() {
            return NotificationMessage::new(
                self.templates.email_subject.clone(),
                format!(
                    "🔍 **{}**\n\n**Status:** {}\n**Time:** {}\n**Next check:** {}",
                    self.templates.status_title,
                    self.templates.absence_status,
                    timestamp,
                    self.templates.next_check_hint
                ),
            );
        }

        let mut lines = vec![format!("🚨 **{}**\n", self.templates.alert_title)];
        for product in products {
            lines.push(format!("**Product:** {}", product.name));
            lines.push(format!("**Price:** {}", product.price));
            if product.sizes.is_empty() {
                lines.push("**Sizes:** Check website".to_string());
            } else {
                lines.push(format!("**Available Sizes:** {}", product.sizes.join(", ")));
            }
            lines.push(format!("**Time:** {}", timestamp));
            lines.push(format!("🛒 **BUY NOW:** {}", product.link));
            lines.push(String::new());
        }

        NotificationMessage::new(self.templates.email_subject.clone(), lines.join("\n"))
    }
}
