pub mod extractor;
pub mod notifier;

pub use extractor::{DetailExtractor, ListingExtractor};
pub use notifier::{NotificationMessage, NotificationResult, NotifierPlugin, Readiness};
#[cfg(test)]
pub use notifier::MockNotifierPlugin;
