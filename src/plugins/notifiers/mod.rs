// Notifier plugin implementations
pub mod telegram;
pub mod email;
pub mod discord;

pub use telegram::TelegramNotifier;
pub use email::EmailNotifier;
pub use discord::DiscordNotifier;
