pub mod config;
pub mod detector;
pub mod fetcher;
pub mod filter;
pub mod formatter;
pub mod logging;
pub mod models;
pub mod monitor;
pub mod plugins;
pub mod utils;

// Re-export commonly used types
pub use config::AppConfig;
pub use detector::ChangeDetector;
pub use monitor::{CycleReport, Monitor, MonitorPhase, RunSummary};
pub use plugins::NotifierManager;
pub use utils::error::AppError;

pub type Result<T> = std::result::Result<T, AppError>;
