pub mod product;
pub mod notification_state;

// Re-exports for convenience
pub use product::*;
pub use notification_state::*;
