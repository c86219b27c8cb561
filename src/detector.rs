use std::path::{Path, PathBuf};

use crate::models::{NotificationState, Product};

/// Decides whether a cycle's products differ from what was last notified.
/// Owns the state file for the lifetime of the monitor.
#[derive(Debug, Clone)]
pub struct ChangeDetector {
    state_path: PathBuf,
}

impl ChangeDetector {
    pub fn new(state_path: impl Into<PathBuf>) -> Self {
        Self {
            state_path: state_path.into(),
        }
    }

    pub fn state_path(&self) -> &Path {
        &self.state_path
    }

    /// True when the products should be announced. A changed product set is
    /// written back before returning; an unchanged one leaves the file alone.
    pub fn should_notify(&self, products: &[Product]) -> bool {
        // Absence is always reported and never recorded
        if products.is_empty() {
            return true;
        }

        let previous = NotificationState::load_or_default(&self.state_path);
        let current = NotificationState::from_products(products);

        if previous == current {
            tracing::debug!("{} product(s) unchanged since last notification", current.len());
            return false;
        }

        if let Err(e) = current.save(&self.state_path) {
            tracing::error!(
                "Failed to write notification state to {}: {}",
                self.state_path.display(),
                e
            );
        }
        true
    }
}
