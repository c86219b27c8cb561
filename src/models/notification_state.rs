use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::models::Product;
use crate::utils::error::Result;

/// What was last notified about one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    pub name: String,
    pub price: String,
    pub sizes: Vec<String>, // Sorted ascending
    pub in_stock: bool,
}

impl From<&Product> for ProductSnapshot {
    fn from(product: &Product) -> Self {
        let mut sizes = product.sizes.clone();
        sizes.sort();
        Self {
            name: product.name.clone(),
            price: product.price.clone(),
            sizes,
            in_stock: product.in_stock,
        }
    }
}

/// Product identifier -> snapshot. Always written as a whole.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationState {
    pub products: BTreeMap<String, ProductSnapshot>,
}

impl NotificationState {
    /// Later products with the same identifier replace earlier ones.
    pub fn from_products(products: &[Product]) -> Self {
        let products = products
            .iter()
            .map(|p| (p.identifier(), ProductSnapshot::from(p)))
            .collect();
        Self { products }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Missing or unreadable state counts as "nothing notified yet".
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(state) => state,
            Err(e) => {
                tracing::debug!("No usable notification state at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let data = serde_json::to_string_pretty(self)?;
        std::fs::write(path, data)?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
