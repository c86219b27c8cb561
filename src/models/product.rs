use serde::{Deserialize, Serialize};

/// Price label used when neither the listing nor the detail page shows one.
pub const PRICE_UNAVAILABLE: &str = "N/A";

/// A raw block pulled off the listing page, before it is matched or enriched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub name: String,
    pub link: String, // Absolute URL, empty when the block had no link
    pub price: Option<String>,
}

/// What the product detail page says about price and sizes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDetails {
    pub price: Option<String>,
    pub sizes: Vec<String>,
    pub in_stock: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub price: String,
    pub link: String,
    pub sizes: Vec<String>,
    pub in_stock: bool,
}

impl Product {
    /// Combine a listing candidate with its detail record. The listing price wins
    /// over the detail price.
    pub fn assemble(candidate: Candidate, details: ProductDetails) -> Self {
        let price = candidate
            .price
            .filter(|p| !p.is_empty())
            .or(details.price)
            .unwrap_or_else(|| PRICE_UNAVAILABLE.to_string());

        Self {
            name: candidate.name,
            price,
            link: candidate.link,
            sizes: details.sizes,
            in_stock: details.in_stock,
        }
    }

    /// Key used in the persisted state: last path segment of the link, or the name.
    pub fn identifier(&self) -> String {
        if self.link.is_empty() {
            return self.name.clone();
        }
        self.link.rsplit('/').next().unwrap_or_default().to_string()
    }

    /// Products without any sign of being buyable are dropped from a cycle.
    pub fn is_purchasable(&self) -> bool {
        self.in_stock || !self.sizes.is_empty()
    }
}
