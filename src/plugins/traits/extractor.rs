use url::Url;

use crate::models::{Candidate, ProductDetails};
use crate::utils::error::Result;

/// Turns a listing page into candidate product blocks, in page order.
pub trait ListingExtractor: Send + Sync {
    /// Strategy name, used in logs
    fn name(&self) -> &str;

    /// Whether the page holds any block this strategy would read, readable or not.
    fn finds_blocks(&self, html: &str) -> bool;

    /// Relative links are resolved against `base_url`.
    fn extract(&self, html: &str, base_url: &Url) -> Result<Vec<Candidate>>;
}

/// Reads price, sizes and stock state from a product detail page.
pub trait DetailExtractor: Send + Sync {
    fn name(&self) -> &str;
    fn extract(&self, html: &str) -> Result<ProductDetails>;
}
