use regex::Regex;
use scraper::Html;

use super::markup::{class_matches, document_elements, is_disabled, is_tag, stripped_text};
use crate::config::ExtractionPatterns;
use crate::models::ProductDetails;
use crate::plugins::traits::DetailExtractor;
use crate::utils::error::Result;

/// Currency symbol followed by the amount, e.g. `$1,299.99` or `£95`.
const CURRENCY_PATTERN: &str = r"[\$£€¥][\d,]+(?:\.\d{2})?";

pub struct PageDetailExtractor {
    price_pattern: Regex,
    currency_pattern: Regex,
    size_pattern: Regex,
    add_to_cart_pattern: Regex,
}

impl PageDetailExtractor {
    pub fn new(patterns: &ExtractionPatterns) -> Result<Self> {
        Ok(Self {
            price_pattern: Regex::new(&patterns.detail_price_pattern)?,
            currency_pattern: Regex::new(CURRENCY_PATTERN)?,
            size_pattern: Regex::new(&patterns.size_pattern)?,
            add_to_cart_pattern: Regex::new(&patterns.add_to_cart_pattern)?,
        })
    }

    fn extract_price(&self, document: &Html) -> Option<String> {
        let element = document_elements(document).find(|e| class_matches(e, &self.price_pattern))?;
        let text = stripped_text(&element);
        self.currency_pattern.find(&text).map(|m| m.as_str().to_string())
    }

    fn extract_sizes(&self, document: &Html) -> Vec<String> {
        document_elements(document)
            .filter(|e| is_tag(e, "button") && class_matches(e, &self.size_pattern))
            .filter(|e| !is_disabled(e))
            .map(|e| stripped_text(&e))
            .filter(|size| !size.is_empty())
            .collect()
    }

    /// Only the first purchase button is considered.
    fn can_add_to_cart(&self, document: &Html) -> bool {
        document_elements(document)
            .find(|e| is_tag(e, "button") && self.add_to_cart_pattern.is_match(&stripped_text(e)))
            .is_some_and(|button| !is_disabled(&button))
    }
}

impl DetailExtractor for PageDetailExtractor {
    fn name(&self) -> &str {
        "product-page"
    }

    fn extract(&self, html: &str) -> Result<ProductDetails> {
        let document = Html::parse_document(html);

        let price = self.extract_price(&document);
        let sizes = self.extract_sizes(&document);
        let in_stock = !sizes.is_empty() || self.can_add_to_cart(&document);

        Ok(ProductDetails { price, sizes, in_stock })
    }
}
