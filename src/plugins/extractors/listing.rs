use regex::Regex;
use scraper::{ElementRef, Html};
use std::collections::HashSet;
use url::Url;

use super::markup::{
    class_matches, descendant_elements, document_elements, first_matching_text, is_tag, stripped_text,
};
use crate::config::ExtractionPatterns;
use crate::models::Candidate;
use crate::plugins::traits::ListingExtractor;
use crate::utils::error::Result;

const TITLE_TAGS: [&str; 3] = ["h3", "h4", "span"];

/// How name, link and price are read out of one candidate block.
#[derive(Debug, Clone)]
pub struct CandidateFields {
    title_pattern: Regex,
    name_keyword_pattern: Regex,
    price_pattern: Regex,
}

impl CandidateFields {
    pub fn new(patterns: &ExtractionPatterns) -> Result<Self> {
        Ok(Self {
            title_pattern: Regex::new(&patterns.title_pattern)?,
            name_keyword_pattern: Regex::new(&patterns.name_keyword_pattern)?,
            price_pattern: Regex::new(&patterns.price_pattern)?,
        })
    }

    pub fn read(&self, block: ElementRef, base_url: &Url) -> Result<Candidate> {
        let name = match descendant_elements(block)
            .find(|e| TITLE_TAGS.iter().any(|tag| is_tag(e, tag)) && class_matches(e, &self.title_pattern))
        {
            Some(title) => stripped_text(&title),
            None => first_matching_text(block, &self.name_keyword_pattern).unwrap_or_default(),
        };

        let link_element = if is_tag(&block, "a") {
            Some(block)
        } else {
            descendant_elements(block).find(|e| is_tag(e, "a"))
        };
        let link = match link_element {
            Some(element) => {
                let href = element.value().attr("href").unwrap_or_default();
                base_url.join(href)?.to_string()
            }
            None => String::new(),
        };

        let price = descendant_elements(block)
            .find(|e| class_matches(e, &self.price_pattern))
            .map(|e| stripped_text(&e))
            .filter(|p| !p.is_empty());

        Ok(Candidate { name, link, price })
    }

    fn read_all(&self, extractor: &str, blocks: Vec<ElementRef>, base_url: &Url) -> Vec<Candidate> {
        blocks
            .into_iter()
            .filter_map(|block| match self.read(block, base_url) {
                Ok(candidate) => Some(candidate),
                Err(e) => {
                    tracing::debug!("{}: skipping unreadable product block: {}", extractor, e);
                    None
                }
            })
            .collect()
    }
}

/// Primary strategy: product card containers found by class name.
pub struct CardListingExtractor {
    container_tag: String,
    card_pattern: Regex,
    fields: CandidateFields,
}

impl CardListingExtractor {
    pub fn new(patterns: &ExtractionPatterns) -> Result<Self> {
        Ok(Self {
            container_tag: "div".to_string(),
            card_pattern: Regex::new(&patterns.card_pattern)?,
            fields: CandidateFields::new(patterns)?,
        })
    }
}

impl CardListingExtractor {
    fn blocks<'a>(&self, document: &'a Html) -> Vec<ElementRef<'a>> {
        // Inner card parts (product-card__body etc.) match the same pattern;
        // only the outermost container counts as a card.
        let mut selected = HashSet::new();
        let mut blocks = Vec::new();
        for element in document_elements(document) {
            if !is_tag(&element, &self.container_tag) || !class_matches(&element, &self.card_pattern) {
                continue;
            }
            if element.ancestors().any(|ancestor| selected.contains(&ancestor.id())) {
                continue;
            }
            selected.insert(element.id());
            blocks.push(element);
        }
        blocks
    }
}

impl ListingExtractor for CardListingExtractor {
    fn name(&self) -> &str {
        "product-card"
    }

    fn finds_blocks(&self, html: &str) -> bool {
        !self.blocks(&Html::parse_document(html)).is_empty()
    }

    fn extract(&self, html: &str, base_url: &Url) -> Result<Vec<Candidate>> {
        let document = Html::parse_document(html);
        let blocks = self.blocks(&document);
        Ok(self.fields.read_all(self.name(), blocks, base_url))
    }
}

/// Fallback strategy: any link that points at a product page.
pub struct AnchorListingExtractor {
    link_pattern: Regex,
    fields: CandidateFields,
}

impl AnchorListingExtractor {
    pub fn new(patterns: &ExtractionPatterns) -> Result<Self> {
        Ok(Self {
            link_pattern: Regex::new(&patterns.link_pattern)?,
            fields: CandidateFields::new(patterns)?,
        })
    }
}

impl AnchorListingExtractor {
    fn blocks<'a>(&self, document: &'a Html) -> Vec<ElementRef<'a>> {
        document_elements(document)
            .filter(|e| is_tag(e, "a"))
            .filter(|e| {
                e.value()
                    .attr("href")
                    .is_some_and(|href| self.link_pattern.is_match(href))
            })
            .collect()
    }
}

impl ListingExtractor for AnchorListingExtractor {
    fn name(&self) -> &str {
        "product-link"
    }

    fn finds_blocks(&self, html: &str) -> bool {
        !self.blocks(&Html::parse_document(html)).is_empty()
    }

    fn extract(&self, html: &str, base_url: &Url) -> Result<Vec<Candidate>> {
        let document = Html::parse_document(html);
        let blocks = self.blocks(&document);
        Ok(self.fields.read_all(self.name(), blocks, base_url))
    }
}

/// Runs the primary strategy and falls back only when the primary finds no
/// blocks at all. Blocks that are present but unreadable do not trigger it.
pub struct FallbackListingExtractor {
    primary: Box<dyn ListingExtractor>,
    fallback: Box<dyn ListingExtractor>,
}

impl FallbackListingExtractor {
    pub fn new(primary: Box<dyn ListingExtractor>, fallback: Box<dyn ListingExtractor>) -> Self {
        Self { primary, fallback }
    }

    /// Product cards first, product links second.
    pub fn from_patterns(patterns: &ExtractionPatterns) -> Result<Self> {
        Ok(Self::new(
            Box::new(CardListingExtractor::new(patterns)?),
            Box::new(AnchorListingExtractor::new(patterns)?),
        ))
    }
}

impl ListingExtractor for FallbackListingExtractor {
    fn name(&self) -> &str {
        "fallback"
    }

    fn finds_blocks(&self, html: &str) -> bool {
        self.primary.finds_blocks(html) || self.fallback.finds_blocks(html)
    }

    fn extract(&self, html: &str, base_url: &Url) -> Result<Vec<Candidate>> {
        if self.primary.finds_blocks(html) {
            return self.primary.extract(html, base_url);
        }

        tracing::debug!(
            "{} found no blocks, trying {}",
            self.primary.name(),
            self.fallback.name()
        );
        self.fallback.extract(html, base_url)
    }
}
