//! Small helpers for matching elements by class-name and text patterns.

use regex::Regex;
use scraper::{ElementRef, Html};

/// True if any single class token of the element matches the pattern.
pub fn class_matches(element: &ElementRef, pattern: &Regex) -> bool {
    element.value().classes().any(|class| pattern.is_match(class))
}

pub fn is_tag(element: &ElementRef, tag: &str) -> bool {
    element.value().name().eq_ignore_ascii_case(tag)
}

pub fn is_disabled(element: &ElementRef) -> bool {
    element.value().attr("disabled").is_some()
}

/// Every element of the document, root included, in document order.
pub fn document_elements(document: &Html) -> impl Iterator<Item = ElementRef<'_>> {
    document.root_element().descendants().filter_map(ElementRef::wrap)
}

/// Every element below `element`, excluding itself, in document order.
pub fn descendant_elements<'a>(element: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    element.descendants().skip(1).filter_map(ElementRef::wrap)
}

/// Text of all descendant text nodes, each trimmed, concatenated.
pub fn stripped_text(element: &ElementRef) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .concat()
}

/// First descendant text node matching the pattern, trimmed.
pub fn first_matching_text(element: ElementRef, pattern: &Regex) -> Option<String> {
    element
        .descendants()
        .skip(1)
        .filter_map(|node| node.value().as_text())
        .map(|text| &**text)
        .find(|text| pattern.is_match(text))
        .map(|text| text.trim().to_string())
}
