// Page extraction strategies
pub mod markup;
pub mod listing;
pub mod detail;

pub use listing::{AnchorListingExtractor, CardListingExtractor, FallbackListingExtractor};
pub use detail::PageDetailExtractor;
