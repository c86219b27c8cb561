pub mod traits;
pub mod manager;
pub mod extractors;
pub mod notifiers;

pub use manager::{ChannelOutcome, DispatchReport, NotifierManager};
pub use traits::{DetailExtractor, ListingExtractor, NotifierPlugin};
