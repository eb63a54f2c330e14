pub mod enrichment;
pub mod event;
pub mod media;
pub mod media_ids;
pub mod rating;

pub use enrichment::Enrichment;
pub use event::{EventId, HistoryEvent};
pub use media::{MediaKind, MediaRecord};
pub use media_ids::MediaIds;
pub use rating::RatingPair;
