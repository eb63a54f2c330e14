use async_trait::async_trait;
use watch_notify_models::{Enrichment, HistoryEvent, MediaKind, RatingPair};
use crate::error::SourceError;

/// Watch-history feed
#[async_trait]
pub trait HistoryProvider: Send + Sync {
    fn provider_name(&self) -> &str;

    /// Most recent events, newest first, exactly as the provider orders them
    async fn recent_history(&self, limit: usize) -> Result<Vec<HistoryEvent>, SourceError>;
}

/// Descriptive metadata keyed by the provider's numeric ID
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    fn provider_name(&self) -> &str;

    /// `Ok(None)` means the provider answered but had nothing for this ID
    async fn details(&self, kind: MediaKind, id: u64) -> Result<Option<Enrichment>, SourceError>;
}

/// Third-party ratings keyed by external-database ID
#[async_trait]
pub trait RatingsProvider: Send + Sync {
    fn provider_name(&self) -> &str;

    async fn ratings(&self, imdb_id: &str) -> Result<RatingPair, SourceError>;
}

/// Messaging endpoint; both sends render HTML formatting
#[async_trait]
pub trait Messenger: Send + Sync {
    async fn send_text(&self, text: &str) -> Result<(), SourceError>;

    async fn send_photo(&self, photo_url: &str, caption: &str) -> Result<(), SourceError>;
}
