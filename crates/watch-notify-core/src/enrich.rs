use tracing::{debug, warn};
use watch_notify_models::{Enrichment, MediaKind, MediaRecord, RatingPair};
use watch_notify_sources::{MetadataProvider, RatingsProvider};

pub const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p";
pub const POSTER_SIZE: &str = "w500";

pub fn poster_url(poster_path: &str) -> String {
    format!("{}/{}{}", POSTER_BASE_URL, POSTER_SIZE, poster_path)
}

/// Everything looked up for one event; every part is optional
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnrichedEvent {
    pub enrichment: Option<Enrichment>,
    pub ratings: RatingPair,
    pub poster_url: Option<String>,
}

/// Looks up metadata and ratings for history events
///
/// Provider failures are logged and degrade to missing fields; enrichment
/// never fails a run.
pub struct Enricher {
    metadata: Box<dyn MetadataProvider>,
    ratings: Option<Box<dyn RatingsProvider>>,
}

impl Enricher {
    pub fn new(metadata: Box<dyn MetadataProvider>) -> Self {
        Self { metadata, ratings: None }
    }

    pub fn with_ratings(mut self, ratings: Box<dyn RatingsProvider>) -> Self {
        self.ratings = Some(ratings);
        self
    }

    pub async fn enrich(&self, kind: MediaKind, record: &MediaRecord) -> EnrichedEvent {
        let enrichment = match record.ids.tmdb_id() {
            Some(id) => self.lookup_metadata(kind, id).await,
            None => {
                debug!(kind = %kind, "No metadata ID on event, skipping metadata lookup");
                None
            }
        };

        let ratings = match (record.ids.imdb_id(), &self.ratings) {
            (Some(imdb_id), Some(provider)) => Self::lookup_ratings(&**provider, &imdb_id).await,
            _ => RatingPair::default(),
        };

        let poster_url = enrichment
            .as_ref()
            .and_then(|e| e.poster_path.as_deref())
            .filter(|p| !p.is_empty())
            .map(self::poster_url);

        EnrichedEvent { enrichment, ratings, poster_url }
    }

    async fn lookup_metadata(&self, kind: MediaKind, id: u64) -> Option<Enrichment> {
        match self.metadata.details(kind, id).await {
            Ok(Some(enrichment)) => Some(enrichment),
            Ok(None) => {
                warn!(provider = self.metadata.provider_name(), id, kind = %kind, "No metadata available");
                None
            }
            Err(e) => {
                warn!(provider = self.metadata.provider_name(), id, kind = %kind, error = %e, "Metadata lookup failed");
                None
            }
        }
    }

    async fn lookup_ratings(provider: &dyn RatingsProvider, imdb_id: &str) -> RatingPair {
        match provider.ratings(imdb_id).await {
            Ok(pair) => pair,
            Err(e) => {
                warn!(provider = provider.provider_name(), imdb_id, error = %e, "Ratings lookup failed");
                RatingPair::default()
            }
        }
    }
}
