use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use watch_notify_models::RatingPair;
use crate::error::SourceError;
use crate::http::create_client;
use crate::omdb::api;
use crate::traits::RatingsProvider;

#[derive(Clone)]
pub struct OmdbClient {
    client: Arc<Client>,
    base_url: String,
    api_key: String,
}

impl OmdbClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Arc::new(create_client()),
            base_url: api::OMDB_API_BASE.to_string(),
            api_key,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl RatingsProvider for OmdbClient {
    fn provider_name(&self) -> &str {
        "omdb"
    }

    async fn ratings(&self, imdb_id: &str) -> Result<RatingPair, SourceError> {
        api::get_ratings(&self.client, &self.base_url, &self.api_key, imdb_id).await
    }
}
