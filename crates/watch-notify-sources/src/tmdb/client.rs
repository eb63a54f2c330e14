use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use watch_notify_models::{Enrichment, MediaKind};
use crate::error::SourceError;
use crate::http::create_client;
use crate::tmdb::api;
use crate::traits::MetadataProvider;

#[derive(Clone)]
pub struct TmdbClient {
    client: Arc<Client>,
    base_url: String,
    api_key: String,
}

impl TmdbClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Arc::new(create_client()),
            base_url: api::TMDB_API_BASE.to_string(),
            api_key,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl MetadataProvider for TmdbClient {
    fn provider_name(&self) -> &str {
        "tmdb"
    }

    async fn details(&self, kind: MediaKind, id: u64) -> Result<Option<Enrichment>, SourceError> {
        api::get_details(&self.client, &self.base_url, &self.api_key, kind, id).await
    }
}
