use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use watch_notify_models::HistoryEvent;
use crate::error::SourceError;
use crate::http::create_client;
use crate::traits::HistoryProvider;
use crate::trakt::api;

#[derive(Clone)]
pub struct TraktClient {
    client: Arc<Client>,
    base_url: String,
    client_id: String,
    username: String,
}

impl TraktClient {
    pub fn new(client_id: String, username: String) -> Self {
        Self {
            client: Arc::new(create_client()),
            base_url: api::TRAKT_API_BASE.to_string(),
            client_id,
            username,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

#[async_trait]
impl HistoryProvider for TraktClient {
    fn provider_name(&self) -> &str {
        "trakt"
    }

    async fn recent_history(&self, limit: usize) -> Result<Vec<HistoryEvent>, SourceError> {
        api::get_user_history(&self.client, &self.base_url, &self.client_id, &self.username, limit).await
    }
}
