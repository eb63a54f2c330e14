use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use crate::error::SourceError;
use crate::http::create_client;
use crate::telegram::api;
use crate::traits::Messenger;

/// Bot API client bound to one destination chat
#[derive(Clone)]
pub struct TelegramClient {
    client: Arc<Client>,
    base_url: String,
    bot_token: String,
    chat_id: String,
}

impl TelegramClient {
    pub fn new(bot_token: String, chat_id: String) -> Self {
        Self {
            client: Arc::new(create_client()),
            base_url: api::TELEGRAM_API_BASE.to_string(),
            bot_token,
            chat_id,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl Messenger for TelegramClient {
    async fn send_text(&self, text: &str) -> Result<(), SourceError> {
        api::send_message(&self.client, &self.base_url, &self.bot_token, &self.chat_id, text).await
    }

    async fn send_photo(&self, photo_url: &str, caption: &str) -> Result<(), SourceError> {
        api::send_photo(&self.client, &self.base_url, &self.bot_token, &self.chat_id, photo_url, caption).await
    }
}
