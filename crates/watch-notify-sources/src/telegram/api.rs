use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;
use crate::error::SourceError;
use crate::http::error_body;

pub const TELEGRAM_API_BASE: &str = "https://api.telegram.org";
const SERVICE: &str = "Telegram";
const PARSE_MODE_HTML: &str = "HTML";

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'static str,
    disable_web_page_preview: bool,
}

#[derive(Debug, Serialize)]
struct SendPhotoRequest<'a> {
    chat_id: &'a str,
    photo: &'a str,
    caption: &'a str,
    parse_mode: &'static str,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Send an HTML text message with link previews disabled
pub async fn send_message(
    client: &Client,
    base_url: &str,
    bot_token: &str,
    chat_id: &str,
    text: &str,
) -> Result<(), SourceError> {
    let request = SendMessageRequest {
        chat_id,
        text,
        parse_mode: PARSE_MODE_HTML,
        disable_web_page_preview: true,
    };
    post(client, base_url, bot_token, "sendMessage", &request).await
}

/// Send a photo by URL with an HTML caption
pub async fn send_photo(
    client: &Client,
    base_url: &str,
    bot_token: &str,
    chat_id: &str,
    photo_url: &str,
    caption: &str,
) -> Result<(), SourceError> {
    let request = SendPhotoRequest {
        chat_id,
        photo: photo_url,
        caption,
        parse_mode: PARSE_MODE_HTML,
    };
    post(client, base_url, bot_token, "sendPhoto", &request).await
}

async fn post<T: Serialize>(
    client: &Client,
    base_url: &str,
    bot_token: &str,
    method: &'static str,
    body: &T,
) -> Result<(), SourceError> {
    // The token is part of the path, so transport errors are stripped of the URL
    let url = format!("{}/bot{}/{}", base_url.trim_end_matches('/'), bot_token, method);

    let response = client
        .post(&url)
        .json(body)
        .send()
        .await
        .map_err(|e| SourceError::Transport { service: SERVICE, source: e.without_url() })?;

    let status = response.status();
    debug!(method, status = %status, "Telegram response");
    if !status.is_success() {
        return Err(SourceError::Status {
            service: SERVICE,
            operation: method,
            status: status.as_u16(),
            body: error_body(response).await,
        });
    }

    let text = response
        .text()
        .await
        .map_err(|e| SourceError::Transport { service: SERVICE, source: e.without_url() })?;
    let parsed: ApiResponse =
        serde_json::from_str(&text).map_err(SourceError::decode(SERVICE, method))?;
    if !parsed.ok {
        return Err(SourceError::Rejected {
            service: SERVICE,
            operation: method,
            description: parsed.description.unwrap_or_else(|| "no description".to_string()),
        });
    }
    Ok(())
}
