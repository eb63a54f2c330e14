use reqwest::{Client, StatusCode};
use tracing::debug;
use watch_notify_models::HistoryEvent;
use crate::error::SourceError;
use crate::http::error_body;

pub const TRAKT_API_BASE: &str = "https://api.trakt.tv";
const SERVICE: &str = "Trakt";

/// Fetch one page of a user's watch history
///
/// Only the public client-id header is sent; the profile must be public
/// (or `me` with a client that Trakt associates with the account).
pub async fn get_user_history(
    client: &Client,
    base_url: &str,
    client_id: &str,
    username: &str,
    limit: usize,
) -> Result<Vec<HistoryEvent>, SourceError> {
    let url = format!(
        "{}/users/{}/history",
        base_url.trim_end_matches('/'),
        urlencoding::encode(username)
    );
    debug!(url = %url, limit, "Fetching Trakt history");

    let response = client
        .get(&url)
        .query(&[("limit", limit)])
        .header("Content-Type", "application/json")
        .header("trakt-api-version", "2")
        .header("trakt-api-key", client_id)
        .send()
        .await
        .map_err(SourceError::transport(SERVICE))?;

    let status = response.status();
    debug!(status = %status, "Trakt history response");
    // Only a plain 200 carries a history page
    if status != StatusCode::OK {
        return Err(SourceError::Status {
            service: SERVICE,
            operation: "history",
            status: status.as_u16(),
            body: error_body(response).await,
        });
    }

    let body = response.text().await.map_err(SourceError::transport(SERVICE))?;
    serde_json::from_str(&body).map_err(SourceError::decode(SERVICE, "history"))
}
