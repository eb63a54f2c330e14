use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};
use watch_notify_models::RatingPair;
use crate::error::SourceError;

pub const OMDB_API_BASE: &str = "http://www.omdbapi.com";
pub const OMDB_TIMEOUT: Duration = Duration::from_secs(5);
const SERVICE: &str = "OMDb";
const ROTTEN_TOMATOES: &str = "Rotten Tomatoes";

#[derive(Debug, Deserialize)]
struct OmdbRating {
    #[serde(rename = "Source")]
    source: String,
    #[serde(rename = "Value")]
    value: String,
}

#[derive(Debug, Deserialize)]
struct OmdbResponse {
    #[serde(rename = "Response", default)]
    response: String,
    #[serde(rename = "imdbRating", default)]
    imdb_rating: Option<String>,
    #[serde(rename = "Ratings", default)]
    ratings: Vec<OmdbRating>,
}

impl From<OmdbResponse> for RatingPair {
    fn from(body: OmdbResponse) -> Self {
        if body.response != "True" {
            return RatingPair::default();
        }
        let imdb_rating = body
            .imdb_rating
            .filter(|r| !r.is_empty() && r != "N/A");
        let tomato_meter = body
            .ratings
            .into_iter()
            .find(|r| r.source == ROTTEN_TOMATOES)
            .map(|r| r.value)
            .filter(|v| !v.is_empty() && v != "N/A");
        RatingPair { imdb_rating, tomato_meter }
    }
}

/// Look up IMDb and Rotten Tomatoes ratings for an IMDb ID
///
/// Non-success statuses and `"Response": "False"` bodies yield an empty pair.
pub async fn get_ratings(
    client: &Client,
    base_url: &str,
    api_key: &str,
    imdb_id: &str,
) -> Result<RatingPair, SourceError> {
    let url = format!("{}/", base_url.trim_end_matches('/'));
    debug!(imdb_id, "Fetching OMDb ratings");

    let response = client
        .get(&url)
        .query(&[("i", imdb_id), ("apikey", api_key)])
        .timeout(OMDB_TIMEOUT)
        .send()
        .await
        .map_err(|e| SourceError::Transport { service: SERVICE, source: e.without_url() })?;

    let status = response.status();
    if !status.is_success() {
        warn!(status = status.as_u16(), imdb_id, "OMDb API error");
        return Ok(RatingPair::default());
    }

    let body = response.text().await.map_err(SourceError::transport(SERVICE))?;
    let parsed: OmdbResponse =
        serde_json::from_str(&body).map_err(SourceError::decode(SERVICE, "ratings"))?;
    Ok(parsed.into())
}
