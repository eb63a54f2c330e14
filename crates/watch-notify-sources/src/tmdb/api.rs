use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};
use watch_notify_models::{Enrichment, MediaKind};
use crate::error::SourceError;

pub const TMDB_API_BASE: &str = "https://api.themoviedb.org/3";
const SERVICE: &str = "TMDB";

#[derive(Debug, Deserialize)]
struct TmdbGenre {
    name: String,
}

/// Subset of the movie and TV detail payloads that notifications use
#[derive(Debug, Deserialize)]
struct TmdbDetails {
    #[serde(default)]
    overview: Option<String>,
    #[serde(default)]
    runtime: Option<u32>,
    /// TV payloads carry per-episode runtimes instead of `runtime`
    #[serde(default)]
    episode_run_time: Vec<u32>,
    #[serde(default)]
    vote_average: Option<f64>,
    #[serde(default)]
    vote_count: Option<u64>,
    #[serde(default)]
    poster_path: Option<String>,
    #[serde(default)]
    genres: Vec<TmdbGenre>,
}

impl From<TmdbDetails> for Enrichment {
    fn from(details: TmdbDetails) -> Self {
        Enrichment {
            overview: details.overview.filter(|o| !o.trim().is_empty()),
            runtime: details
                .runtime
                .or_else(|| details.episode_run_time.first().copied()),
            vote_average: details.vote_average.unwrap_or(0.0),
            vote_count: details.vote_count.unwrap_or(0),
            poster_path: details.poster_path.filter(|p| !p.is_empty()),
            genres: details.genres.into_iter().map(|g| g.name).collect(),
        }
    }
}

fn path_segment(kind: MediaKind) -> &'static str {
    match kind {
        MediaKind::Movie => "movie",
        MediaKind::Show => "tv",
    }
}

/// Fetch movie or TV details
///
/// A non-success status is logged and reported as `Ok(None)`; only
/// transport and decode failures are errors.
pub async fn get_details(
    client: &Client,
    base_url: &str,
    api_key: &str,
    kind: MediaKind,
    id: u64,
) -> Result<Option<Enrichment>, SourceError> {
    let url = format!("{}/{}/{}", base_url.trim_end_matches('/'), path_segment(kind), id);
    debug!(url = %url, "Fetching TMDB details");

    let response = client
        .get(&url)
        .query(&[("api_key", api_key)])
        .send()
        .await
        .map_err(|e| SourceError::Transport { service: SERVICE, source: e.without_url() })?;

    let status = response.status();
    if !status.is_success() {
        warn!(status = status.as_u16(), tmdb_id = id, kind = %kind, "TMDB API error");
        return Ok(None);
    }

    let body = response
        .text()
        .await
        .map_err(SourceError::transport(SERVICE))?;
    let details: TmdbDetails =
        serde_json::from_str(&body).map_err(SourceError::decode(SERVICE, "details"))?;
    Ok(Some(details.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tv_details_fall_back_to_episode_runtime() {
        let details: TmdbDetails = serde_json::from_str(
            r#"{ "name": "Severance", "overview": "", "episode_run_time": [55, 60], "vote_average": 8.4, "genres": [] }"#,
        )
        .unwrap();
        let enrichment = Enrichment::from(details);
        assert_eq!(enrichment.runtime, Some(55));
        assert_eq!(enrichment.overview, None);
        assert_eq!(enrichment.vote_count, 0);
    }

    #[test]
    fn test_null_fields_become_defaults() {
        let details: TmdbDetails = serde_json::from_str(
            r#"{ "overview": null, "runtime": null, "vote_average": null, "poster_path": null }"#,
        )
        .unwrap();
        assert_eq!(Enrichment::from(details), Enrichment::default());
    }
}
