use serde::{Deserialize, Serialize};

/// Provider identifiers attached to a movie or show
///
/// Field names follow the history provider's `ids` object so the struct
/// deserializes straight from the feed. Unknown keys are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default, Hash)]
pub struct MediaIds {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trakt: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imdb: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tmdb: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tvdb: Option<u64>,
}

impl MediaIds {
    /// Metadata-provider numeric ID, if the feed carried one
    pub fn tmdb_id(&self) -> Option<u64> {
        self.tmdb.filter(|id| *id != 0)
    }

    /// External-database ID with stray slashes removed (the feed sometimes includes them)
    pub fn imdb_id(&self) -> Option<String> {
        self.imdb
            .as_deref()
            .map(|s| s.replace('/', ""))
            .filter(|s| !s.is_empty())
    }
}
