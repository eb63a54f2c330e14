use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use crate::media::{MediaKind, MediaRecord};

/// History entry identifier
///
/// The feed sends numeric IDs; the dedup store keys them as strings, so
/// both representations deserialize into the same value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for EventId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for EventId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for EventId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Number(u64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Number(n) => EventId::from(n),
            RawId::Text(s) => EventId(s),
        })
    }
}

/// One entry from the watch-history feed
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryEvent {
    pub id: EventId,
    pub watched_at: DateTime<Utc>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub item_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movie: Option<MediaRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show: Option<MediaRecord>,
}

impl HistoryEvent {
    /// The payload this event is about. Movies win over shows; events with
    /// neither are unsupported.
    pub fn media(&self) -> Option<(MediaKind, &MediaRecord)> {
        if let Some(movie) = &self.movie {
            return Some((MediaKind::Movie, movie));
        }
        self.show.as_ref().map(|show| (MediaKind::Show, show))
    }

    pub fn is_supported(&self) -> bool {
        self.media().is_some()
    }

    pub fn title(&self) -> &str {
        self.media()
            .and_then(|(_, record)| record.title.as_deref())
            .filter(|t| !t.is_empty())
            .unwrap_or("Unknown")
    }

    pub fn year(&self) -> Option<u32> {
        self.media().and_then(|(_, record)| record.year)
    }
}
