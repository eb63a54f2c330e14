use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};
use watch_notify_models::EventId;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read state file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write state file {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("state file {} is corrupt (refusing to reset it): {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to serialize state: {0}")]
    Serialize(serde_json::Error),
}

/// Persisted dedup state: event ID → `watched_at`, plus the time of the last write
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WatchedState {
    #[serde(default)]
    pub items: BTreeMap<String, String>,
    #[serde(rename = "lastCheck", default, serialize_with = "serialize_millis")]
    pub last_check: Option<DateTime<Utc>>,
}

/// RFC 3339 with millisecond precision and `Z`, the same shape as the `items` values
fn serialize_millis<S: Serializer>(
    value: &Option<DateTime<Utc>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(t) => serializer.serialize_some(&t.to_rfc3339_opts(SecondsFormat::Millis, true)),
        None => serializer.serialize_none(),
    }
}

impl WatchedState {
    pub fn contains(&self, event_id: &EventId) -> bool {
        self.items.contains_key(event_id.as_str())
    }

    pub fn record(&mut self, event_id: &EventId, watched_at: DateTime<Utc>, now: DateTime<Utc>) {
        self.items.insert(
            event_id.to_string(),
            watched_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        );
        self.last_check = Some(now);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Record of events that have already been notified
///
/// An ID present here is never notified again. `commit` must persist before
/// returning so a crash never loses a sent notification.
pub trait DedupStore: Send + Sync {
    /// (Re)load persisted state; called at the start of every run
    fn load(&mut self) -> Result<(), StoreError>;

    fn contains(&self, event_id: &EventId) -> bool;

    fn commit(&mut self, event_id: &EventId, watched_at: DateTime<Utc>) -> Result<(), StoreError>;

    fn state(&self) -> &WatchedState;
}

/// Dedup store backed by a single JSON file
pub struct FileDedupStore {
    path: PathBuf,
    state: WatchedState,
}

impl FileDedupStore {
    /// Open the store, reading the file if it exists
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let state = read_state(&path)?;
        Ok(Self { path, state })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Drop one entry so the event is notified again on the next run
    pub fn forget(&mut self, event_id: &EventId) -> Result<bool, StoreError> {
        let mut state = read_state(&self.path)?;
        let removed = state.items.remove(event_id.as_str()).is_some();
        if removed {
            write_state(&self.path, &state)?;
            info!(event_id = %event_id, "Removed event from dedup store");
        }
        self.state = state;
        Ok(removed)
    }
}

impl DedupStore for FileDedupStore {
    fn load(&mut self) -> Result<(), StoreError> {
        self.state = read_state(&self.path)?;
        debug!(path = %self.path.display(), entries = self.state.len(), "Loaded dedup store");
        Ok(())
    }

    fn contains(&self, event_id: &EventId) -> bool {
        self.state.contains(event_id)
    }

    fn commit(&mut self, event_id: &EventId, watched_at: DateTime<Utc>) -> Result<(), StoreError> {
        // Read-modify-write so each commit is durable on its own
        let mut state = read_state(&self.path)?;
        state.record(event_id, watched_at, Utc::now());
        write_state(&self.path, &state)?;
        self.state = state;
        debug!(event_id = %event_id, "Committed event to dedup store");
        Ok(())
    }

    fn state(&self) -> &WatchedState {
        &self.state
    }
}

/// Store that lives only as long as the process
#[derive(Debug, Default)]
pub struct MemoryDedupStore {
    state: WatchedState,
}

impl MemoryDedupStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: WatchedState) -> Self {
        Self { state }
    }
}

impl DedupStore for MemoryDedupStore {
    fn load(&mut self) -> Result<(), StoreError> {
        Ok(())
    }

    fn contains(&self, event_id: &EventId) -> bool {
        self.state.contains(event_id)
    }

    fn commit(&mut self, event_id: &EventId, watched_at: DateTime<Utc>) -> Result<(), StoreError> {
        self.state.record(event_id, watched_at, Utc::now());
        Ok(())
    }

    fn state(&self) -> &WatchedState {
        &self.state
    }
}

fn read_state(path: &Path) -> Result<WatchedState, StoreError> {
    if !path.exists() {
        return Ok(WatchedState::default());
    }
    let content = std::fs::read_to_string(path).map_err(|source| StoreError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    if content.trim().is_empty() {
        return Ok(WatchedState::default());
    }
    serde_json::from_str(&content).map_err(|source| StoreError::Corrupt {
        path: path.to_path_buf(),
        source,
    })
}

fn write_state(path: &Path, state: &WatchedState) -> Result<(), StoreError> {
    let write_err = |source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }
    let content = serde_json::to_string_pretty(state).map_err(StoreError::Serialize)?;

    // Atomic write: temp file in the same directory, then rename
    let temp_path = path.with_extension("json.tmp");
    std::fs::write(&temp_path, content).map_err(write_err)?;
    std::fs::rename(&temp_path, path).map_err(write_err)?;
    Ok(())
}
