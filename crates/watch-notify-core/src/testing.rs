//! In-memory collaborators for unit tests

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;
use watch_notify_models::{
    Enrichment, EventId, HistoryEvent, MediaIds, MediaKind, MediaRecord, RatingPair,
};
use watch_notify_sources::{HistoryProvider, Messenger, MetadataProvider, RatingsProvider, SourceError};
use crate::dispatch::Pacer;

fn fake_error(operation: &'static str) -> SourceError {
    SourceError::Status {
        service: "fake",
        operation,
        status: 500,
        body: "boom".to_string(),
    }
}

fn parse_time(watched_at: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(watched_at)
        .unwrap()
        .with_timezone(&Utc)
}

fn record(id: u64, title: &str, year: Option<u32>) -> MediaRecord {
    MediaRecord {
        title: Some(title.to_string()),
        year,
        ids: MediaIds {
            trakt: Some(id),
            tmdb: Some(1000 + id),
            imdb: Some(format!("tt{:07}", id)),
            ..MediaIds::default()
        },
    }
}

pub fn movie_event(id: u64, title: &str, year: Option<u32>, watched_at: &str) -> HistoryEvent {
    HistoryEvent {
        id: EventId::from(id),
        watched_at: parse_time(watched_at),
        item_type: Some("movie".to_string()),
        movie: Some(record(id, title, year)),
        show: None,
    }
}

pub fn show_event(id: u64, title: &str, year: Option<u32>, watched_at: &str) -> HistoryEvent {
    HistoryEvent {
        id: EventId::from(id),
        watched_at: parse_time(watched_at),
        item_type: Some("episode".to_string()),
        movie: None,
        show: Some(record(id, title, year)),
    }
}

pub fn unsupported_event(id: u64, watched_at: &str) -> HistoryEvent {
    HistoryEvent {
        id: EventId::from(id),
        watched_at: parse_time(watched_at),
        item_type: Some("episode".to_string()),
        movie: None,
        show: None,
    }
}

pub struct FakeHistory {
    events: Vec<HistoryEvent>,
    fail: bool,
}

impl FakeHistory {
    pub fn new(events: Vec<HistoryEvent>) -> Self {
        Self { events, fail: false }
    }

    pub fn failing() -> Self {
        Self { events: Vec::new(), fail: true }
    }
}

#[async_trait]
impl HistoryProvider for FakeHistory {
    fn provider_name(&self) -> &str {
        "fake-history"
    }

    async fn recent_history(&self, limit: usize) -> Result<Vec<HistoryEvent>, SourceError> {
        if self.fail {
            return Err(fake_error("history"));
        }
        Ok(self.events.iter().take(limit).cloned().collect())
    }
}

enum Outcome<T> {
    Found(T),
    Empty,
    Fail,
}

pub struct FakeMetadata {
    outcome: Outcome<Enrichment>,
    calls: Arc<Mutex<Vec<(MediaKind, u64)>>>,
}

impl FakeMetadata {
    pub fn returning(enrichment: Enrichment) -> Self {
        Self { outcome: Outcome::Found(enrichment), calls: Arc::default() }
    }

    pub fn empty() -> Self {
        Self { outcome: Outcome::Empty, calls: Arc::default() }
    }

    pub fn failing() -> Self {
        Self { outcome: Outcome::Fail, calls: Arc::default() }
    }

    pub fn calls(&self) -> Arc<Mutex<Vec<(MediaKind, u64)>>> {
        self.calls.clone()
    }
}

#[async_trait]
impl MetadataProvider for FakeMetadata {
    fn provider_name(&self) -> &str {
        "fake-metadata"
    }

    async fn details(&self, kind: MediaKind, id: u64) -> Result<Option<Enrichment>, SourceError> {
        self.calls.lock().unwrap().push((kind, id));
        match &self.outcome {
            Outcome::Found(e) => Ok(Some(e.clone())),
            Outcome::Empty => Ok(None),
            Outcome::Fail => Err(fake_error("details")),
        }
    }
}

pub struct FakeRatings {
    outcome: Outcome<RatingPair>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl FakeRatings {
    pub fn returning(pair: RatingPair) -> Self {
        Self { outcome: Outcome::Found(pair), calls: Arc::default() }
    }

    pub fn failing() -> Self {
        Self { outcome: Outcome::Fail, calls: Arc::default() }
    }

    pub fn calls(&self) -> Arc<Mutex<Vec<String>>> {
        self.calls.clone()
    }
}

#[async_trait]
impl RatingsProvider for FakeRatings {
    fn provider_name(&self) -> &str {
        "fake-ratings"
    }

    async fn ratings(&self, imdb_id: &str) -> Result<RatingPair, SourceError> {
        self.calls.lock().unwrap().push(imdb_id.to_string());
        match &self.outcome {
            Outcome::Found(pair) => Ok(pair.clone()),
            Outcome::Empty => Ok(RatingPair::default()),
            Outcome::Fail => Err(fake_error("ratings")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Text(String),
    Photo(String, String),
    Pause(Duration),
}

/// Ordered log of sends and pauses shared between messenger and pacer fakes
#[derive(Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<Step>>>);

impl Journal {
    pub fn push(&self, step: Step) {
        self.0.lock().unwrap().push(step);
    }

    pub fn steps(&self) -> Vec<Step> {
        self.0.lock().unwrap().clone()
    }
}

/// Records successful sends; the send attempt numbered `fail_at` (0-based) fails
pub struct RecordingMessenger {
    journal: Journal,
    fail_at: Option<usize>,
    attempts: AtomicUsize,
    sent_at: Arc<Mutex<Vec<Instant>>>,
}

impl RecordingMessenger {
    pub fn new(journal: Journal, fail_at: Option<usize>) -> Self {
        Self {
            journal,
            fail_at,
            attempts: AtomicUsize::new(0),
            sent_at: Arc::default(),
        }
    }

    /// Tokio clock reading of every successful send
    pub fn sent_at(&self) -> Arc<Mutex<Vec<Instant>>> {
        self.sent_at.clone()
    }

    fn attempt(&self, operation: &'static str) -> Result<(), SourceError> {
        let n = self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_at == Some(n) {
            return Err(fake_error(operation));
        }
        self.sent_at.lock().unwrap().push(Instant::now());
        Ok(())
    }
}

#[async_trait]
impl Messenger for RecordingMessenger {
    async fn send_text(&self, text: &str) -> Result<(), SourceError> {
        self.attempt("sendMessage")?;
        self.journal.push(Step::Text(text.to_string()));
        Ok(())
    }

    async fn send_photo(&self, photo_url: &str, caption: &str) -> Result<(), SourceError> {
        self.attempt("sendPhoto")?;
        self.journal.push(Step::Photo(photo_url.to_string(), caption.to_string()));
        Ok(())
    }
}

pub struct RecordingPacer {
    journal: Journal,
}

impl RecordingPacer {
    pub fn new(journal: Journal) -> Self {
        Self { journal }
    }
}

#[async_trait]
impl Pacer for RecordingPacer {
    async fn pause(&self, interval: Duration) {
        self.journal.push(Step::Pause(interval));
    }
}
