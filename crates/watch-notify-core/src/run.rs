use serde::Serialize;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, instrument};
use watch_notify_models::{EventId, HistoryEvent};
use watch_notify_sources::{HistoryProvider, SourceError};
use crate::dispatch::{DispatchError, DualMessageDispatcher};
use crate::enrich::Enricher;
use crate::format::{format_caption, format_summary};
use crate::store::{DedupStore, StoreError};

pub const DEFAULT_HISTORY_LIMIT: usize = 5;

#[derive(Debug, Error)]
pub enum RunError {
    #[error("failed to fetch watch history: {0}")]
    History(SourceError),

    #[error("failed to load dedup store: {0}")]
    Store(StoreError),

    #[error("notification for event {event_id} failed after {notified} notification(s) this run: {error}")]
    Dispatch {
        event_id: EventId,
        notified: usize,
        error: DispatchError,
    },

    #[error("notification for event {event_id} was sent but could not be recorded: {error}")]
    Commit { event_id: EventId, error: StoreError },
}

/// Who the summary message credits
#[derive(Debug, Clone)]
pub struct Byline {
    pub display_name: String,
    /// Messaging handle, linked from the display name
    pub handle: String,
}

/// Messages rendered for one event (dry runs only)
#[derive(Debug, Clone, Serialize)]
pub struct RenderedNotification {
    pub event_id: String,
    pub title: String,
    pub summary: String,
    pub caption: String,
    pub poster_url: Option<String>,
}

#[derive(Debug, Default)]
pub struct RunResult {
    pub fetched: usize,
    pub notified: usize,
    pub skipped_seen: usize,
    pub skipped_unsupported: usize,
    pub previews: Vec<RenderedNotification>,
    pub duration: Duration,
}

/// Drives one batch: fetch history, filter, enrich, format, dispatch, commit
///
/// Events are handled strictly in the order the history provider returns
/// them. An event is committed to the dedup store right after both of its
/// messages are sent; a dispatch failure stops the run, leaving that event
/// and everything after it for the next run.
pub struct NotifyOrchestrator {
    history: Box<dyn HistoryProvider>,
    enricher: Enricher,
    dispatcher: DualMessageDispatcher,
    store: Box<dyn DedupStore>,
    byline: Byline,
    limit: usize,
    dry_run: bool,
}

impl NotifyOrchestrator {
    pub fn new(
        history: Box<dyn HistoryProvider>,
        enricher: Enricher,
        dispatcher: DualMessageDispatcher,
        store: Box<dyn DedupStore>,
        byline: Byline,
    ) -> Self {
        Self {
            history,
            enricher,
            dispatcher,
            store,
            byline,
            limit: DEFAULT_HISTORY_LIMIT,
            dry_run: false,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Render without sending or committing
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn store(&self) -> &dyn DedupStore {
        self.store.as_ref()
    }

    #[instrument(skip(self), fields(limit = self.limit, dry_run = self.dry_run))]
    pub async fn run(&mut self) -> Result<RunResult, RunError> {
        let start = Instant::now();
        self.store.load().map_err(RunError::Store)?;

        let events = self
            .history
            .recent_history(self.limit)
            .await
            .map_err(RunError::History)?;
        info!(
            provider = self.history.provider_name(),
            count = events.len(),
            "Found recent history items"
        );

        let mut result = RunResult {
            fetched: events.len(),
            ..RunResult::default()
        };

        for event in &events {
            if self.store.contains(&event.id) {
                debug!(event_id = %event.id, "Already notified, skipping");
                result.skipped_seen += 1;
                continue;
            }
            // Not recorded: the same entry is looked at again next run
            if !event.is_supported() {
                info!(event_id = %event.id, item_type = ?event.item_type, "Skipping episode or unknown type");
                result.skipped_unsupported += 1;
                continue;
            }

            self.process(event, &mut result).await?;
        }

        result.duration = start.elapsed();
        info!(
            notified = result.notified,
            skipped_seen = result.skipped_seen,
            skipped_unsupported = result.skipped_unsupported,
            duration_ms = result.duration.as_millis() as u64,
            "Check completed"
        );
        Ok(result)
    }

    async fn process(&mut self, event: &HistoryEvent, result: &mut RunResult) -> Result<(), RunError> {
        let Some((kind, record)) = event.media() else {
            return Ok(());
        };
        info!(event_id = %event.id, kind = %kind, title = event.title(), "Processing new item");

        let enriched = self.enricher.enrich(kind, record).await;
        let summary = format_summary(event, &self.byline.display_name, &self.byline.handle);
        let caption = format_caption(event, enriched.enrichment.as_ref(), &enriched.ratings);

        if self.dry_run {
            info!(event_id = %event.id, "Dry run, not sending");
            result.previews.push(RenderedNotification {
                event_id: event.id.to_string(),
                title: event.title().to_string(),
                summary,
                caption,
                poster_url: enriched.poster_url,
            });
            return Ok(());
        }

        self.dispatcher
            .dispatch(event, &summary, &caption, enriched.poster_url.as_deref())
            .await
            .map_err(|error| RunError::Dispatch {
                event_id: event.id.clone(),
                notified: result.notified,
                error,
            })?;

        self.store
            .commit(&event.id, event.watched_at)
            .map_err(|error| RunError::Commit {
                event_id: event.id.clone(),
                error,
            })?;
        result.notified += 1;
        info!(event_id = %event.id, title = event.title(), "Notification sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests;
