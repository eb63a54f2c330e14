use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};
use watch_notify_models::HistoryEvent;
use watch_notify_sources::{Messenger, SourceError};

/// Minimum gap between the two messages of one notification
pub const MIN_PACING: Duration = Duration::from_millis(500);

/// Waits between the two sends
#[async_trait]
pub trait Pacer: Send + Sync {
    async fn pause(&self, interval: Duration);
}

pub struct TokioPacer;

#[async_trait]
impl Pacer for TokioPacer {
    async fn pause(&self, interval: Duration) {
        tokio::time::sleep(interval).await;
    }
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("summary message failed: {0}")]
    Summary(SourceError),
    #[error("caption message failed: {0}")]
    Caption(SourceError),
}

/// Sends one notification as two messages
///
/// The summary text always goes first. After a pause of at least
/// [`MIN_PACING`] the caption follows, as a photo when a poster URL is known
/// and as plain text otherwise. A failure of either send fails the whole
/// notification.
pub struct DualMessageDispatcher {
    messenger: Box<dyn Messenger>,
    pacer: Box<dyn Pacer>,
    pacing: Duration,
}

impl DualMessageDispatcher {
    pub fn new(messenger: Box<dyn Messenger>) -> Self {
        Self {
            messenger,
            pacer: Box::new(TokioPacer),
            pacing: MIN_PACING,
        }
    }

    pub fn with_pacer(mut self, pacer: Box<dyn Pacer>) -> Self {
        self.pacer = pacer;
        self
    }

    /// Intervals below [`MIN_PACING`] are raised to it
    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing.max(MIN_PACING);
        self
    }

    pub async fn dispatch(
        &self,
        event: &HistoryEvent,
        summary: &str,
        caption: &str,
        poster_url: Option<&str>,
    ) -> Result<(), DispatchError> {
        self.messenger
            .send_text(summary)
            .await
            .map_err(DispatchError::Summary)?;
        debug!(event_id = %event.id, "Summary message sent");

        self.pacer.pause(self.pacing).await;

        let sent = match poster_url {
            Some(url) => self.messenger.send_photo(url, caption).await,
            None => {
                info!(event_id = %event.id, "No poster available, sending caption as text");
                self.messenger.send_text(caption).await
            }
        };
        sent.map_err(DispatchError::Caption)?;
        debug!(event_id = %event.id, "Caption message sent");
        Ok(())
    }
}
