pub mod dispatch;
pub mod enrich;
pub mod format;
pub mod run;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;

pub use dispatch::{DispatchError, DualMessageDispatcher, Pacer, TokioPacer, MIN_PACING};
pub use enrich::{poster_url, EnrichedEvent, Enricher};
pub use format::{convert_to_wib, format_caption, format_runtime, format_summary};
pub use run::{Byline, NotifyOrchestrator, RenderedNotification, RunError, RunResult};
pub use store::{DedupStore, FileDedupStore, MemoryDedupStore, StoreError, WatchedState};
