use super::*;
use crate::store::{FileDedupStore, MemoryDedupStore, WatchedState};
use crate::testing::{
    movie_event, show_event, unsupported_event, FakeHistory, FakeMetadata, FakeRatings, Journal,
    RecordingMessenger, RecordingPacer, Step,
};
use tempfile::TempDir;
use watch_notify_models::{Enrichment, RatingPair};
use watch_notify_sources::MetadataProvider;

fn poster_enrichment() -> Enrichment {
    Enrichment {
        overview: Some("An overview.".to_string()),
        runtime: Some(120),
        vote_average: 7.25,
        vote_count: 100,
        poster_path: Some("/poster.jpg".to_string()),
        genres: vec!["Drama".to_string()],
    }
}

fn orchestrator(
    events: Vec<HistoryEvent>,
    metadata: Box<dyn MetadataProvider>,
    store: Box<dyn DedupStore>,
    journal: &Journal,
    fail_at: Option<usize>,
) -> NotifyOrchestrator {
    let dispatcher =
        DualMessageDispatcher::new(Box::new(RecordingMessenger::new(journal.clone(), fail_at)))
            .with_pacer(Box::new(RecordingPacer::new(journal.clone())));
    NotifyOrchestrator::new(
        Box::new(FakeHistory::new(events)),
        Enricher::new(metadata),
        dispatcher,
        store,
        Byline {
            display_name: "Viewer".to_string(),
            handle: "viewer".to_string(),
        },
    )
}

fn five_movies() -> Vec<HistoryEvent> {
    (1..=5)
        .rev()
        .map(|id| movie_event(id, &format!("Movie {}", id), Some(2020), "2024-01-01T00:00:00Z"))
        .collect()
}

fn summaries(journal: &Journal) -> Vec<String> {
    journal
        .steps()
        .into_iter()
        .filter_map(|step| match step {
            Step::Text(text) if text.starts_with("👤") => Some(text),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn test_notifies_new_events_in_feed_order() {
    let journal = Journal::default();
    let events = vec![
        movie_event(30, "Newest", Some(2024), "2024-03-01T12:00:00Z"),
        show_event(20, "Middle", Some(2022), "2024-02-01T12:00:00Z"),
        movie_event(10, "Oldest", Some(1999), "2024-01-01T12:00:00Z"),
    ];
    let mut orch = orchestrator(
        events,
        Box::new(FakeMetadata::returning(poster_enrichment())),
        Box::new(MemoryDedupStore::new()),
        &journal,
        None,
    );

    let result = orch.run().await.unwrap();

    assert_eq!(result.fetched, 3);
    assert_eq!(result.notified, 3);
    let sent = summaries(&journal);
    assert_eq!(sent.len(), 3);
    assert!(sent[0].contains("<b>Newest</b>"));
    assert!(sent[1].contains("<b>Middle</b>"));
    assert!(sent[2].contains("<b>Oldest</b>"));

    let steps = journal.steps();
    assert_eq!(steps.len(), 9);
    assert_eq!(steps[1], Step::Pause(crate::MIN_PACING));
    assert!(matches!(&steps[2], Step::Photo(url, _) if url == "https://image.tmdb.org/t/p/w500/poster.jpg"));

    let state = orch.store().state();
    assert_eq!(state.len(), 3);
    assert_eq!(state.items["30"], "2024-03-01T12:00:00.000Z");
    assert!(state.last_check.is_some());
}

#[tokio::test]
async fn test_second_run_with_same_history_sends_nothing() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("watched.json");

    let first_journal = Journal::default();
    let mut first = orchestrator(
        five_movies(),
        Box::new(FakeMetadata::returning(poster_enrichment())),
        Box::new(FileDedupStore::open(&path).unwrap()),
        &first_journal,
        None,
    );
    assert_eq!(first.run().await.unwrap().notified, 5);

    let second_journal = Journal::default();
    let mut second = orchestrator(
        five_movies(),
        Box::new(FakeMetadata::returning(poster_enrichment())),
        Box::new(FileDedupStore::open(&path).unwrap()),
        &second_journal,
        None,
    );
    let result = second.run().await.unwrap();

    assert_eq!(result.notified, 0);
    assert_eq!(result.skipped_seen, 5);
    assert!(second_journal.steps().is_empty());
}

#[tokio::test]
async fn test_known_events_are_never_dispatched() {
    let journal = Journal::default();
    let mut state = WatchedState::default();
    state
        .items
        .insert("2".to_string(), "2024-01-01T00:00:00.000Z".to_string());
    let events = vec![
        movie_event(3, "Three", Some(2020), "2024-01-03T00:00:00Z"),
        movie_event(2, "Two", Some(2020), "2024-01-02T00:00:00Z"),
        movie_event(1, "One", Some(2020), "2024-01-01T00:00:00Z"),
    ];
    let mut orch = orchestrator(
        events,
        Box::new(FakeMetadata::returning(poster_enrichment())),
        Box::new(MemoryDedupStore::with_state(state)),
        &journal,
        None,
    );

    let result = orch.run().await.unwrap();

    assert_eq!(result.notified, 2);
    assert_eq!(result.skipped_seen, 1);
    assert!(summaries(&journal).iter().all(|s| !s.contains("<b>Two</b>")));
    assert_eq!(orch.store().state().items["2"], "2024-01-01T00:00:00.000Z");
}

#[tokio::test]
async fn test_unsupported_events_are_skipped_and_not_recorded() {
    let journal = Journal::default();
    let events = vec![
        unsupported_event(9, "2024-01-02T00:00:00Z"),
        movie_event(8, "Film", Some(2020), "2024-01-01T00:00:00Z"),
    ];
    let mut orch = orchestrator(
        events,
        Box::new(FakeMetadata::returning(poster_enrichment())),
        Box::new(MemoryDedupStore::new()),
        &journal,
        None,
    );

    let result = orch.run().await.unwrap();
    assert_eq!(result.notified, 1);
    assert_eq!(result.skipped_unsupported, 1);
    assert!(!orch.store().contains(&EventId::from(9)));

    // Re-evaluated (and skipped again) on the next run
    let again = orch.run().await.unwrap();
    assert_eq!(again.skipped_unsupported, 1);
    assert_eq!(again.skipped_seen, 1);
}

#[tokio::test]
async fn test_dispatch_failure_keeps_earlier_commits() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("watched.json");
    let journal = Journal::default();
    // Sends 0-3 belong to the first two events; send 4 is the third event's summary
    let mut orch = orchestrator(
        five_movies(),
        Box::new(FakeMetadata::returning(poster_enrichment())),
        Box::new(FileDedupStore::open(&path).unwrap()),
        &journal,
        Some(4),
    );

    let err = orch.run().await.unwrap_err();

    match err {
        RunError::Dispatch { event_id, notified, error } => {
            assert_eq!(event_id, EventId::from(3));
            assert_eq!(notified, 2);
            assert!(matches!(error, DispatchError::Summary(_)));
        }
        other => panic!("expected dispatch error, got {other}"),
    }

    let persisted = FileDedupStore::open(&path).unwrap();
    assert_eq!(persisted.state().len(), 2);
    assert!(persisted.contains(&EventId::from(5)));
    assert!(persisted.contains(&EventId::from(4)));
    assert!(!persisted.contains(&EventId::from(3)));
}

#[tokio::test]
async fn test_failed_caption_is_not_committed() {
    let journal = Journal::default();
    let mut orch = orchestrator(
        vec![movie_event(1, "Only", Some(2020), "2024-01-01T00:00:00Z")],
        Box::new(FakeMetadata::returning(poster_enrichment())),
        Box::new(MemoryDedupStore::new()),
        &journal,
        Some(1),
    );

    assert!(matches!(orch.run().await, Err(RunError::Dispatch { notified: 0, .. })));
    assert!(orch.store().state().is_empty());
}

#[tokio::test]
async fn test_degraded_enrichment_still_notifies_as_text() {
    let journal = Journal::default();
    let dispatcher =
        DualMessageDispatcher::new(Box::new(RecordingMessenger::new(journal.clone(), None)))
            .with_pacer(Box::new(RecordingPacer::new(journal.clone())));
    let mut orch = NotifyOrchestrator::new(
        Box::new(FakeHistory::new(vec![movie_event(1, "Lost Film", Some(1950), "2024-01-01T00:00:00Z")])),
        Enricher::new(Box::new(FakeMetadata::failing())).with_ratings(Box::new(FakeRatings::failing())),
        dispatcher,
        Box::new(MemoryDedupStore::new()),
        Byline {
            display_name: "Viewer".to_string(),
            handle: "viewer".to_string(),
        },
    );

    let result = orch.run().await.unwrap();
    assert_eq!(result.notified, 1);

    let steps = journal.steps();
    assert_eq!(steps.len(), 3);
    match &steps[2] {
        Step::Text(caption) => {
            assert!(caption.contains("No overview available."));
            assert!(caption.contains("▪️<b>Tomatometer</b>  N/A"));
            assert!(caption.contains("N/A/10"));
        }
        other => panic!("expected text caption, got {other:?}"),
    }
}

#[tokio::test]
async fn test_ratings_feed_the_caption() {
    let journal = Journal::default();
    let ratings = FakeRatings::returning(RatingPair {
        imdb_rating: Some("6.1".to_string()),
        tomato_meter: Some("55%".to_string()),
    });
    let rating_calls = ratings.calls();
    let dispatcher =
        DualMessageDispatcher::new(Box::new(RecordingMessenger::new(journal.clone(), None)))
            .with_pacer(Box::new(RecordingPacer::new(journal.clone())));
    let mut orch = NotifyOrchestrator::new(
        Box::new(FakeHistory::new(vec![movie_event(7, "Rated", Some(2001), "2024-01-01T00:00:00Z")])),
        Enricher::new(Box::new(FakeMetadata::empty())).with_ratings(Box::new(ratings)),
        dispatcher,
        Box::new(MemoryDedupStore::new()),
        Byline {
            display_name: "Viewer".to_string(),
            handle: "viewer".to_string(),
        },
    );

    orch.run().await.unwrap();

    assert_eq!(*rating_calls.lock().unwrap(), vec!["tt0000007".to_string()]);
    let steps = journal.steps();
    assert!(matches!(&steps[2], Step::Text(c) if c.contains("<b>55%</b>") && c.contains("<b>6.1</b>/10")));
}

#[tokio::test]
async fn test_history_failure_is_fatal() {
    let journal = Journal::default();
    let dispatcher =
        DualMessageDispatcher::new(Box::new(RecordingMessenger::new(journal.clone(), None)))
            .with_pacer(Box::new(RecordingPacer::new(journal.clone())));
    let mut orch = NotifyOrchestrator::new(
        Box::new(FakeHistory::failing()),
        Enricher::new(Box::new(FakeMetadata::empty())),
        dispatcher,
        Box::new(MemoryDedupStore::new()),
        Byline {
            display_name: "Viewer".to_string(),
            handle: "viewer".to_string(),
        },
    );

    assert!(matches!(orch.run().await, Err(RunError::History(_))));
    assert!(journal.steps().is_empty());
}

#[tokio::test]
async fn test_dry_run_renders_without_sending() {
    let journal = Journal::default();
    let mut orch = orchestrator(
        five_movies(),
        Box::new(FakeMetadata::returning(poster_enrichment())),
        Box::new(MemoryDedupStore::new()),
        &journal,
        None,
    )
    .with_dry_run(true)
    .with_limit(2);

    let result = orch.run().await.unwrap();

    assert_eq!(result.fetched, 2);
    assert_eq!(result.notified, 0);
    assert_eq!(result.previews.len(), 2);
    assert_eq!(result.previews[0].event_id, "5");
    assert!(result.previews[0].summary.contains("<b>Movie 5</b>"));
    assert_eq!(
        result.previews[0].poster_url.as_deref(),
        Some("https://image.tmdb.org/t/p/w500/poster.jpg")
    );
    assert!(journal.steps().is_empty());
    assert!(orch.store().state().is_empty());
}
