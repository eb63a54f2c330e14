pub mod config;
pub mod daemon;
pub mod history;
pub mod run;
pub mod state;

use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use std::path::Path;
use watch_notify_config::Config;
use watch_notify_core::{
    Byline, DualMessageDispatcher, Enricher, FileDedupStore, NotifyOrchestrator,
};
use watch_notify_sources::{OmdbClient, TelegramClient, TmdbClient, TraktClient};

pub(crate) fn load_config() -> Result<Config> {
    Config::from_env().wrap_err("Invalid configuration")
}

pub(crate) fn open_store(path: &Path) -> Result<FileDedupStore> {
    FileDedupStore::open(path).wrap_err("Failed to open dedup store")
}

/// Wire the live clients into an orchestrator
pub(crate) fn build_orchestrator(config: &Config, store: FileDedupStore) -> NotifyOrchestrator {
    let history = TraktClient::new(config.trakt.client_id.clone(), config.trakt.username.clone());

    let mut enricher = Enricher::new(Box::new(TmdbClient::new(config.tmdb.api_key.clone())));
    if let Some(omdb) = &config.omdb {
        enricher = enricher.with_ratings(Box::new(OmdbClient::new(omdb.api_key.clone())));
    }

    let messenger = TelegramClient::new(
        config.telegram.bot_token.clone(),
        config.telegram.chat_id.clone(),
    );

    NotifyOrchestrator::new(
        Box::new(history),
        enricher,
        DualMessageDispatcher::new(Box::new(messenger))
            .with_pacing(config.run.message_pacing),
        Box::new(store),
        Byline {
            display_name: config.telegram.user_display.clone(),
            handle: config.telegram.username.clone(),
        },
    )
    .with_limit(config.run.history_limit)
}
