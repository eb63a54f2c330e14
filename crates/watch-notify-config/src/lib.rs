pub mod config;
pub mod paths;

pub use config::{
    Config, ConfigError, OmdbConfig, RunConfig, SchedulerConfig, TelegramConfig, TmdbConfig,
    TraktConfig, DEFAULT_HISTORY_LIMIT, DEFAULT_MESSAGE_PACING, DEFAULT_SCHEDULE, MAX_HISTORY_LIMIT,
};
pub use config::{parse_history_limit, parse_message_pacing};
pub use paths::{container_base_path, PathManager};
