use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use crate::paths::PathManager;

pub const DEFAULT_HISTORY_LIMIT: usize = 5;
pub const MAX_HISTORY_LIMIT: usize = 100;
/// Every ten minutes (seconds-resolution cron)
pub const DEFAULT_SCHEDULE: &str = "0 */10 * * * *";
/// Gap between the two messages of a notification; the dispatcher never goes lower
pub const DEFAULT_MESSAGE_PACING: Duration = Duration::from_millis(500);

const DEFAULT_TRAKT_USERNAME: &str = "me";
const DEFAULT_TELEGRAM_USERNAME: &str = "ZYGYU";
const DEFAULT_TELEGRAM_USER_DISPLAY: &str = "ɑ𝐝𝐢𝐭𝐲𝕏 🜲";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variables: {}", .0.join(", "))]
    Missing(Vec<&'static str>),
    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct TraktConfig {
    pub client_id: String,
    pub username: String,
}

#[derive(Debug, Clone)]
pub struct TmdbConfig {
    pub api_key: String,
}

#[derive(Debug, Clone)]
pub struct OmdbConfig {
    pub api_key: String,
}

#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
    /// Handle linked from the byline (without the leading @)
    pub username: String,
    pub user_display: String,
}

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub history_limit: usize,
    pub state_file: PathBuf,
    pub message_pacing: Duration,
}

#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub schedule: String,
}

/// Runtime configuration, sourced from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub trakt: TraktConfig,
    pub tmdb: TmdbConfig,
    /// Ratings lookup is skipped entirely when no key is configured
    pub omdb: Option<OmdbConfig>,
    pub telegram: TelegramConfig,
    pub run: RunConfig,
    pub scheduler: SchedulerConfig,
}

/// Collects every missing variable so a single error lists them all
struct Vars<F> {
    lookup: F,
    missing: Vec<&'static str>,
}

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn new(lookup: F) -> Self {
        Self { lookup, missing: Vec::new() }
    }

    fn optional(&self, key: &str) -> Option<String> {
        (self.lookup)(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn required(&mut self, key: &'static str) -> String {
        match self.optional(key) {
            Some(value) => value,
            None => {
                self.missing.push(key);
                String::new()
            }
        }
    }

    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    fn state_file(&self) -> PathBuf {
        self.optional("WATCHPOST_STATE_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathManager::default().state_file())
    }

    fn finish(self) -> Result<(), ConfigError> {
        if self.missing.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Missing(self.missing))
        }
    }
}

impl TraktConfig {
    /// Only the history-provider variables, for commands that never notify
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut vars = Vars::new(lookup);
        let config = Self::read(&mut vars);
        vars.finish()?;
        Ok(config)
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn read<F: Fn(&str) -> Option<String>>(vars: &mut Vars<F>) -> Self {
        Self {
            client_id: vars.required("TRAKT_CLIENT_ID"),
            username: vars.or_default("TRAKT_USERNAME", DEFAULT_TRAKT_USERNAME),
        }
    }
}

impl RunConfig {
    /// Dedup state location alone, for commands that only touch the store
    pub fn state_file_from_env() -> PathBuf {
        Vars::new(|key: &str| std::env::var(key).ok()).state_file()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut vars = Vars::new(lookup);

        let trakt = TraktConfig::read(&mut vars);
        let tmdb = TmdbConfig {
            api_key: vars.required("TMDB_API_KEY"),
        };
        let omdb = vars
            .optional("OMDB_API_KEY")
            .map(|api_key| OmdbConfig { api_key });
        let telegram = TelegramConfig {
            bot_token: vars.required("TELEGRAM_BOT_TOKEN"),
            chat_id: vars.required("TELEGRAM_CHAT_ID"),
            username: vars
                .or_default("TELEGRAM_USERNAME", DEFAULT_TELEGRAM_USERNAME)
                .trim_start_matches('@')
                .to_string(),
            user_display: vars.or_default("TELEGRAM_USER_DISPLAY", DEFAULT_TELEGRAM_USER_DISPLAY),
        };

        let history_limit = vars
            .optional("WATCHPOST_HISTORY_LIMIT")
            .map(|raw| parse_history_limit(&raw))
            .unwrap_or(Ok(DEFAULT_HISTORY_LIMIT));
        let message_pacing = vars
            .optional("WATCHPOST_MESSAGE_PACING_MS")
            .map(|raw| parse_message_pacing(&raw))
            .unwrap_or(Ok(DEFAULT_MESSAGE_PACING));
        let state_file = vars.state_file();
        let scheduler = SchedulerConfig {
            schedule: vars.or_default("WATCHPOST_SCHEDULE", DEFAULT_SCHEDULE),
        };

        // Missing variables are reported before malformed ones
        vars.finish()?;

        Ok(Self {
            trakt,
            tmdb,
            omdb,
            telegram,
            run: RunConfig {
                history_limit: history_limit?,
                state_file,
                message_pacing: message_pacing?,
            },
            scheduler,
        })
    }

    /// Key/value view of the configuration with credentials masked
    pub fn masked_summary(&self) -> Vec<(&'static str, String)> {
        vec![
            ("TRAKT_CLIENT_ID", mask_secret(&self.trakt.client_id)),
            ("TRAKT_USERNAME", self.trakt.username.clone()),
            ("TMDB_API_KEY", mask_secret(&self.tmdb.api_key)),
            (
                "OMDB_API_KEY",
                self.omdb
                    .as_ref()
                    .map(|o| mask_secret(&o.api_key))
                    .unwrap_or_else(|| "(not set, ratings disabled)".to_string()),
            ),
            ("TELEGRAM_BOT_TOKEN", mask_secret(&self.telegram.bot_token)),
            ("TELEGRAM_CHAT_ID", self.telegram.chat_id.clone()),
            ("TELEGRAM_USERNAME", self.telegram.username.clone()),
            ("TELEGRAM_USER_DISPLAY", self.telegram.user_display.clone()),
            ("WATCHPOST_HISTORY_LIMIT", self.run.history_limit.to_string()),
            ("WATCHPOST_STATE_FILE", self.run.state_file.display().to_string()),
            (
                "WATCHPOST_MESSAGE_PACING_MS",
                self.run.message_pacing.as_millis().to_string(),
            ),
            ("WATCHPOST_SCHEDULE", self.scheduler.schedule.clone()),
        ]
    }
}

pub fn parse_history_limit(raw: &str) -> Result<usize, ConfigError> {
    let invalid = |reason: String| ConfigError::Invalid {
        key: "WATCHPOST_HISTORY_LIMIT",
        value: raw.to_string(),
        reason,
    };
    let limit: usize = raw.parse().map_err(|e| invalid(format!("{}", e)))?;
    if limit == 0 || limit > MAX_HISTORY_LIMIT {
        return Err(invalid(format!("must be between 1 and {}", MAX_HISTORY_LIMIT)));
    }
    Ok(limit)
}

/// Milliseconds between the summary and caption messages
pub fn parse_message_pacing(raw: &str) -> Result<Duration, ConfigError> {
    raw.parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|e| ConfigError::Invalid {
            key: "WATCHPOST_MESSAGE_PACING_MS",
            value: raw.to_string(),
            reason: e.to_string(),
        })
}

fn mask_secret(secret: &str) -> String {
    let visible: String = secret.chars().take(4).collect();
    if secret.chars().count() <= 8 {
        "********".to_string()
    } else {
        format!("{}********", visible)
    }
}
