pub mod error;
pub mod http;
pub mod omdb;
pub mod telegram;
pub mod tmdb;
pub mod traits;
pub mod trakt;

pub use error::SourceError;
pub use omdb::OmdbClient;
pub use telegram::TelegramClient;
pub use tmdb::TmdbClient;
pub use traits::{HistoryProvider, Messenger, MetadataProvider, RatingsProvider};
pub use trakt::TraktClient;
