//! Notification message bodies
//!
//! Both messages are rendered as Telegram HTML. The fallback strings
//! ("N/A", "No overview available.", "N/A/10") are shown to readers verbatim.

use chrono::{DateTime, Duration, Utc};
use watch_notify_models::{Enrichment, HistoryEvent, RatingPair};

const NOT_AVAILABLE: &str = "N/A";
const NO_OVERVIEW: &str = "No overview available.";
/// Photo captions are capped at 1024 characters; the rest of the template stays well under the remainder
const MAX_OVERVIEW_CHARS: usize = 600;
const PROFILE_BASE_URL: &str = "https://t.me";
/// Display offset for watch timestamps (Western Indonesia Time, UTC+7)
const WIB_OFFSET_HOURS: i64 = 7;
const WIB_LABEL: &str = "WIB";

/// Escape text for Telegram's HTML parse mode
fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn truncate_overview(overview: &str) -> String {
    if overview.chars().count() <= MAX_OVERVIEW_CHARS {
        return overview.to_string();
    }
    let kept: String = overview.chars().take(MAX_OVERVIEW_CHARS - 1).collect();
    format!("{}…", kept.trim_end())
}

fn year_or_na(event: &HistoryEvent) -> String {
    event
        .year()
        .map(|y| y.to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Convert a UTC timestamp to "DD-MM-YYYY HH:MM WIB"
pub fn convert_to_wib(utc: DateTime<Utc>) -> String {
    let local = utc + Duration::hours(WIB_OFFSET_HOURS);
    format!("{} {}", local.format("%d-%m-%Y %H:%M"), WIB_LABEL)
}

/// Format a runtime in minutes as "Xh Ym", dropping zero segments
///
/// Absent runtime is "N/A"; an explicit zero is "0m".
pub fn format_runtime(minutes: Option<u32>) -> String {
    let Some(minutes) = minutes else {
        return NOT_AVAILABLE.to_string();
    };
    let hours = minutes / 60;
    let mins = minutes % 60;
    match (hours, mins) {
        (0, m) => format!("{}m", m),
        (h, 0) => format!("{}h", h),
        (h, m) => format!("{}h {}m", h, m),
    }
}

/// First message: who watched what, and when
pub fn format_summary(event: &HistoryEvent, display_name: &str, handle: &str) -> String {
    let profile_link = format!("{}/{}", PROFILE_BASE_URL, handle);
    format!(
        "👤 <a href=\"{}\">{}</a> Just Watched <b>{}</b>\n<b>Released:</b> {}\n<b>Watched:</b> {}",
        escape_html(&profile_link),
        escape_html(display_name),
        escape_html(event.title()),
        year_or_na(event),
        convert_to_wib(event.watched_at),
    )
}

/// Second message: poster caption with ratings, runtime, overview and genres
pub fn format_caption(
    event: &HistoryEvent,
    enrichment: Option<&Enrichment>,
    ratings: &RatingPair,
) -> String {
    let vote_average = enrichment.map(|e| e.vote_average).unwrap_or(0.0);
    let vote_count = enrichment.map(|e| e.vote_count).unwrap_or(0);
    let runtime = format_runtime(enrichment.and_then(|e| e.runtime));
    let overview = enrichment
        .and_then(|e| e.overview.as_deref())
        .filter(|o| !o.trim().is_empty())
        .map(|o| escape_html(&truncate_overview(o)))
        .unwrap_or_else(|| NO_OVERVIEW.to_string());
    let genres = enrichment
        .map(|e| e.genres.as_slice())
        .filter(|g| !g.is_empty())
        .map(|g| escape_html(&g.join(", ")))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    let tomato = ratings
        .tomato_meter
        .as_deref()
        .map(|t| format!("<b>{}</b>", escape_html(t)))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());
    let imdb = ratings
        .imdb_rating
        .as_deref()
        .map(|r| format!("<b>{}</b>/10", escape_html(r)))
        .unwrap_or_else(|| format!("{}/10", NOT_AVAILABLE));

    format!(
        "<b>{title}</b> ({year})\n\
         \n\
         ⭐ <b>{avg:.1}/10</b> ({votes} votes)\n\
         🕐 <b>{runtime}</b>\n\
         \n\
         <blockquote>{overview}</blockquote>\n\
         \n\
         <b>Genres</b> {genres}\n\
         \n\
         <b>Ratings</b>\n\
         ▪️<b>Tomatometer</b>  {tomato}\n\
         ▪️ <b>TMDB</b>   <b>{avg:.1}/10</b>\n\
         ▪️ <b>IMDb</b>   {imdb}",
        title = escape_html(event.title()),
        year = year_or_na(event),
        avg = vote_average,
        votes = vote_count,
        runtime = runtime,
        overview = overview,
        genres = genres,
        tomato = tomato,
        imdb = imdb,
    )
}
