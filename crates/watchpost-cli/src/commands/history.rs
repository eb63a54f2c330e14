use crate::output::Output;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use watch_notify_config::{TraktConfig, DEFAULT_HISTORY_LIMIT};
use watch_notify_sources::{HistoryProvider, TraktClient};

/// Print the raw history page; needs only the Trakt variables
pub async fn show_history(limit: Option<usize>, output: &Output) -> Result<()> {
    let trakt = TraktConfig::from_env().wrap_err("Invalid configuration")?;
    let client = TraktClient::new(trakt.client_id, trakt.username);

    let events = client
        .recent_history(limit.unwrap_or(DEFAULT_HISTORY_LIMIT))
        .await
        .wrap_err("Failed to fetch watch history")?;

    if !output.is_human() {
        output.json(&serde_json::to_value(&events)?);
        return Ok(());
    }

    output.info(format!("Recent history for {}:", client.username()));
    for event in &events {
        let kind = event
            .media()
            .map(|(kind, _)| kind.to_string())
            .unwrap_or_else(|| event.item_type.clone().unwrap_or_else(|| "unknown".to_string()));
        let year = event
            .year()
            .map(|y| y.to_string())
            .unwrap_or_else(|| "N/A".to_string());
        output.println(format!(
            "{:>12}  {}  {:<7} {} ({})",
            event.id.as_str(),
            event.watched_at.format("%Y-%m-%d %H:%M UTC"),
            kind,
            event.title(),
            year
        ));
    }
    Ok(())
}
