use crate::commands::open_store;
use crate::output::Output;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use serde_json::json;
use std::path::PathBuf;
use watch_notify_config::RunConfig;
use watch_notify_core::DedupStore;
use watch_notify_models::EventId;

fn resolve(state_file: Option<PathBuf>) -> PathBuf {
    state_file.unwrap_or_else(RunConfig::state_file_from_env)
}

pub fn show(state_file: Option<PathBuf>, output: &Output) -> Result<()> {
    let path = resolve(state_file);
    let store = open_store(&path)?;
    let state = store.state();

    if !output.is_human() {
        output.json(&json!({
            "path": path.display().to_string(),
            "count": state.len(),
            "state": serde_json::to_value(state)?,
        }));
        return Ok(());
    }

    output.info(format!("Dedup store: {}", store.path().display()));
    let last_check = state
        .last_check
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| "never".to_string());
    output.info(format!("{} notified event(s), last check {}", state.len(), last_check));
    for (event_id, watched_at) in &state.items {
        output.println(format!("{:>12}  {}", event_id, watched_at));
    }
    Ok(())
}

pub fn forget(state_file: Option<PathBuf>, event_id: &str, output: &Output) -> Result<()> {
    let path = resolve(state_file);
    let mut store = open_store(&path)?;
    let event_id = EventId::new(event_id);

    let removed = store
        .forget(&event_id)
        .wrap_err_with(|| format!("Failed to update {}", path.display()))?;

    if !output.is_human() {
        output.json(&json!({ "event_id": event_id.as_str(), "removed": removed }));
    } else if removed {
        output.success(format!("Event {} will be notified again on the next run", event_id));
    } else {
        output.warn(format!("Event {} is not in the dedup store", event_id));
    }
    Ok(())
}
