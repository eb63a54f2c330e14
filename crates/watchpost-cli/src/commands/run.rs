use crate::commands::{build_orchestrator, load_config, open_store};
use crate::output::Output;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use serde_json::json;
use std::path::PathBuf;
use tracing::info;
use watch_notify_core::RunResult;

pub async fn run_once(
    limit: Option<usize>,
    dry_run: bool,
    state_file: Option<PathBuf>,
    output: &Output,
) -> Result<()> {
    let mut config = load_config()?;
    if let Some(limit) = limit {
        config.run.history_limit = limit;
    }
    if let Some(path) = state_file {
        config.run.state_file = path;
    }

    info!(
        operation = "run_start",
        limit = config.run.history_limit,
        state_file = %config.run.state_file.display(),
        dry_run,
        "Checking watch history"
    );

    let store = open_store(&config.run.state_file)?;
    let mut orchestrator = build_orchestrator(&config, store).with_dry_run(dry_run);
    let result = orchestrator.run().await.wrap_err("Run failed")?;

    report(&result, dry_run, output)
}

fn report(result: &RunResult, dry_run: bool, output: &Output) -> Result<()> {
    if !output.is_human() {
        output.json(&json!({
            "type": "run",
            "dry_run": dry_run,
            "fetched": result.fetched,
            "notified": result.notified,
            "skipped_seen": result.skipped_seen,
            "skipped_unsupported": result.skipped_unsupported,
            "duration_ms": result.duration.as_millis() as u64,
            "previews": serde_json::to_value(&result.previews)?,
        }));
        return Ok(());
    }

    for preview in &result.previews {
        output.println(format!("── {} (event {}) ──", preview.title, preview.event_id));
        output.println(&preview.summary);
        output.println("");
        if let Some(url) = &preview.poster_url {
            output.println(format!("[poster] {}", url));
        }
        output.println(&preview.caption);
        output.println("");
    }

    if dry_run {
        output.success(format!(
            "Dry run: {} notification(s) rendered, nothing sent",
            result.previews.len()
        ));
    } else {
        output.success(format!("Notified {} new item(s)", result.notified));
    }
    output.info(format!(
        "Fetched {}, already notified {}, unsupported {}",
        result.fetched, result.skipped_seen, result.skipped_unsupported
    ));
    Ok(())
}
