use crate::commands::load_config;
use crate::output::Output;
use color_eyre::Result;
use owo_colors::OwoColorize;
use serde_json::{Map, Value};

pub fn show_config(output: &Output) -> Result<()> {
    let config = load_config()?;
    let summary = config.masked_summary();

    if !output.is_human() {
        let map: Map<String, Value> = summary
            .into_iter()
            .map(|(key, value)| (key.to_string(), Value::String(value)))
            .collect();
        output.json(&Value::Object(map));
        return Ok(());
    }

    let width = summary.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    for (key, value) in &summary {
        output.println(format!("{:<width$}  {}", key.bold(), value, width = width));
    }
    Ok(())
}
