use anyhow::Result;
use std::io;
use std::io::IsTerminal;
use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::{self, time::ChronoUtc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Filter for the given verbosity: 0 = info, 1 = debug without hyper noise, 2+ = trace
fn build_filter(verbose_level: u8, quiet: bool) -> EnvFilter {
    if quiet {
        return EnvFilter::new("error");
    }
    let default = match verbose_level {
        0 => "info",
        1 => "debug,hyper::proto::h1=warn,hyper::client::pool=warn,reqwest=info",
        _ => "trace",
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// JSON lines when asked for, or when nobody is watching the terminal (cron, containers)
fn wants_json() -> bool {
    std::env::var("RUST_LOG_JSON")
        .map(|v| v == "true")
        .unwrap_or_else(|_| !io::stdout().is_terminal())
}

pub fn init_logging(verbose_level: u8, quiet: bool, log_file: Option<&Path>) -> Result<()> {
    let registry = Registry::default().with(build_filter(verbose_level, quiet));
    let json = wants_json();

    let Some(log_path) = log_file else {
        if json {
            let layer = fmt::layer()
                .json()
                .with_timer(ChronoUtc::rfc_3339())
                .with_writer(io::stderr);
            registry.with(layer).init();
        } else {
            let layer = fmt::layer()
                .with_timer(ChronoUtc::rfc_3339())
                .with_writer(io::stderr);
            registry.with(layer).init();
        }
        return Ok(());
    };

    let log_dir = match log_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(log_dir)?;
    let log_filename = log_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow::anyhow!("Invalid log filename: {}", log_path.display()))?;

    // Rotated files are named <prefix>.YYYY-MM-DD, e.g. watchpost.2026-01-17
    let log_prefix = log_filename
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(log_filename);
    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, log_prefix);

    if json {
        let layer = fmt::layer()
            .json()
            .with_timer(ChronoUtc::rfc_3339())
            .with_writer(file_appender);
        registry.with(layer).init();
    } else {
        let layer = fmt::layer()
            .with_timer(ChronoUtc::rfc_3339())
            .with_ansi(false)
            .with_writer(file_appender);
        registry.with(layer).init();
    }

    Ok(())
}
