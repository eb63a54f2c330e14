use clap::{ArgAction, Parser, Subcommand};
use color_eyre::eyre::WrapErr;
use commands::{config, daemon, history, run, state};
use std::path::PathBuf;

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "watchpost")]
#[command(about = "watchpost - Post what you just watched on Trakt to Telegram")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    /// Write logs to this file (rotated daily) instead of stderr
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check history once and notify new items
    #[command(long_about = "Fetch the most recent Trakt history, send a two-message Telegram notification for every movie or show not notified before, and record each one in the dedup store right after it is sent.")]
    Run {
        /// Number of history entries to inspect (1-100)
        #[arg(long, value_parser = parse_limit)]
        limit: Option<usize>,

        /// Render the notifications without sending or recording them
        #[arg(long, action = ArgAction::SetTrue)]
        dry_run: bool,

        /// Dedup state file (overrides WATCHPOST_STATE_FILE)
        #[arg(long, value_name = "PATH")]
        state_file: Option<PathBuf>,
    },
    /// Print the raw recent history page
    History {
        /// Number of history entries to fetch (1-100)
        #[arg(long, value_parser = parse_limit)]
        limit: Option<usize>,
    },
    /// Run checks on a cron schedule until interrupted
    #[command(long_about = "Run watchpost in the foreground and check history on a cron schedule (6 fields, seconds first). Runs never overlap. A failed run is logged and retried on the next tick. Stop with Ctrl-C.")]
    Daemon {
        /// Cron schedule expression (e.g. '0 */10 * * * *' for every ten minutes)
        #[arg(long, value_name = "SCHEDULE")]
        schedule: Option<String>,

        /// Skip the check on startup
        #[arg(long, action = ArgAction::SetTrue)]
        no_startup_run: bool,
    },
    /// Inspect or edit the dedup store
    State {
        /// Dedup state file (overrides WATCHPOST_STATE_FILE)
        #[arg(long, value_name = "PATH", global = true)]
        state_file: Option<PathBuf>,

        #[command(subcommand)]
        cmd: StateCommands,
    },
    /// Show the resolved configuration (secrets masked)
    Config,
}

#[derive(Subcommand)]
enum StateCommands {
    /// List notified events
    Show,
    /// Remove one event so it is notified again
    Forget {
        /// History event ID
        event_id: String,
    },
}

fn parse_limit(raw: &str) -> Result<usize, String> {
    watch_notify_config::parse_history_limit(raw).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    // Real environment variables win over .env
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    logging::init_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))
        .wrap_err("Failed to initialise logging")?;

    let output = output::Output::new(cli.output, cli.quiet);

    let result = match cli.command {
        Commands::Run { limit, dry_run, state_file } => {
            run::run_once(limit, dry_run, state_file, &output).await
        }
        Commands::History { limit } => history::show_history(limit, &output).await,
        Commands::Daemon { schedule, no_startup_run } => {
            daemon::run_daemon(schedule, no_startup_run, &output).await
        }
        Commands::State { state_file, cmd } => match cmd {
            StateCommands::Show => state::show(state_file, &output),
            StateCommands::Forget { event_id } => state::forget(state_file, &event_id, &output),
        },
        Commands::Config => config::show_config(&output),
    };

    // color-eyre reports the error on stderr; JSON consumers also get it on stdout
    if let Err(e) = &result {
        if !output.is_human() {
            output.error(format!("{:#}", e));
        }
    }
    result
}
