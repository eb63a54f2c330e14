use crate::commands::{build_orchestrator, load_config, open_store};
use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info};
use watch_notify_core::NotifyOrchestrator;

/// Cron-driven runs of one shared orchestrator
///
/// Every run takes the orchestrator lock, so a tick that fires while a run
/// is still in progress waits for it instead of overlapping.
pub struct Scheduler {
    scheduler: JobScheduler,
    orchestrator: Arc<Mutex<NotifyOrchestrator>>,
    schedule: String,
}

impl Scheduler {
    pub async fn new(orchestrator: NotifyOrchestrator, schedule: String) -> Result<Self> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| eyre!("Failed to create scheduler: {:?}", e))?;

        Ok(Self {
            scheduler,
            orchestrator: Arc::new(Mutex::new(orchestrator)),
            schedule,
        })
    }

    pub async fn run_now(&self) {
        info!(operation = "scheduler_startup", "Running initial check on startup");
        run_guarded(&self.orchestrator, "startup").await;
    }

    pub async fn start(&mut self) -> Result<()> {
        let orchestrator = self.orchestrator.clone();
        let job = Job::new_async(self.schedule.as_str(), move |_id, _scheduler| {
            let orchestrator = orchestrator.clone();
            Box::pin(async move {
                run_guarded(&orchestrator, "cron").await;
            })
        })
        .map_err(|e| eyre!("Invalid cron schedule '{}': {:?}", self.schedule, e))?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| eyre!("Failed to register scheduled job: {:?}", e))?;
        self.scheduler
            .start()
            .await
            .map_err(|e| eyre!("Failed to start scheduler: {:?}", e))?;

        info!(
            operation = "scheduler_started",
            schedule = %self.schedule,
            "Scheduler started"
        );
        Ok(())
    }

    pub async fn shutdown(&mut self) -> Result<()> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| eyre!("Failed to stop scheduler: {:?}", e))?;
        info!(operation = "scheduler_stopped", "Scheduler stopped");
        Ok(())
    }
}

/// Errors are logged; the next tick retries whatever was left unsent
async fn run_guarded(orchestrator: &Mutex<NotifyOrchestrator>, trigger: &'static str) {
    let mut orchestrator = orchestrator.lock().await;
    info!(operation = "scheduled_run_start", trigger, "Starting scheduled check");

    match orchestrator.run().await {
        Ok(result) => info!(
            operation = "scheduled_run_complete",
            trigger,
            notified = result.notified,
            skipped_seen = result.skipped_seen,
            duration_ms = result.duration.as_millis() as u64,
            "Scheduled check completed"
        ),
        Err(e) => error!(
            operation = "scheduled_run_error",
            trigger,
            error = %e,
            "Scheduled check failed"
        ),
    }
}

pub async fn run_daemon(
    schedule_override: Option<String>,
    no_startup_run: bool,
    output: &Output,
) -> Result<()> {
    let config = load_config()?;
    let schedule = schedule_override.unwrap_or_else(|| config.scheduler.schedule.clone());

    let store = open_store(&config.run.state_file)?;
    let orchestrator = build_orchestrator(&config, store);
    let mut scheduler = Scheduler::new(orchestrator, schedule.clone()).await?;

    if !no_startup_run {
        scheduler.run_now().await;
    }
    scheduler.start().await?;
    output.info(format!("Daemon running on schedule '{}'. Press Ctrl-C to stop.", schedule));

    tokio::signal::ctrl_c()
        .await
        .map_err(|e| eyre!("Failed to listen for Ctrl-C: {}", e))?;
    info!(operation = "shutdown_signal", "Received Ctrl-C, shutting down");

    scheduler.shutdown().await?;
    output.success("Daemon stopped");
    Ok(())
}
