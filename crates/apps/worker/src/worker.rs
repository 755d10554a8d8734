use crate::context::WorkerContext;
use crate::handlers::handle_job;
use app_state::AppSettings;
use color_eyre::{Report, Result};
use common_services::database::jobs::{claim_next_job, mark_job_done, mark_job_error};
use common_services::utils::nice_id;
use sqlx::PgPool;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

pub async fn create_worker(pool: PgPool, settings: AppSettings, stop_on_sleep: bool) -> Result<()> {
    let worker_id = nice_id(8);
    info!("🛠️ [Worker ID: {}] Starting.", worker_id);
    let context = WorkerContext::new(pool, settings, worker_id)?;

    run_worker_loop(&context, stop_on_sleep).await
}

/// The main loop for the worker process, continuously fetching and processing jobs.
///
/// # Errors
///
/// This function will return an error if there is a problem communicating with the
/// database when claiming or updating a job. The loop will terminate in such a case.
pub async fn run_worker_loop(context: &WorkerContext, stop_on_sleep: bool) -> Result<()> {
    let mut sleeping = false;

    loop {
        let maybe_job = claim_next_job(&context.pool).await?;

        if let Some(job) = maybe_job {
            sleeping = false;
            info!(
                "🐜 [{}] Picked up job {} for image {}",
                context.worker_id, job.id, job.image_id
            );

            match handle_job(context, &job).await {
                Ok(garment_count) => {
                    mark_job_done(&context.pool, job.id).await?;
                    info!(
                        "✅ [{}] Job {} done, found {} garments.",
                        context.worker_id, job.id, garment_count
                    );
                }
                Err(e) => {
                    warn!("‼️ [{}] Job {} failed: {:?}", context.worker_id, job.id, e);
                    mark_job_error(&context.pool, job.id, &error_summary(&e)).await?;
                }
            }
        } else {
            if !sleeping {
                sleeping = true;
                info!("💤 [{}] No jobs, going to sleep...", context.worker_id);
                if stop_on_sleep {
                    return Ok(());
                }
            }
            sleep(Duration::from_millis(context.settings.worker.poll_interval_ms)).await;
        }
    }
}

/// First line of the error, capped so the jobs table never stores a full
/// backtrace.
fn error_summary(error: &Report) -> String {
    let message = error.to_string();
    let first_line = message.lines().next().unwrap_or_default();
    first_line.chars().take(500).collect()
}
