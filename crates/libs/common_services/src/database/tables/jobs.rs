use chrono::{DateTime, Utc};
use color_eyre::Result;
use serde::Serialize;
use sqlx::{FromRow, PgPool, Type};
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize)]
#[sqlx(type_name = "job_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Processing,
    Done,
    Error,
}

#[derive(Debug, FromRow, Serialize)]
pub struct Job {
    pub id: Uuid,
    pub image_id: Uuid,
    pub status: JobStatus,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// A pending job that was just moved to processing, joined with the storage
/// key of the image it points at.
#[derive(Debug, FromRow)]
pub struct ClaimedJob {
    pub id: Uuid,
    pub image_id: Uuid,
    pub storage_key: String,
}

/// Atomically claim the oldest pending job.
///
/// The row lock plus `SKIP LOCKED` means concurrent workers never pick up the
/// same job, they simply skip past each other's candidates.
///
/// # Errors
///
/// Returns an error if the database transaction fails.
pub async fn claim_next_job(pool: &PgPool) -> Result<Option<ClaimedJob>> {
    let mut tx = pool.begin().await?;

    let job = sqlx::query_as::<_, ClaimedJob>(
        r"
        WITH candidate AS (
            SELECT j.id FROM jobs j
            WHERE j.status = 'pending'
            ORDER BY j.created_at
            FOR UPDATE OF j SKIP LOCKED
            LIMIT 1
        )
        UPDATE jobs
        SET status = 'processing', started_at = now()
        WHERE id = (SELECT id FROM candidate)
        RETURNING id, image_id,
            (SELECT storage_key FROM images WHERE images.id = jobs.image_id) AS storage_key
        ",
    )
    .fetch_optional(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(job)
}

/// Marks a job as done. Only a job still in processing can complete, a job
/// already in a terminal state stays untouched.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn mark_job_done(pool: &PgPool, job_id: Uuid) -> Result<()> {
    sqlx::query(
        "UPDATE jobs SET status = 'done', completed_at = now()
         WHERE id = $1 AND status = 'processing'",
    )
    .bind(job_id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Marks a job as failed, recording the error message. Same terminal-state
/// guard as `mark_job_done`.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn mark_job_error(pool: &PgPool, job_id: Uuid, message: &str) -> Result<()> {
    sqlx::query(
        "UPDATE jobs SET status = 'error', error_message = $2, completed_at = now()
         WHERE id = $1 AND status = 'processing'",
    )
    .bind(job_id)
    .bind(message)
    .execute(pool)
    .await?;
    Ok(())
}

/// Enqueues a segmentation job for an image.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn enqueue_job(pool: &PgPool, image_id: Uuid) -> Result<Uuid> {
    let job_id = Uuid::new_v4();
    sqlx::query("INSERT INTO jobs (id, image_id, status) VALUES ($1, $2, 'pending')")
        .bind(job_id)
        .bind(image_id)
        .execute(pool)
        .await?;
    info!("Enqueued job {job_id} for image {image_id}");
    Ok(job_id)
}

/// Fetch one job by id.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn get_job(pool: &PgPool, job_id: Uuid) -> Result<Option<Job>> {
    let job = sqlx::query_as::<_, Job>(
        "SELECT id, image_id, status, error_message, created_at, started_at, completed_at
         FROM jobs WHERE id = $1",
    )
    .bind(job_id)
    .fetch_optional(pool)
    .await?;
    Ok(job)
}
