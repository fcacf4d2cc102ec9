//! Periodic jobs run on `tokio-cron-scheduler`.
//!
//! - [`status_rotation`] - rotates the bot's activity text
//! - [`stats_push`] - broadcasts stats snapshots to dashboard WebSocket clients

pub mod stats_push;
pub mod status_rotation;

use tokio_cron_scheduler::JobScheduler;

use crate::server::{error::AppError, state::AppState};

/// Starts every periodic job.
///
/// # Returns
/// - `Ok(JobScheduler)` - The running scheduler; shut it down on exit
/// - `Err(AppError)` - A job could not be created or the scheduler failed to start
pub async fn start_scheduler(state: AppState) -> Result<JobScheduler, AppError> {
    let scheduler = JobScheduler::new().await?;

    scheduler.add(status_rotation::job(state.clone())?).await?;
    scheduler.add(stats_push::job(state)?).await?;
    scheduler.start().await?;

    tracing::info!("Scheduler started");

    Ok(scheduler)
}
