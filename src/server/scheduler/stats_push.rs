use std::time::Duration;

use tokio_cron_scheduler::{Job, JobSchedulerError};

use crate::server::state::AppState;

pub fn job(state: AppState) -> Result<Job, JobSchedulerError> {
    let interval = Duration::from_secs(state.config.stats_push_interval_secs);

    Job::new_repeated_async(interval, move |_uuid, _lock| {
        let state = state.clone();

        Box::pin(async move {
            push(&state).await;
        })
    })
}

/// Broadcasts a stats snapshot when at least one dashboard client is listening.
///
/// # Returns
/// Number of WebSocket connections the snapshot was delivered to.
pub async fn push(state: &AppState) -> usize {
    if state.stats_tx.receiver_count() == 0 {
        return 0;
    }

    let snapshot = state.stats.snapshot().await;
    state.stats_tx.send(snapshot).unwrap_or(0)
}
