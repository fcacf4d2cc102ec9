use std::time::Instant;

use tokio_cron_scheduler::{Job, JobSchedulerError};

use crate::server::{
    service::presence::{push_activity, StatusVars},
    state::AppState,
};

/// Ticks every five seconds; the presence state decides whether the rotation interval has passed.
const SCHEDULE: &str = "*/5 * * * * *";

pub fn job(state: AppState) -> Result<Job, JobSchedulerError> {
    Job::new_async(SCHEDULE, move |_uuid, _lock| {
        let state = state.clone();

        Box::pin(async move {
            refresh(&state).await;
        })
    })
}

/// Pushes the next activity text to every shard when it changed.
///
/// Also called directly after the pinned status changes so the update shows
/// without waiting for the next tick.
pub async fn refresh(state: &AppState) {
    let vars = StatusVars {
        guilds: state.stats.guild_count().await,
        members: state.stats.member_count().await,
        commands: state.stats.commands_executed(),
    };

    let Some(text) = state.presence.next_activity(vars, Instant::now()).await else {
        return;
    };

    match state.stats.shard_manager() {
        Some(manager) => {
            push_activity(&manager, &text).await;
            tracing::debug!("Set activity to '{}'", text);
        }
        None => tracing::debug!("No shard manager attached; activity '{}' not pushed", text),
    }
}
