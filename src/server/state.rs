//! Application state shared by gateway handlers, scheduled jobs and dashboard handlers.
//!
//! The state is built once in `main` and cloned into the bot handler, the
//! scheduler jobs and the Axum router. Every field is cheap to clone.

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tokio::sync::{broadcast, Notify};

use crate::{
    model::stats::StatsDto,
    server::{
        bot::command::registry::CommandRegistry,
        config::Config,
        discord::{connector::DiscordConnector, embed::Colors},
        service::{
            poll::{store::PollStore, PollService},
            presence::PresenceState,
            stats::BotStats,
        },
    },
};

/// Capacity of the dashboard stats broadcast; slow WebSocket clients skip old snapshots.
const STATS_CHANNEL_CAPACITY: usize = 16;

#[derive(Clone)]
pub struct AppState {
    /// Connection pool for the SQLite database.
    pub db: DatabaseConnection,

    pub config: Arc<Config>,

    /// Discord REST access for the ticket and poll workflows.
    pub discord: Arc<dyn DiscordConnector>,

    /// Running polls, keyed by message id.
    pub polls: Arc<dyn PollStore>,

    pub stats: BotStats,
    pub presence: PresenceState,
    pub registry: Arc<CommandRegistry>,

    /// Stats snapshots pushed to dashboard WebSocket clients.
    pub stats_tx: broadcast::Sender<StatsDto>,

    /// Notified by the `shutdown` owner command.
    pub shutdown: Arc<Notify>,
}

impl AppState {
    /// Creates the application state from its initialized dependencies.
    ///
    /// # Arguments
    /// - `db` - Database connection pool with migrations applied
    /// - `config` - Process configuration
    /// - `discord` - Discord connector backed by the bot's HTTP client
    /// - `polls` - Poll store
    /// - `registry` - Validated command registry
    pub fn new(
        db: DatabaseConnection,
        config: Config,
        discord: Arc<dyn DiscordConnector>,
        polls: Arc<dyn PollStore>,
        registry: CommandRegistry,
    ) -> Self {
        let (stats_tx, _) = broadcast::channel(STATS_CHANNEL_CAPACITY);
        let presence = PresenceState::new(config.status_rotation_secs, Colors::PRIMARY);

        Self {
            db,
            config: Arc::new(config),
            discord,
            polls,
            stats: BotStats::new(),
            presence,
            registry: Arc::new(registry),
            stats_tx,
            shutdown: Arc::new(Notify::new()),
        }
    }

    pub fn poll_service(&self) -> PollService {
        PollService::new(self.polls.clone(), self.discord.clone())
    }
}

#[cfg(test)]
impl AppState {
    /// State over `db` with a fake Discord connector and the built-in commands.
    pub fn for_test(db: DatabaseConnection) -> Self {
        use crate::server::{
            bot::command::builtin_commands, discord::fake::FakeConnector,
            service::poll::store::InMemoryPollStore,
        };

        let config = Config::from_lookup(|key| match key {
            "DISCORD_TOKEN" => Some("test-token".to_string()),
            "DASHBOARD_TOKEN" => Some("secret".to_string()),
            _ => None,
        })
        .expect("test config");
        let registry = CommandRegistry::new(builtin_commands()).expect("valid built-in commands");

        Self::new(
            db,
            config,
            Arc::new(FakeConnector::new()),
            Arc::new(InMemoryPollStore::new()),
            registry,
        )
    }
}
