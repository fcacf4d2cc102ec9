use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc, OnceLock,
    },
    time::{Duration, Instant},
};

use serenity::all::ShardManager;
use sysinfo::System;
use tokio::sync::RwLock;

use crate::model::stats::{GuildSummaryDto, StatsDto};

/// What the bot knows about one guild, refreshed from gateway events.
#[derive(Debug, Clone, PartialEq)]
pub struct GuildSnapshot {
    pub id: u64,
    pub name: String,
    pub member_count: u64,
    pub channel_count: u64,
    pub icon_url: Option<String>,
}

struct StatsInner {
    started_at: Instant,
    commands_executed: AtomicU64,
    online: AtomicBool,
    guilds: RwLock<HashMap<u64, GuildSnapshot>>,
    shard_manager: OnceLock<Arc<ShardManager>>,
}

/// Live counters shared by the bot and the dashboard.
#[derive(Clone)]
pub struct BotStats {
    inner: Arc<StatsInner>,
}

impl Default for BotStats {
    fn default() -> Self {
        Self::new()
    }
}

impl BotStats {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(StatsInner {
                started_at: Instant::now(),
                commands_executed: AtomicU64::new(0),
                online: AtomicBool::new(false),
                guilds: RwLock::new(HashMap::new()),
                shard_manager: OnceLock::new(),
            }),
        }
    }

    pub fn record_command(&self) {
        self.inner.commands_executed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn commands_executed(&self) -> u64 {
        self.inner.commands_executed.load(Ordering::Relaxed)
    }

    pub fn uptime(&self) -> Duration {
        self.inner.started_at.elapsed()
    }

    pub fn set_online(&self, online: bool) {
        self.inner.online.store(online, Ordering::Relaxed);
    }

    pub fn is_online(&self) -> bool {
        self.inner.online.load(Ordering::Relaxed)
    }

    /// Stores the gateway shard manager once the client is built.
    pub fn attach_shard_manager(&self, manager: Arc<ShardManager>) {
        let _ = self.inner.shard_manager.set(manager);
    }

    pub fn shard_manager(&self) -> Option<Arc<ShardManager>> {
        self.inner.shard_manager.get().cloned()
    }

    pub async fn upsert_guild(&self, guild: GuildSnapshot) {
        self.inner.guilds.write().await.insert(guild.id, guild);
    }

    pub async fn remove_guild(&self, guild_id: u64) {
        self.inner.guilds.write().await.remove(&guild_id);
    }

    /// Adjusts a guild's member count by `delta` members.
    pub async fn adjust_members(&self, guild_id: u64, delta: i64) {
        if let Some(guild) = self.inner.guilds.write().await.get_mut(&guild_id) {
            guild.member_count = guild.member_count.saturating_add_signed(delta);
        }
    }

    pub async fn adjust_channels(&self, guild_id: u64, delta: i64) {
        if let Some(guild) = self.inner.guilds.write().await.get_mut(&guild_id) {
            guild.channel_count = guild.channel_count.saturating_add_signed(delta);
        }
    }

    pub async fn guild_count(&self) -> usize {
        self.inner.guilds.read().await.len()
    }

    pub async fn member_count(&self) -> u64 {
        self.inner
            .guilds
            .read()
            .await
            .values()
            .map(|g| g.member_count)
            .sum()
    }

    /// Guild summaries sorted by name.
    pub async fn guild_summaries(&self) -> Vec<GuildSummaryDto> {
        let mut guilds: Vec<GuildSummaryDto> = self
            .inner
            .guilds
            .read()
            .await
            .values()
            .map(|g| GuildSummaryDto {
                id: g.id,
                name: g.name.clone(),
                member_count: g.member_count,
                channel_count: g.channel_count,
                icon_url: g.icon_url.clone(),
            })
            .collect();
        guilds.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        guilds
    }

    /// Average heartbeat latency over shards that have reported one.
    pub async fn latency(&self) -> Option<Duration> {
        let manager = self.shard_manager()?;
        let runners = manager.runners.lock().await;
        let latencies: Vec<Duration> = runners.values().filter_map(|r| r.latency).collect();
        if latencies.is_empty() {
            return None;
        }
        Some(latencies.iter().sum::<Duration>() / latencies.len() as u32)
    }

    /// Current statistics as pushed to the dashboard.
    pub async fn snapshot(&self) -> StatsDto {
        let (guilds, members, channels) = {
            let guilds = self.inner.guilds.read().await;
            (
                guilds.len(),
                guilds.values().map(|g| g.member_count).sum(),
                guilds.values().map(|g| g.channel_count).sum(),
            )
        };

        StatsDto {
            guilds,
            members,
            channels,
            commands_executed: self.commands_executed(),
            uptime_secs: self.uptime().as_secs(),
            memory_bytes: process_memory_bytes().unwrap_or(0),
            latency_ms: self.latency().await.map(|d| d.as_millis() as u64),
        }
    }
}

/// Resident memory of this process.
fn process_memory_bytes() -> Option<u64> {
    let pid = sysinfo::get_current_pid().ok()?;
    let mut system = System::new();
    system.refresh_process(pid);
    system.process(pid).map(|p| p.memory())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guild(id: u64, name: &str, members: u64) -> GuildSnapshot {
        GuildSnapshot {
            id,
            name: name.to_string(),
            member_count: members,
            channel_count: 3,
            icon_url: None,
        }
    }

    /// Expect snapshot totals summed across guilds
    #[tokio::test]
    async fn snapshot_sums_guilds() {
        let stats = BotStats::new();
        stats.upsert_guild(guild(1, "Alpha", 10)).await;
        stats.upsert_guild(guild(2, "Beta", 5)).await;
        stats.record_command();
        stats.record_command();

        let snapshot = stats.snapshot().await;

        assert_eq!(snapshot.guilds, 2);
        assert_eq!(snapshot.members, 15);
        assert_eq!(snapshot.channels, 6);
        assert_eq!(snapshot.commands_executed, 2);
        assert_eq!(snapshot.latency_ms, None);
    }

    /// Expect member adjustments to clamp at zero
    #[tokio::test]
    async fn adjust_members_saturates() {
        let stats = BotStats::new();
        stats.upsert_guild(guild(1, "Alpha", 1)).await;

        stats.adjust_members(1, -1).await;
        stats.adjust_members(1, -1).await;
        stats.adjust_members(99, 1).await;

        assert_eq!(stats.member_count().await, 0);
    }

    /// Expect removed guilds to disappear from the summaries
    #[tokio::test]
    async fn remove_guild_drops_summary() {
        let stats = BotStats::new();
        stats.upsert_guild(guild(1, "beta", 1)).await;
        stats.upsert_guild(guild(2, "Alpha", 1)).await;
        stats.upsert_guild(guild(3, "Gamma", 1)).await;

        stats.remove_guild(3).await;
        let summaries = stats.guild_summaries().await;

        let names: Vec<&str> = summaries.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "beta"]);
    }
}
