use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use serenity::all::{ActivityData, ShardManager};
use tokio::sync::RwLock;

use crate::{
    model::settings::{BotSettingsDto, UpdateBotSettingsDto},
    server::error::AppError,
};

pub const MAX_STATUS_MESSAGES: usize = 20;
pub const MAX_STATUS_LEN: usize = 128;
pub const MIN_ROTATION_SECS: u64 = 10;
pub const MAX_ROTATION_SECS: u64 = 3_600;

const DEFAULT_STATUS_MESSAGES: [&str; 3] = [
    "/help",
    "Watching {guilds} servers",
    "{commands} commands run",
];

/// Values substituted into status templates.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusVars {
    pub guilds: usize,
    pub members: u64,
    pub commands: u64,
}

/// Replaces `{guilds}`, `{members}` and `{commands}` in a status template.
pub fn render_status(template: &str, vars: StatusVars) -> String {
    template
        .replace("{guilds}", &vars.guilds.to_string())
        .replace("{members}", &vars.members.to_string())
        .replace("{commands}", &vars.commands.to_string())
}

#[derive(Debug)]
struct PresenceInner {
    status_messages: Vec<String>,
    rotation: Duration,
    embed_color: u32,
    pinned: Option<String>,
    current: Option<String>,
    index: usize,
    last_rotated: Option<Instant>,
}

/// Runtime bot settings and the rotating activity text.
///
/// Held in memory; a restart falls back to the configured defaults.
#[derive(Clone)]
pub struct PresenceState {
    inner: Arc<RwLock<PresenceInner>>,
}

impl PresenceState {
    pub fn new(rotation_secs: u64, embed_color: u32) -> Self {
        Self {
            inner: Arc::new(RwLock::new(PresenceInner {
                status_messages: DEFAULT_STATUS_MESSAGES.iter().map(|s| s.to_string()).collect(),
                rotation: Duration::from_secs(rotation_secs),
                embed_color,
                pinned: None,
                current: None,
                index: 0,
                last_rotated: None,
            })),
        }
    }

    pub async fn settings(&self) -> BotSettingsDto {
        let inner = self.inner.read().await;
        BotSettingsDto {
            status_messages: inner.status_messages.clone(),
            status_rotation_secs: inner.rotation.as_secs(),
            embed_color: inner.embed_color,
        }
    }

    /// Applies a partial settings update. Nothing changes when any field is invalid.
    pub async fn update_settings(
        &self,
        update: UpdateBotSettingsDto,
    ) -> Result<BotSettingsDto, AppError> {
        let messages = match update.status_messages {
            Some(messages) => {
                let messages: Vec<String> = messages
                    .into_iter()
                    .map(|m| m.trim().to_string())
                    .filter(|m| !m.is_empty())
                    .collect();
                if messages.len() > MAX_STATUS_MESSAGES {
                    return Err(AppError::BadRequest(format!(
                        "At most {} status messages are allowed",
                        MAX_STATUS_MESSAGES
                    )));
                }
                if messages.iter().any(|m| m.chars().count() > MAX_STATUS_LEN) {
                    return Err(AppError::BadRequest(format!(
                        "Status messages must be at most {} characters",
                        MAX_STATUS_LEN
                    )));
                }
                Some(messages)
            }
            None => None,
        };

        if let Some(secs) = update.status_rotation_secs {
            if !(MIN_ROTATION_SECS..=MAX_ROTATION_SECS).contains(&secs) {
                return Err(AppError::BadRequest(format!(
                    "Rotation interval must be between {} and {} seconds",
                    MIN_ROTATION_SECS, MAX_ROTATION_SECS
                )));
            }
        }
        if let Some(color) = update.embed_color {
            if color > 0xFF_FF_FF {
                return Err(AppError::BadRequest(
                    "Embed color must be a 24-bit RGB value".to_string(),
                ));
            }
        }

        {
            let mut inner = self.inner.write().await;
            if let Some(messages) = messages {
                inner.status_messages = messages;
                inner.index = 0;
                inner.last_rotated = None;
            }
            if let Some(secs) = update.status_rotation_secs {
                inner.rotation = Duration::from_secs(secs);
            }
            if let Some(color) = update.embed_color {
                inner.embed_color = color;
            }
        }

        Ok(self.settings().await)
    }

    pub async fn embed_color(&self) -> u32 {
        self.inner.read().await.embed_color
    }

    pub async fn current(&self) -> Option<String> {
        self.inner.read().await.current.clone()
    }

    pub async fn pinned(&self) -> Option<String> {
        self.inner.read().await.pinned.clone()
    }

    /// Pins an activity text, or clears the pin with `None` so rotation resumes.
    pub async fn pin(&self, text: Option<String>) -> Result<(), AppError> {
        let text = text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty());
        if text
            .as_ref()
            .is_some_and(|t| t.chars().count() > MAX_STATUS_LEN)
        {
            return Err(AppError::BadRequest(format!(
                "Status must be at most {} characters",
                MAX_STATUS_LEN
            )));
        }

        let mut inner = self.inner.write().await;
        inner.pinned = text;
        inner.last_rotated = None;
        Ok(())
    }

    /// Decides the activity text at `now`.
    ///
    /// # Returns
    /// - `Some(text)` - The activity changed and should be pushed to the gateway
    /// - `None` - Keep the current activity
    pub async fn next_activity(&self, vars: StatusVars, now: Instant) -> Option<String> {
        let mut inner = self.inner.write().await;

        let next = if let Some(pinned) = &inner.pinned {
            pinned.clone()
        } else {
            if inner.status_messages.is_empty() {
                return None;
            }
            let due = inner
                .last_rotated
                .map_or(true, |last| now.duration_since(last) >= inner.rotation);
            if !due {
                return None;
            }
            let index = inner.index % inner.status_messages.len();
            inner.index = index + 1;
            inner.last_rotated = Some(now);
            render_status(&inner.status_messages[index], vars)
        };

        if inner.current.as_deref() == Some(next.as_str()) {
            return None;
        }
        inner.current = Some(next.clone());
        Some(next)
    }
}

/// Sets the custom activity text on every shard.
pub async fn push_activity(manager: &ShardManager, text: &str) {
    let runners = manager.runners.lock().await;
    for info in runners.values() {
        info.runner_tx
            .set_activity(Some(ActivityData::custom(text.to_string())));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars() -> StatusVars {
        StatusVars {
            guilds: 3,
            members: 40,
            commands: 12,
        }
    }

    /// Expect every placeholder substituted
    #[test]
    fn renders_placeholders() {
        let text = render_status("{guilds} servers, {members} members, {commands} commands", vars());

        assert_eq!(text, "3 servers, 40 members, 12 commands");
    }

    /// Expect rotation to advance only once the interval has elapsed
    #[tokio::test]
    async fn rotates_after_interval() {
        let presence = PresenceState::new(30, 0x5865F2);
        presence
            .update_settings(UpdateBotSettingsDto {
                status_messages: Some(vec!["one".to_string(), "two {guilds}".to_string()]),
                status_rotation_secs: None,
                embed_color: None,
            })
            .await
            .unwrap();
        let start = Instant::now();

        assert_eq!(presence.next_activity(vars(), start).await, Some("one".to_string()));
        assert_eq!(
            presence.next_activity(vars(), start + Duration::from_secs(5)).await,
            None
        );
        assert_eq!(
            presence.next_activity(vars(), start + Duration::from_secs(30)).await,
            Some("two 3".to_string())
        );
        assert_eq!(
            presence.next_activity(vars(), start + Duration::from_secs(60)).await,
            Some("one".to_string())
        );
    }

    /// Expect a pinned text to win over rotation until cleared
    #[tokio::test]
    async fn pinned_text_overrides_rotation() {
        let presence = PresenceState::new(30, 0x5865F2);
        let start = Instant::now();

        presence.pin(Some("Maintenance".to_string())).await.unwrap();
        assert_eq!(
            presence.next_activity(vars(), start).await,
            Some("Maintenance".to_string())
        );
        assert_eq!(presence.next_activity(vars(), start).await, None);

        presence.pin(None).await.unwrap();
        assert_eq!(
            presence.next_activity(vars(), start).await,
            Some("/help".to_string())
        );
    }

    /// Expect an out of range interval to be rejected without applying other fields
    #[tokio::test]
    async fn rejects_invalid_rotation() {
        let presence = PresenceState::new(30, 0x5865F2);

        let result = presence
            .update_settings(UpdateBotSettingsDto {
                status_messages: Some(vec!["changed".to_string()]),
                status_rotation_secs: Some(1),
                embed_color: None,
            })
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
        assert_eq!(presence.settings().await.status_messages.len(), 3);
    }
}
