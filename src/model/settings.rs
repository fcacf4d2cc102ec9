use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Per-guild settings as shown and edited on the dashboard.
///
/// Discord ids are strings so browsers do not lose precision.
#[derive(Serialize, Deserialize, ToSchema, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GuildSettingsDto {
    pub guild_id: String,
    pub prefix: String,
    pub log_channel_id: Option<String>,
    pub logging: LoggingTogglesDto,
    pub automod: AutomodDto,
    pub welcome_channel_id: Option<String>,
    pub welcome_message: Option<String>,
    pub mod_role_ids: Vec<String>,
    pub disabled_channel_ids: Vec<String>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Serialize, Deserialize, ToSchema, Clone, Debug, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct LoggingTogglesDto {
    pub message_delete: bool,
    pub message_edit: bool,
    pub member_join: bool,
    pub member_leave: bool,
    pub moderation: bool,
}

#[derive(Serialize, Deserialize, ToSchema, Clone, Debug, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AutomodDto {
    pub enabled: bool,
    pub anti_invite: bool,
    pub anti_link: bool,
    pub max_mentions: u32,
    pub banned_words: Vec<String>,
    pub exempt_role_ids: Vec<String>,
}

/// Partial update for guild settings. Absent fields are left unchanged.
///
/// For the nullable channel fields an explicit `null` clears the value.
#[derive(Serialize, Deserialize, ToSchema, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGuildSettingsDto {
    pub prefix: Option<String>,
    #[serde(default, with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub log_channel_id: Option<Option<String>>,
    pub logging: Option<LoggingTogglesDto>,
    pub automod: Option<AutomodDto>,
    #[serde(default, with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub welcome_channel_id: Option<Option<String>>,
    #[serde(default, with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub welcome_message: Option<Option<String>>,
    pub mod_role_ids: Option<Vec<String>>,
    pub disabled_channel_ids: Option<Vec<String>>,
}

/// Runtime bot settings held in memory for the life of the process.
#[derive(Serialize, Deserialize, ToSchema, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BotSettingsDto {
    /// Rotating activity texts. `{guilds}`, `{members}` and `{commands}` are substituted.
    pub status_messages: Vec<String>,
    pub status_rotation_secs: u64,
    /// Default embed color as `0xRRGGBB`.
    pub embed_color: u32,
}

#[derive(Serialize, Deserialize, ToSchema, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBotSettingsDto {
    pub status_messages: Option<Vec<String>>,
    pub status_rotation_secs: Option<u64>,
    pub embed_color: Option<u32>,
}

/// Distinguishes an absent field from an explicit `null`.
mod double_option {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S, T>(value: &Option<Option<T>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: Serialize,
    {
        match value {
            Some(inner) => inner.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}
