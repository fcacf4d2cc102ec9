use std::str::FromStr;

use chrono::{DateTime, Utc};
use sea_orm::DbErr;

use crate::{
    model::settings::{AutomodDto, GuildSettingsDto, LoggingTogglesDto, UpdateGuildSettingsDto},
    server::{
        error::{command::CommandError, AppError},
        util::parse::{parse_id_list, parse_optional_id, parse_string_list, parse_u64_from_string},
    },
};

/// Longest prefix a guild may configure.
pub const MAX_PREFIX_LEN: usize = 5;

/// Per-guild bot configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct GuildSettings {
    pub id: i32,
    pub guild_id: u64,
    pub prefix: String,
    pub log_channel_id: Option<u64>,
    pub logging: LoggingToggles,
    pub automod: AutomodConfig,
    pub welcome_channel_id: Option<u64>,
    /// Supports `{user}` and `{server}` placeholders.
    pub welcome_message: Option<String>,
    pub mod_role_ids: Vec<u64>,
    pub disabled_channel_ids: Vec<u64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoggingToggles {
    pub message_delete: bool,
    pub message_edit: bool,
    pub member_join: bool,
    pub member_leave: bool,
    pub moderation: bool,
}

/// Auto-moderation rules applied to incoming guild messages.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AutomodConfig {
    pub enabled: bool,
    pub anti_invite: bool,
    pub anti_link: bool,
    /// Maximum user/role mentions per message; `0` disables the check.
    pub max_mentions: u32,
    pub banned_words: Vec<String>,
    pub exempt_role_ids: Vec<u64>,
}

impl GuildSettings {
    /// Converts an entity model to a domain model at the repository boundary.
    ///
    /// # Returns
    /// - `Ok(GuildSettings)` - Successfully converted
    /// - `Err(DbErr::Custom)` - A stored id or JSON list was malformed
    pub fn from_entity(entity: entity::guild_settings::Model) -> Result<Self, DbErr> {
        Ok(Self {
            id: entity.id,
            guild_id: parse_u64_from_string(&entity.guild_id)?,
            prefix: entity.prefix,
            log_channel_id: parse_optional_id(entity.log_channel_id.as_deref())?,
            logging: LoggingToggles {
                message_delete: entity.log_message_delete,
                message_edit: entity.log_message_edit,
                member_join: entity.log_member_join,
                member_leave: entity.log_member_leave,
                moderation: entity.log_moderation,
            },
            automod: AutomodConfig {
                enabled: entity.automod_enabled,
                anti_invite: entity.anti_invite,
                anti_link: entity.anti_link,
                max_mentions: entity.max_mentions.max(0) as u32,
                banned_words: parse_string_list("banned_words", &entity.banned_words)?,
                exempt_role_ids: parse_id_list(
                    "automod_exempt_role_ids",
                    &entity.automod_exempt_role_ids,
                )?,
            },
            welcome_channel_id: parse_optional_id(entity.welcome_channel_id.as_deref())?,
            welcome_message: entity.welcome_message,
            mod_role_ids: parse_id_list("mod_role_ids", &entity.mod_role_ids)?,
            disabled_channel_ids: parse_id_list(
                "disabled_channel_ids",
                &entity.disabled_channel_ids,
            )?,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        })
    }

    /// Whether `event` should be written to the log channel.
    ///
    /// Always false while no log channel is configured.
    pub fn logs(&self, event: LogEvent) -> bool {
        self.log_channel_id.is_some() && event.enabled_in(&self.logging)
    }

    pub fn is_channel_disabled(&self, channel_id: u64) -> bool {
        self.disabled_channel_ids.contains(&channel_id)
    }

    pub fn into_dto(self) -> GuildSettingsDto {
        GuildSettingsDto {
            guild_id: self.guild_id.to_string(),
            prefix: self.prefix,
            log_channel_id: self.log_channel_id.map(|id| id.to_string()),
            logging: LoggingTogglesDto {
                message_delete: self.logging.message_delete,
                message_edit: self.logging.message_edit,
                member_join: self.logging.member_join,
                member_leave: self.logging.member_leave,
                moderation: self.logging.moderation,
            },
            automod: AutomodDto {
                enabled: self.automod.enabled,
                anti_invite: self.automod.anti_invite,
                anti_link: self.automod.anti_link,
                max_mentions: self.automod.max_mentions,
                banned_words: self.automod.banned_words,
                exempt_role_ids: self
                    .automod
                    .exempt_role_ids
                    .iter()
                    .map(|id| id.to_string())
                    .collect(),
            },
            welcome_channel_id: self.welcome_channel_id.map(|id| id.to_string()),
            welcome_message: self.welcome_message,
            mod_role_ids: self.mod_role_ids.iter().map(|id| id.to_string()).collect(),
            disabled_channel_ids: self
                .disabled_channel_ids
                .iter()
                .map(|id| id.to_string())
                .collect(),
            updated_at: self.updated_at,
        }
    }
}

/// Events that can be mirrored to a guild's log channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogEvent {
    MessageDelete,
    MessageEdit,
    MemberJoin,
    MemberLeave,
    Moderation,
}

impl LogEvent {
    pub const NAMES: [&'static str; 5] = ["delete", "edit", "join", "leave", "moderation"];

    fn enabled_in(self, toggles: &LoggingToggles) -> bool {
        match self {
            Self::MessageDelete => toggles.message_delete,
            Self::MessageEdit => toggles.message_edit,
            Self::MemberJoin => toggles.member_join,
            Self::MemberLeave => toggles.member_leave,
            Self::Moderation => toggles.moderation,
        }
    }

    pub fn set_in(self, toggles: &mut LoggingToggles, enabled: bool) {
        match self {
            Self::MessageDelete => toggles.message_delete = enabled,
            Self::MessageEdit => toggles.message_edit = enabled,
            Self::MemberJoin => toggles.member_join = enabled,
            Self::MemberLeave => toggles.member_leave = enabled,
            Self::Moderation => toggles.moderation = enabled,
        }
    }
}

impl FromStr for LogEvent {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "delete" => Ok(Self::MessageDelete),
            "edit" => Ok(Self::MessageEdit),
            "join" => Ok(Self::MemberJoin),
            "leave" => Ok(Self::MemberLeave),
            "moderation" => Ok(Self::Moderation),
            other => Err(CommandError::InvalidArgument {
                name: "event".to_string(),
                reason: format!(
                    "`{}` is not a log event ({})",
                    other,
                    Self::NAMES.join(", ")
                ),
            }),
        }
    }
}

/// Auto-moderation switches exposed by `config automod`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutomodToggle {
    Enabled,
    AntiInvite,
    AntiLink,
}

impl AutomodToggle {
    pub const NAMES: [&'static str; 3] = ["enabled", "invites", "links"];

    pub fn set_in(self, automod: &mut AutomodConfig, value: bool) {
        match self {
            Self::Enabled => automod.enabled = value,
            Self::AntiInvite => automod.anti_invite = value,
            Self::AntiLink => automod.anti_link = value,
        }
    }
}

impl FromStr for AutomodToggle {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "enabled" => Ok(Self::Enabled),
            "invites" => Ok(Self::AntiInvite),
            "links" => Ok(Self::AntiLink),
            other => Err(CommandError::InvalidArgument {
                name: "toggle".to_string(),
                reason: format!("`{}` is not one of {}", other, Self::NAMES.join(", ")),
            }),
        }
    }
}

/// Partial update applied to a guild's settings. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateGuildSettingsParam {
    pub prefix: Option<String>,
    pub log_channel_id: Option<Option<u64>>,
    pub logging: Option<LoggingToggles>,
    pub automod: Option<AutomodConfig>,
    pub welcome_channel_id: Option<Option<u64>>,
    pub welcome_message: Option<Option<String>>,
    pub mod_role_ids: Option<Vec<u64>>,
    pub disabled_channel_ids: Option<Vec<u64>>,
}

impl UpdateGuildSettingsParam {
    /// Converts a dashboard update body, validating ids and the prefix.
    ///
    /// # Returns
    /// - `Ok(UpdateGuildSettingsParam)` - Valid update
    /// - `Err(AppError::BadRequest)` - An id is not numeric or the prefix is invalid
    pub fn from_dto(dto: UpdateGuildSettingsDto) -> Result<Self, AppError> {
        if let Some(prefix) = &dto.prefix {
            validate_prefix(prefix).map_err(|e| AppError::BadRequest(e.to_string()))?;
        }

        let automod = dto
            .automod
            .map(|a| -> Result<AutomodConfig, AppError> {
                Ok(AutomodConfig {
                    enabled: a.enabled,
                    anti_invite: a.anti_invite,
                    anti_link: a.anti_link,
                    max_mentions: a.max_mentions,
                    banned_words: normalize_words(a.banned_words),
                    exempt_role_ids: parse_request_ids("automod.exemptRoleIds", a.exempt_role_ids)?,
                })
            })
            .transpose()?;

        Ok(Self {
            prefix: dto.prefix,
            log_channel_id: dto
                .log_channel_id
                .map(|id| id.map(|id| parse_request_id("logChannelId", &id)).transpose())
                .transpose()?,
            logging: dto.logging.map(|l| LoggingToggles {
                message_delete: l.message_delete,
                message_edit: l.message_edit,
                member_join: l.member_join,
                member_leave: l.member_leave,
                moderation: l.moderation,
            }),
            automod,
            welcome_channel_id: dto
                .welcome_channel_id
                .map(|id| {
                    id.map(|id| parse_request_id("welcomeChannelId", &id))
                        .transpose()
                })
                .transpose()?,
            welcome_message: dto.welcome_message,
            mod_role_ids: dto
                .mod_role_ids
                .map(|ids| parse_request_ids("modRoleIds", ids))
                .transpose()?,
            disabled_channel_ids: dto
                .disabled_channel_ids
                .map(|ids| parse_request_ids("disabledChannelIds", ids))
                .transpose()?,
        })
    }
}

/// Checks that a prefix is 1 to 5 characters without whitespace.
pub fn validate_prefix(prefix: &str) -> Result<(), CommandError> {
    let len = prefix.chars().count();
    if len == 0 || len > MAX_PREFIX_LEN || prefix.chars().any(char::is_whitespace) {
        return Err(CommandError::InvalidArgument {
            name: "prefix".to_string(),
            reason: format!(
                "a prefix must be 1 to {} characters with no spaces",
                MAX_PREFIX_LEN
            ),
        });
    }
    Ok(())
}

/// Lowercases, trims and de-duplicates banned words, dropping empty entries.
pub fn normalize_words(words: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(words.len());
    for word in words {
        let word = word.trim().to_lowercase();
        if !word.is_empty() && !out.contains(&word) {
            out.push(word);
        }
    }
    out
}

fn parse_request_id(field: &str, value: &str) -> Result<u64, AppError> {
    value
        .parse::<u64>()
        .map_err(|_| AppError::BadRequest(format!("{} must be a numeric Discord id", field)))
}

fn parse_request_ids(field: &str, values: Vec<String>) -> Result<Vec<u64>, AppError> {
    values.iter().map(|v| parse_request_id(field, v)).collect()
}
