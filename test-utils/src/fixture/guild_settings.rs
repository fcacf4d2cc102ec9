//! Guild settings fixtures for creating in-memory test data.

use chrono::{TimeZone, Utc};
use entity::guild_settings;

/// Default test guild ID.
pub const DEFAULT_GUILD_ID: &str = "987654321";

/// Default command prefix.
pub const DEFAULT_PREFIX: &str = "!";

/// Creates a guild settings entity model with default values.
///
/// # Default Values
/// - id: `1`
/// - guild_id: `"987654321"`
/// - prefix: `"!"`
/// - banned_words: `["badword"]`
/// - mod_role_ids: `["111"]`
/// - all toggles disabled except `log_moderation`
pub fn entity() -> guild_settings::Model {
    let timestamp = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();

    guild_settings::Model {
        id: 1,
        guild_id: DEFAULT_GUILD_ID.to_string(),
        prefix: DEFAULT_PREFIX.to_string(),
        log_channel_id: None,
        log_message_delete: false,
        log_message_edit: false,
        log_member_join: false,
        log_member_leave: false,
        log_moderation: true,
        automod_enabled: false,
        anti_invite: false,
        anti_link: false,
        max_mentions: 0,
        banned_words: serde_json::json!(["badword"]),
        welcome_channel_id: None,
        welcome_message: None,
        mod_role_ids: serde_json::json!(["111"]),
        automod_exempt_role_ids: serde_json::json!([]),
        disabled_channel_ids: serde_json::json!([]),
        created_at: timestamp,
        updated_at: timestamp,
    }
}
