use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "guild_settings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub guild_id: String,
    pub prefix: String,
    pub log_channel_id: Option<String>,
    pub log_message_delete: bool,
    pub log_message_edit: bool,
    pub log_member_join: bool,
    pub log_member_leave: bool,
    pub log_moderation: bool,
    pub automod_enabled: bool,
    pub anti_invite: bool,
    pub anti_link: bool,
    pub max_mentions: i32,
    pub banned_words: Json,
    pub welcome_channel_id: Option<String>,
    pub welcome_message: Option<String>,
    pub mod_role_ids: Json,
    pub automod_exempt_role_ids: Json,
    pub disabled_channel_ids: Json,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
