use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "ticket_config")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub guild_id: String,
    pub categories: Json,
    pub support_role_ids: Json,
    pub parent_category_id: Option<String>,
    pub transcript_channel_id: Option<String>,
    pub max_tickets_per_user: i32,
    pub ticket_counter: i32,
    pub delete_on_close: bool,
    pub panel_title: String,
    pub panel_description: String,
    pub panel_color: i32,
    pub welcome_message: Option<String>,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
