//! Emoji reaction on an issue or comment. `comment_id` is 0 for issue reactions.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "reaction")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_name = "type")]
    pub reaction_type: String,
    pub issue_id: i64,
    pub comment_id: i64,
    pub user_id: i64,
    pub original_author_id: i64,
    pub original_author: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
