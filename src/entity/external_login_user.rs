//! External login entity: binds a provider-side identity to a local user.
//!
//! The composite primary key (`external_id`, `login_source_id`) guarantees at most one
//! binding per identity and source.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "external_login_user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub external_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub login_source_id: i64,
    pub user_id: i64,
    pub raw_data: Option<Json>,
    pub provider: String,
    pub email: String,
    pub name: String,
    pub first_name: String,
    pub last_name: String,
    pub nick_name: String,
    pub description: String,
    pub avatar_url: String,
    pub location: String,
    pub access_token: String,
    pub access_token_secret: String,
    pub refresh_token: String,
    pub expires_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::login_source::Entity",
        from = "Column::LoginSourceId",
        to = "super::login_source::Column::Id"
    )]
    LoginSource,
}

impl Related<super::login_source::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LoginSource.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
