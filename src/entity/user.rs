//! User entity. Organizations are users with `user_type == 1`.

use sea_orm::entity::prelude::*;

use crate::models::{UserType, VisibleType};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub lower_name: String,
    pub name: String,
    pub email: String,
    #[sea_orm(column_name = "type")]
    pub user_type: i32,
    pub visibility: i32,
    pub is_admin: bool,
    pub is_restricted: bool,
    pub num_followers: i32,
    pub num_following: i32,
    pub num_stars: i32,
    pub num_repos: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Stored visibility tier; `None` for values this crate does not know.
    pub fn visibility(&self) -> Option<VisibleType> {
        VisibleType::from_i32(self.visibility)
    }

    pub fn is_organization(&self) -> bool {
        UserType::from_i32(self.user_type) == Some(UserType::Organization)
    }
}
