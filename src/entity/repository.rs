//! Repository entity (only the columns account management reads or corrects).

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "repository")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub owner_id: i64,
    pub lower_name: String,
    pub name: String,
    pub is_private: bool,
    pub is_archived: bool,
    pub num_watches: i32,
    pub num_stars: i32,
    /// Service the repository was migrated from; 0 when created locally.
    pub original_service_type: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::star::Entity")]
    Star,
    #[sea_orm(has_many = "super::watch::Entity")]
    Watch,
}

impl Related<super::star::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Star.def()
    }
}

impl Related<super::watch::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Watch.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
