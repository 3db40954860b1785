//! Login source lookups.

use sea_orm::*;

use crate::entity::login_source;
use crate::models::LoginType;

/// The active OAuth2 login source registered under `name`.
pub async fn find_active_oauth2_by_name<C: ConnectionTrait>(
    db: &C,
    name: &str,
) -> Result<Option<login_source::Model>, DbErr> {
    login_source::Entity::find()
        .filter(login_source::Column::Name.eq(name))
        .filter(login_source::Column::LoginType.eq(LoginType::OAuth2.as_i32()))
        .filter(login_source::Column::IsActive.eq(true))
        .one(db)
        .await
}
