//! Database operations for external login bindings.

use sea_orm::*;

use crate::entity::external_login_user;
use crate::models::FindExternalUserOptions;

/// Every column of `link` as `Set`, for inserts and full-row updates.
pub fn to_active_model(link: &external_login_user::Model) -> external_login_user::ActiveModel {
    external_login_user::ActiveModel {
        external_id: Set(link.external_id.clone()),
        login_source_id: Set(link.login_source_id),
        user_id: Set(link.user_id),
        raw_data: Set(link.raw_data.clone()),
        provider: Set(link.provider.clone()),
        email: Set(link.email.clone()),
        name: Set(link.name.clone()),
        first_name: Set(link.first_name.clone()),
        last_name: Set(link.last_name.clone()),
        nick_name: Set(link.nick_name.clone()),
        description: Set(link.description.clone()),
        avatar_url: Set(link.avatar_url.clone()),
        location: Set(link.location.clone()),
        access_token: Set(link.access_token.clone()),
        access_token_secret: Set(link.access_token_secret.clone()),
        refresh_token: Set(link.refresh_token.clone()),
        expires_at: Set(link.expires_at),
    }
}

/// Find the binding for a provider-side identity on one login source.
pub async fn find_by_key<C: ConnectionTrait>(
    db: &C,
    external_id: &str,
    login_source_id: i64,
) -> Result<Option<external_login_user::Model>, DbErr> {
    external_login_user::Entity::find_by_id((external_id.to_string(), login_source_id))
        .one(db)
        .await
}

/// All bindings of a user, newest login source first.
pub async fn list_by_user<C: ConnectionTrait>(
    db: &C,
    user_id: i64,
) -> Result<Vec<external_login_user::Model>, DbErr> {
    external_login_user::Entity::find()
        .filter(external_login_user::Column::UserId.eq(user_id))
        .order_by_desc(external_login_user::Column::LoginSourceId)
        .all(db)
        .await
}

pub async fn insert<C: ConnectionTrait>(
    db: &C,
    link: &external_login_user::Model,
) -> Result<(), DbErr> {
    external_login_user::Entity::insert(to_active_model(link))
        .exec_without_returning(db)
        .await?;
    Ok(())
}

/// Delete the user's bindings on one login source. Returns affected rows.
pub async fn delete_by_user_and_source<C: ConnectionTrait>(
    db: &C,
    user_id: i64,
    login_source_id: i64,
) -> Result<u64, DbErr> {
    let result = external_login_user::Entity::delete_many()
        .filter(external_login_user::Column::UserId.eq(user_id))
        .filter(external_login_user::Column::LoginSourceId.eq(login_source_id))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

/// Delete every binding of a user. Returns affected rows.
pub async fn delete_all_by_user<C: ConnectionTrait>(db: &C, user_id: i64) -> Result<u64, DbErr> {
    let result = external_login_user::Entity::delete_many()
        .filter(external_login_user::Column::UserId.eq(user_id))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

/// Local user id bound to `external_id` under `provider`, if any.
pub async fn user_id_by_external_id<C: ConnectionTrait>(
    db: &C,
    provider: &str,
    external_id: &str,
) -> Result<Option<i64>, DbErr> {
    external_login_user::Entity::find()
        .select_only()
        .column(external_login_user::Column::UserId)
        .filter(external_login_user::Column::Provider.eq(provider))
        .filter(external_login_user::Column::ExternalId.eq(external_id))
        .into_tuple::<i64>()
        .one(db)
        .await
}

/// Overwrite every column of the existing row keyed by the link's
/// (`external_id`, `login_source_id`). Returns affected rows; zero means no such row.
pub async fn update_by_key<C: ConnectionTrait>(
    db: &C,
    link: &external_login_user::Model,
) -> Result<u64, DbErr> {
    let result = external_login_user::Entity::update_many()
        .set(to_active_model(link))
        .filter(external_login_user::Column::ExternalId.eq(link.external_id.as_str()))
        .filter(external_login_user::Column::LoginSourceId.eq(link.login_source_id))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

/// Page through bindings, optionally restricted to one provider.
pub async fn find_by_provider<C: ConnectionTrait>(
    db: &C,
    opts: &FindExternalUserOptions,
) -> Result<Vec<external_login_user::Model>, DbErr> {
    let mut query = external_login_user::Entity::find();
    if !opts.provider.is_empty() {
        query = query.filter(external_login_user::Column::Provider.eq(opts.provider.as_str()));
    }
    query = query
        .order_by_asc(external_login_user::Column::LoginSourceId)
        .order_by_asc(external_login_user::Column::ExternalId);

    if opts.limit > 0 {
        query = query.offset(opts.start).limit(opts.limit);
    } else if opts.start > 0 {
        query = query.offset(opts.start);
    }

    query.all(db).await
}
