//! Database operations for users.

use sea_orm::sea_query::Query;
use sea_orm::*;

use crate::entity::{follow, team_user, user};
use crate::error::AppResult;

/// Find a user by ID.
pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: i64) -> AppResult<Option<user::Model>> {
    let result = user::Entity::find_by_id(id).one(db).await?;
    Ok(result)
}

/// Whether `user_id` follows `follow_id`.
pub async fn is_following<C: ConnectionTrait>(
    db: &C,
    user_id: i64,
    follow_id: i64,
) -> Result<bool, DbErr> {
    let count = follow::Entity::find()
        .filter(follow::Column::UserId.eq(user_id))
        .filter(follow::Column::FollowId.eq(follow_id))
        .count(db)
        .await?;
    Ok(count > 0)
}

/// Count the team memberships of `viewer_id` that put them in an organization with `subject_id`.
///
/// A membership counts when its organization is the subject itself or any organization the
/// subject belongs to through one of its own teams.
pub async fn count_shared_org_memberships<C: ConnectionTrait>(
    db: &C,
    viewer_id: i64,
    subject_id: i64,
) -> Result<u64, DbErr> {
    let subject_orgs = Query::select()
        .column(team_user::Column::OrgId)
        .from(team_user::Entity)
        .and_where(team_user::Column::Uid.eq(subject_id))
        .to_owned();

    team_user::Entity::find()
        .filter(team_user::Column::Uid.eq(viewer_id))
        .filter(
            Condition::any()
                .add(team_user::Column::OrgId.eq(subject_id))
                .add(team_user::Column::OrgId.in_subquery(subject_orgs)),
        )
        .count(db)
        .await
}

/// Number of organizations the user is a member of through any of their teams.
pub async fn organization_count<C: ConnectionTrait>(db: &C, user_id: i64) -> Result<u64, DbErr> {
    team_user::Entity::find()
        .select_only()
        .column(team_user::Column::OrgId)
        .distinct()
        .filter(team_user::Column::Uid.eq(user_id))
        .count(db)
        .await
}

/// Delete the identity row itself. Returns affected rows.
pub async fn delete_by_id<C: ConnectionTrait>(db: &C, id: i64) -> Result<u64, DbErr> {
    let result = user::Entity::delete_by_id(id).exec(db).await?;
    Ok(result.rows_affected)
}
