//! Bulk updates that hand migrated content over to the local account of its original author.
//!
//! Every function matches rows whose `original_author_id` is the provider-side id and whose
//! repository was migrated from `service_type`, points them at `local_user_id` and clears the
//! `original_author*` columns. Each returns affected rows.

use sea_orm::sea_query::{Expr, Query, SelectStatement};
use sea_orm::*;

use crate::entity::{comment, issue, reaction, release, repository, review};
use crate::models::GitServiceType;

/// `SELECT id FROM repository WHERE original_service_type = ?`
fn repos_migrated_from(service_type: GitServiceType) -> SelectStatement {
    Query::select()
        .column(repository::Column::Id)
        .from(repository::Entity)
        .and_where(repository::Column::OriginalServiceType.eq(service_type.as_i32()))
        .to_owned()
}

/// `SELECT id FROM issue WHERE repo_id IN (repos_migrated_from)`
fn issues_migrated_from(service_type: GitServiceType) -> SelectStatement {
    Query::select()
        .column(issue::Column::Id)
        .from(issue::Entity)
        .and_where(issue::Column::RepoId.in_subquery(repos_migrated_from(service_type)))
        .to_owned()
}

pub async fn reattribute_issues<C: ConnectionTrait>(
    db: &C,
    service_type: GitServiceType,
    original_author_id: i64,
    local_user_id: i64,
) -> Result<u64, DbErr> {
    let result = issue::Entity::update_many()
        .col_expr(issue::Column::PosterId, Expr::value(local_user_id))
        .col_expr(issue::Column::OriginalAuthor, Expr::value(""))
        .col_expr(issue::Column::OriginalAuthorId, Expr::value(0i64))
        .filter(issue::Column::OriginalAuthorId.eq(original_author_id))
        .filter(issue::Column::RepoId.in_subquery(repos_migrated_from(service_type)))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

pub async fn reattribute_comments<C: ConnectionTrait>(
    db: &C,
    service_type: GitServiceType,
    original_author_id: i64,
    local_user_id: i64,
) -> Result<u64, DbErr> {
    let result = comment::Entity::update_many()
        .col_expr(comment::Column::PosterId, Expr::value(local_user_id))
        .col_expr(comment::Column::OriginalAuthor, Expr::value(""))
        .col_expr(comment::Column::OriginalAuthorId, Expr::value(0i64))
        .filter(comment::Column::OriginalAuthorId.eq(original_author_id))
        .filter(comment::Column::IssueId.in_subquery(issues_migrated_from(service_type)))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

pub async fn reattribute_releases<C: ConnectionTrait>(
    db: &C,
    service_type: GitServiceType,
    original_author_id: i64,
    local_user_id: i64,
) -> Result<u64, DbErr> {
    let result = release::Entity::update_many()
        .col_expr(release::Column::PublisherId, Expr::value(local_user_id))
        .col_expr(release::Column::OriginalAuthor, Expr::value(""))
        .col_expr(release::Column::OriginalAuthorId, Expr::value(0i64))
        .filter(release::Column::OriginalAuthorId.eq(original_author_id))
        .filter(release::Column::RepoId.in_subquery(repos_migrated_from(service_type)))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

/// Reactions on issues and on comments alike; both carry the issue id.
pub async fn reattribute_reactions<C: ConnectionTrait>(
    db: &C,
    service_type: GitServiceType,
    original_author_id: i64,
    local_user_id: i64,
) -> Result<u64, DbErr> {
    let result = reaction::Entity::update_many()
        .col_expr(reaction::Column::UserId, Expr::value(local_user_id))
        .col_expr(reaction::Column::OriginalAuthor, Expr::value(""))
        .col_expr(reaction::Column::OriginalAuthorId, Expr::value(0i64))
        .filter(reaction::Column::OriginalAuthorId.eq(original_author_id))
        .filter(reaction::Column::IssueId.in_subquery(issues_migrated_from(service_type)))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

pub async fn reattribute_reviews<C: ConnectionTrait>(
    db: &C,
    service_type: GitServiceType,
    original_author_id: i64,
    local_user_id: i64,
) -> Result<u64, DbErr> {
    let result = review::Entity::update_many()
        .col_expr(review::Column::ReviewerId, Expr::value(local_user_id))
        .col_expr(review::Column::OriginalAuthor, Expr::value(""))
        .col_expr(review::Column::OriginalAuthorId, Expr::value(0i64))
        .filter(review::Column::OriginalAuthorId.eq(original_author_id))
        .filter(review::Column::IssueId.in_subquery(issues_migrated_from(service_type)))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}
