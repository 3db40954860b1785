//! Database queries for repositories a user owns, can reach, stars or watches.

use sea_orm::sea_query::{Query, SelectStatement};
use sea_orm::*;

use crate::entity::{repo_unit, repository, star, team_repo, team_user, user, watch};
use crate::error::{AppError, AppResult};
use crate::models::{ListOptions, UnitType, WatchMode};

/// `SELECT repo_id FROM repo_unit WHERE type IN (units)`
fn repos_with_units(units: &[UnitType]) -> SelectStatement {
    Query::select()
        .column(repo_unit::Column::RepoId)
        .from(repo_unit::Entity)
        .and_where(repo_unit::Column::UnitType.is_in(units.iter().map(UnitType::as_i32)))
        .to_owned()
}

/// Apply the optional unit and archival filters shared by every id query.
fn filtered(
    mut query: Select<repository::Entity>,
    units: &[UnitType],
    active_only: bool,
) -> Select<repository::Entity> {
    if !units.is_empty() {
        query = query.filter(repository::Column::Id.in_subquery(repos_with_units(units)));
    }
    if active_only {
        query = query.filter(repository::Column::IsArchived.eq(false));
    }
    query
}

/// IDs of repositories owned by the user, optionally restricted to ones with any of `units`
/// enabled and to non-archived ones.
pub async fn owned_repo_ids<C: ConnectionTrait>(
    db: &C,
    owner: &user::Model,
    units: &[UnitType],
    active_only: bool,
) -> AppResult<Vec<i64>> {
    let query = repository::Entity::find()
        .select_only()
        .column(repository::Column::Id)
        .filter(repository::Column::OwnerId.eq(owner.id));

    filtered(query, units, active_only)
        .order_by_asc(repository::Column::Id)
        .into_tuple::<i64>()
        .all(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to get owned repository ids: {}", e)))
}

/// IDs of organization repositories reachable through the user's team memberships.
///
/// A repository qualifies when its owner is an organization the user has a team in and it is
/// either public, or (for non-restricted users) granted to one of the user's teams.
pub async fn org_repo_ids<C: ConnectionTrait>(
    db: &C,
    member: &user::Model,
    units: &[UnitType],
    active_only: bool,
) -> AppResult<Vec<i64>> {
    let member_orgs = Query::select()
        .column(team_user::Column::OrgId)
        .from(team_user::Entity)
        .and_where(team_user::Column::Uid.eq(member.id))
        .to_owned();

    let mut reach = Condition::any().add(repository::Column::IsPrivate.eq(false));
    if !member.is_restricted {
        let member_teams = Query::select()
            .column(team_user::Column::TeamId)
            .from(team_user::Entity)
            .and_where(team_user::Column::Uid.eq(member.id))
            .to_owned();
        let granted = Query::select()
            .column(team_repo::Column::RepoId)
            .from(team_repo::Entity)
            .and_where(team_repo::Column::TeamId.in_subquery(member_teams))
            .to_owned();
        reach = reach.add(repository::Column::Id.in_subquery(granted));
    }

    let query = repository::Entity::find()
        .select_only()
        .column(repository::Column::Id)
        .filter(repository::Column::OwnerId.in_subquery(member_orgs))
        .filter(reach);

    filtered(query, units, active_only)
        .order_by_asc(repository::Column::Id)
        .into_tuple::<i64>()
        .all(db)
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to get organization repository ids: {}", e))
        })
}

/// Repositories starred by a user. `page == 0` returns everything.
pub async fn starred_repos<C: ConnectionTrait>(
    db: &C,
    user_id: i64,
    include_private: bool,
    opts: ListOptions,
) -> AppResult<Vec<repository::Model>> {
    let mut query = repository::Entity::find()
        .join(JoinType::InnerJoin, star::Relation::Repository.def().rev())
        .filter(star::Column::Uid.eq(user_id));
    if !include_private {
        query = query.filter(repository::Column::IsPrivate.eq(false));
    }
    query = query.order_by_asc(repository::Column::Id);

    if opts.is_paginated() {
        query = query
            .offset(opts.offset())
            .limit(opts.clamped_page_size());
    }

    query
        .all(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to get starred repositories: {}", e)))
}

/// Repositories watched by a user, with the total count before pagination.
/// Explicit "don't watch" rows are excluded.
pub async fn watched_repos<C: ConnectionTrait>(
    db: &C,
    user_id: i64,
    include_private: bool,
    opts: ListOptions,
) -> AppResult<(Vec<repository::Model>, u64)> {
    let mut query = repository::Entity::find()
        .join(JoinType::InnerJoin, watch::Relation::Repository.def().rev())
        .filter(watch::Column::UserId.eq(user_id))
        .filter(watch::Column::Mode.ne(WatchMode::Dont.as_i32()));
    if !include_private {
        query = query.filter(repository::Column::IsPrivate.eq(false));
    }

    let total = query
        .clone()
        .count(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to count watched repositories: {}", e)))?;

    query = query.order_by_asc(repository::Column::Id);
    if opts.is_paginated() {
        query = query
            .offset(opts.offset())
            .limit(opts.clamped_page_size());
    }

    let repos = query
        .all(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to get watched repositories: {}", e)))?;

    Ok((repos, total))
}
