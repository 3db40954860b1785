//! Denormalized counter corrections.
//!
//! Deleting a user severs watches, stars and follows that other rows count. Each
//! [`CounterAdjustment`] knows which relation rows identify the targets and which [`Counter`]
//! to decrement; the adjustments must run before the relation rows go away.

use sea_orm::sea_query::{Expr, ExprTrait, Query, SelectStatement};
use sea_orm::*;

use crate::entity::{follow, issue, repository, star, user, watch};
use crate::models::WatchMode;

/// A denormalized counter column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counter {
    RepoNumWatches,
    RepoNumStars,
    UserNumFollowers,
    UserNumFollowing,
    IssueNumComments,
}

impl Counter {
    /// `table.column`, for logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RepoNumWatches => "repository.num_watches",
            Self::RepoNumStars => "repository.num_stars",
            Self::UserNumFollowers => "user.num_followers",
            Self::UserNumFollowing => "user.num_following",
            Self::IssueNumComments => "issue.num_comments",
        }
    }
}

/// Which rows a decrement applies to.
enum Targets<'a> {
    Ids(&'a [i64]),
    Subquery(SelectStatement),
}

/// Decrement `counter` by one on every row whose id is in `ids`.
///
/// One bulk UPDATE; `updated_at` is left alone and counters already at zero stay at zero.
/// An empty id set issues no query.
pub async fn decrement<C: ConnectionTrait>(
    db: &C,
    counter: Counter,
    ids: &[i64],
) -> Result<u64, DbErr> {
    if ids.is_empty() {
        return Ok(0);
    }
    decrement_targets(db, counter, Targets::Ids(ids)).await
}

/// Decrement `counter` on every row whose id is returned by the single-column `ids` query.
///
/// The id set never leaves the database, so it is not bounded by bind parameter limits.
pub async fn decrement_selected<C: ConnectionTrait>(
    db: &C,
    counter: Counter,
    ids: SelectStatement,
) -> Result<u64, DbErr> {
    decrement_targets(db, counter, Targets::Subquery(ids)).await
}

async fn decrement_targets<C: ConnectionTrait>(
    db: &C,
    counter: Counter,
    targets: Targets<'_>,
) -> Result<u64, DbErr> {
    match counter {
        Counter::RepoNumWatches => {
            decrement_column::<repository::Entity, _>(
                db,
                repository::Column::NumWatches,
                repository::Column::Id,
                targets,
            )
            .await
        }
        Counter::RepoNumStars => {
            decrement_column::<repository::Entity, _>(
                db,
                repository::Column::NumStars,
                repository::Column::Id,
                targets,
            )
            .await
        }
        Counter::UserNumFollowers => {
            decrement_column::<user::Entity, _>(
                db,
                user::Column::NumFollowers,
                user::Column::Id,
                targets,
            )
            .await
        }
        Counter::UserNumFollowing => {
            decrement_column::<user::Entity, _>(
                db,
                user::Column::NumFollowing,
                user::Column::Id,
                targets,
            )
            .await
        }
        Counter::IssueNumComments => {
            decrement_column::<issue::Entity, _>(
                db,
                issue::Column::NumComments,
                issue::Column::Id,
                targets,
            )
            .await
        }
    }
}

async fn decrement_column<E, C>(
    db: &C,
    column: E::Column,
    id_column: E::Column,
    targets: Targets<'_>,
) -> Result<u64, DbErr>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    let id_filter = match targets {
        Targets::Ids(ids) => id_column.is_in(ids.iter().copied()),
        Targets::Subquery(query) => id_column.in_subquery(query),
    };

    let result = E::update_many()
        .col_expr(column, Expr::col(column).sub(1))
        .filter(id_filter)
        .filter(column.gt(0))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

/// Counter corrections required before a user's relation rows are deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterAdjustment {
    /// Repositories the user watches (excluding explicit "don't watch").
    RepoWatches,
    /// Repositories the user starred.
    RepoStars,
    /// Users the deleted user follows lose a follower.
    FolloweeFollowers,
    /// Users following the deleted user follow one fewer.
    FollowerFollowing,
}

impl CounterAdjustment {
    pub const ALL: [CounterAdjustment; 4] = [
        Self::RepoWatches,
        Self::RepoStars,
        Self::FolloweeFollowers,
        Self::FollowerFollowing,
    ];

    pub fn counter(&self) -> Counter {
        match self {
            Self::RepoWatches => Counter::RepoNumWatches,
            Self::RepoStars => Counter::RepoNumStars,
            Self::FolloweeFollowers => Counter::UserNumFollowers,
            Self::FollowerFollowing => Counter::UserNumFollowing,
        }
    }

    /// `SELECT <target id> FROM <relation> WHERE <user column> = user_id`
    pub fn target_query(&self, user_id: i64) -> SelectStatement {
        match self {
            Self::RepoWatches => Query::select()
                .column(watch::Column::RepoId)
                .from(watch::Entity)
                .and_where(watch::Column::UserId.eq(user_id))
                .and_where(watch::Column::Mode.ne(WatchMode::Dont.as_i32()))
                .to_owned(),
            Self::RepoStars => Query::select()
                .column(star::Column::RepoId)
                .from(star::Entity)
                .and_where(star::Column::Uid.eq(user_id))
                .to_owned(),
            Self::FolloweeFollowers => Query::select()
                .column(follow::Column::FollowId)
                .from(follow::Entity)
                .and_where(follow::Column::UserId.eq(user_id))
                .to_owned(),
            Self::FollowerFollowing => Query::select()
                .column(follow::Column::UserId)
                .from(follow::Entity)
                .and_where(follow::Column::FollowId.eq(user_id))
                .to_owned(),
        }
    }

    /// Decrement the counter on every target. Must run while the relation rows still exist.
    /// Returns rows updated.
    pub async fn apply<C: ConnectionTrait>(&self, db: &C, user_id: i64) -> Result<u64, DbErr> {
        decrement_selected(db, self.counter(), self.target_query(user_id)).await
    }
}
