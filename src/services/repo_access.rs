//! Repository ids a user can reach.

use std::collections::BTreeSet;

use sea_orm::ConnectionTrait;

use crate::db::repositories;
use crate::entity::user;
use crate::error::AppResult;
use crate::models::UnitType;

/// Union of the repositories `member` owns and the organization repositories reachable through
/// their teams, deduplicated and in ascending order.
///
/// An empty `units` slice means any unit; `active_only` skips archived repositories.
pub async fn accessible_repo_ids<C: ConnectionTrait>(
    db: &C,
    member: &user::Model,
    units: &[UnitType],
    active_only: bool,
) -> AppResult<Vec<i64>> {
    let owned = repositories::owned_repo_ids(db, member, units, active_only).await?;
    let via_orgs = repositories::org_repo_ids(db, member, units, active_only).await?;

    let ids: BTreeSet<i64> = owned.into_iter().chain(via_orgs).collect();
    Ok(ids.into_iter().collect())
}
