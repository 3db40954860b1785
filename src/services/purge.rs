//! Removal of every row that references a user being deleted.
//!
//! [`DependentRecord::ALL`] lists each dependent table together with the column holding the
//! user id. Adding a table that references users means adding a variant here.

use sea_orm::sea_query::Query;
use sea_orm::*;
use tracing::debug;

use crate::entity::{
    access, access_token, action, collaboration, email_address, follow, gpg_key, gpg_key_import,
    issue_assignees, issue_user, public_key, reaction, star, stopwatch, team_user, user,
    user_open_id, user_setting, watch,
};
use crate::error::{AppError, AppResult};
use crate::services::account_links;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependentRecord {
    AccessToken,
    Collaboration,
    Access,
    Watch,
    Star,
    /// Follows the user made.
    Following,
    /// Follows of the user by others.
    Followers,
    Action,
    IssueUser,
    EmailAddress,
    UserOpenId,
    Reaction,
    TeamUser,
    Stopwatch,
    UserSetting,
    PublicKey,
    /// Imported key material of the user's GPG keys. Must run before [`Self::GpgKey`].
    GpgKeyImport,
    GpgKey,
    IssueAssignees,
    ExternalLoginUser,
}

impl DependentRecord {
    pub const ALL: [DependentRecord; 20] = [
        Self::AccessToken,
        Self::Collaboration,
        Self::Access,
        Self::Watch,
        Self::Star,
        Self::Following,
        Self::Followers,
        Self::Action,
        Self::IssueUser,
        Self::EmailAddress,
        Self::UserOpenId,
        Self::Reaction,
        Self::TeamUser,
        Self::Stopwatch,
        Self::UserSetting,
        Self::PublicKey,
        Self::GpgKeyImport,
        Self::GpgKey,
        Self::IssueAssignees,
        Self::ExternalLoginUser,
    ];

    /// Table name with the matching column, as reported and logged.
    pub fn table_name(&self) -> &'static str {
        match self {
            Self::AccessToken => "access_token",
            Self::Collaboration => "collaboration",
            Self::Access => "access",
            Self::Watch => "watch",
            Self::Star => "star",
            Self::Following => "follow(user_id)",
            Self::Followers => "follow(follow_id)",
            Self::Action => "action",
            Self::IssueUser => "issue_user",
            Self::EmailAddress => "email_address",
            Self::UserOpenId => "user_open_id",
            Self::Reaction => "reaction",
            Self::TeamUser => "team_user",
            Self::Stopwatch => "stopwatch",
            Self::UserSetting => "user_setting",
            Self::PublicKey => "public_key",
            Self::GpgKeyImport => "gpg_key_import",
            Self::GpgKey => "gpg_key",
            Self::IssueAssignees => "issue_assignees",
            Self::ExternalLoginUser => "external_login_user",
        }
    }

    /// Delete this table's rows for `owner`. Returns affected rows.
    pub async fn purge<C: ConnectionTrait>(self, db: &C, owner: &user::Model) -> AppResult<u64> {
        let uid = owner.id;
        let result = match self {
            Self::AccessToken => {
                access_token::Entity::delete_many()
                    .filter(access_token::Column::Uid.eq(uid))
                    .exec(db)
                    .await
            }
            Self::Collaboration => {
                collaboration::Entity::delete_many()
                    .filter(collaboration::Column::UserId.eq(uid))
                    .exec(db)
                    .await
            }
            Self::Access => {
                access::Entity::delete_many()
                    .filter(access::Column::UserId.eq(uid))
                    .exec(db)
                    .await
            }
            Self::Watch => {
                watch::Entity::delete_many()
                    .filter(watch::Column::UserId.eq(uid))
                    .exec(db)
                    .await
            }
            Self::Star => {
                star::Entity::delete_many()
                    .filter(star::Column::Uid.eq(uid))
                    .exec(db)
                    .await
            }
            Self::Following => {
                follow::Entity::delete_many()
                    .filter(follow::Column::UserId.eq(uid))
                    .exec(db)
                    .await
            }
            Self::Followers => {
                follow::Entity::delete_many()
                    .filter(follow::Column::FollowId.eq(uid))
                    .exec(db)
                    .await
            }
            Self::Action => {
                action::Entity::delete_many()
                    .filter(action::Column::UserId.eq(uid))
                    .exec(db)
                    .await
            }
            Self::IssueUser => {
                issue_user::Entity::delete_many()
                    .filter(issue_user::Column::Uid.eq(uid))
                    .exec(db)
                    .await
            }
            Self::EmailAddress => {
                email_address::Entity::delete_many()
                    .filter(email_address::Column::Uid.eq(uid))
                    .exec(db)
                    .await
            }
            Self::UserOpenId => {
                user_open_id::Entity::delete_many()
                    .filter(user_open_id::Column::Uid.eq(uid))
                    .exec(db)
                    .await
            }
            Self::Reaction => {
                reaction::Entity::delete_many()
                    .filter(reaction::Column::UserId.eq(uid))
                    .exec(db)
                    .await
            }
            Self::TeamUser => {
                team_user::Entity::delete_many()
                    .filter(team_user::Column::Uid.eq(uid))
                    .exec(db)
                    .await
            }
            Self::Stopwatch => {
                stopwatch::Entity::delete_many()
                    .filter(stopwatch::Column::UserId.eq(uid))
                    .exec(db)
                    .await
            }
            Self::UserSetting => {
                user_setting::Entity::delete_many()
                    .filter(user_setting::Column::UserId.eq(uid))
                    .exec(db)
                    .await
            }
            Self::PublicKey => {
                public_key::Entity::delete_many()
                    .filter(public_key::Column::OwnerId.eq(uid))
                    .exec(db)
                    .await
            }
            Self::GpgKeyImport => {
                let owned_keys = Query::select()
                    .column(gpg_key::Column::KeyId)
                    .from(gpg_key::Entity)
                    .and_where(gpg_key::Column::OwnerId.eq(uid))
                    .to_owned();
                gpg_key_import::Entity::delete_many()
                    .filter(gpg_key_import::Column::KeyId.in_subquery(owned_keys))
                    .exec(db)
                    .await
            }
            Self::GpgKey => {
                gpg_key::Entity::delete_many()
                    .filter(gpg_key::Column::OwnerId.eq(uid))
                    .exec(db)
                    .await
            }
            Self::IssueAssignees => {
                issue_assignees::Entity::delete_many()
                    .filter(issue_assignees::Column::AssigneeId.eq(uid))
                    .exec(db)
                    .await
            }
            Self::ExternalLoginUser => {
                return account_links::remove_all_links(db, owner).await.map_err(|e| {
                    AppError::Database(format!("Failed to purge {}: {}", self.table_name(), e))
                });
            }
        };

        result
            .map(|r| r.rows_affected)
            .map_err(|e| AppError::Database(format!("Failed to purge {}: {}", self.table_name(), e)))
    }
}

/// Run every entry of [`DependentRecord::ALL`] in order, stopping at the first failure.
/// Returns rows deleted per table.
pub async fn purge_dependents<C: ConnectionTrait>(
    db: &C,
    owner: &user::Model,
) -> AppResult<Vec<(&'static str, u64)>> {
    let mut deleted = Vec::with_capacity(DependentRecord::ALL.len());
    for record in DependentRecord::ALL {
        let rows = record.purge(db, owner).await?;
        debug!(user_id = owner.id, table = record.table_name(), rows, "Purged");
        deleted.push((record.table_name(), rows));
    }
    Ok(deleted)
}
