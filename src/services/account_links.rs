//! Bindings between local accounts and identities at external OAuth2 providers.
//!
//! A binding is keyed by (`external_id`, `login_source_id`); at most one local user can hold a
//! given provider identity. Also hands migrated content back to the local account once its
//! original author has linked their identity.

use sea_orm::*;
use serde::Serialize;
use serde_json::Value as JsonValue;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::db::{external_login_users, login_sources, migrated_content};
use crate::entity::{external_login_user, user};
use crate::error::{AppError, AppResult};
use crate::models::{ExternalIdentity, FindExternalUserOptions, GitServiceType};

/// Build the stored row for `identity` on `login_source_id`, owned by `user_id`.
pub fn link_from_identity(
    user_id: i64,
    login_source_id: i64,
    identity: &ExternalIdentity,
) -> external_login_user::Model {
    let raw_data = if identity.raw_data.is_empty() {
        None
    } else {
        Some(JsonValue::Object(identity.raw_data.clone()))
    };

    external_login_user::Model {
        external_id: identity.user_id.clone(),
        login_source_id,
        user_id,
        raw_data,
        provider: identity.provider.clone(),
        email: identity.email.clone(),
        name: identity.name.clone(),
        first_name: identity.first_name.clone(),
        last_name: identity.last_name.clone(),
        nick_name: identity.nick_name.clone(),
        description: identity.description.clone(),
        avatar_url: identity.avatar_url.clone(),
        location: identity.location.clone(),
        access_token: identity.access_token.clone(),
        access_token_secret: identity.access_token_secret.clone(),
        refresh_token: identity.refresh_token.clone(),
        expires_at: identity.expires_at,
    }
}

/// Look up the binding of a provider-side identity on a login source.
pub async fn get_link<C: ConnectionTrait>(
    db: &C,
    external_id: &str,
    login_source_id: i64,
) -> AppResult<Option<external_login_user::Model>> {
    external_login_users::find_by_key(db, external_id, login_source_id)
        .await
        .map_err(|e| AppError::Database(format!("Failed to get external login: {}", e)))
}

/// All bindings of a user, newest login source first.
pub async fn list_links<C: ConnectionTrait>(
    db: &C,
    owner: &user::Model,
) -> AppResult<Vec<external_login_user::Model>> {
    external_login_users::list_by_user(db, owner.id)
        .await
        .map_err(|e| AppError::Database(format!("Failed to list external logins: {}", e)))
}

/// Bind `link` to `owner`. Fails with [`AppError::AlreadyLinked`] if the identity is already
/// bound on that login source, to this user or any other.
pub async fn link_external_to_user(
    db: &DatabaseConnection,
    owner: &user::Model,
    mut link: external_login_user::Model,
) -> AppResult<()> {
    link.user_id = owner.id;

    let txn = db
        .begin()
        .await
        .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

    let existing = external_login_users::find_by_key(&txn, &link.external_id, link.login_source_id)
        .await
        .map_err(|e| AppError::Database(format!("Failed to get external login: {}", e)))?;
    if let Some(existing) = existing {
        return Err(AppError::AlreadyLinked {
            external_id: existing.external_id,
            user_id: existing.user_id,
            login_source_id: existing.login_source_id,
        });
    }

    // A concurrent insert between the check and here still trips the primary key.
    if let Err(e) = external_login_users::insert(&txn, &link).await {
        return Err(insert_error(e, link));
    }

    txn.commit()
        .await
        .map_err(|e| AppError::Database(format!("Failed to commit external login: {}", e)))?;

    info!(
        user_id = link.user_id,
        login_source_id = link.login_source_id,
        "Linked external identity"
    );
    Ok(())
}

/// A primary key violation on insert means the identity is already bound.
fn insert_error(err: DbErr, link: external_login_user::Model) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::AlreadyLinked {
            external_id: link.external_id,
            user_id: link.user_id,
            login_source_id: link.login_source_id,
        },
        _ => AppError::Database(format!("Failed to insert external login: {}", err)),
    }
}

/// Remove the user's binding on one login source. Returns rows removed.
pub async fn remove_link<C: ConnectionTrait>(
    db: &C,
    owner: &user::Model,
    login_source_id: i64,
) -> AppResult<u64> {
    let removed = external_login_users::delete_by_user_and_source(db, owner.id, login_source_id)
        .await
        .map_err(|e| AppError::Database(format!("Failed to remove external login: {}", e)))?;

    if removed == 0 {
        return Err(AppError::NotLinked {
            user_id: owner.id,
            login_source_id,
        });
    }
    Ok(removed)
}

/// Remove every binding of the user. Having none is not an error.
pub async fn remove_all_links<C: ConnectionTrait>(db: &C, owner: &user::Model) -> AppResult<u64> {
    external_login_users::delete_all_by_user(db, owner.id)
        .await
        .map_err(|e| AppError::Database(format!("Failed to remove external logins: {}", e)))
}

/// Local user bound to `external_id` at `provider`.
pub async fn user_id_by_external_id<C: ConnectionTrait>(
    db: &C,
    provider: &str,
    external_id: &str,
) -> AppResult<Option<i64>> {
    external_login_users::user_id_by_external_id(db, provider, external_id)
        .await
        .map_err(|e| AppError::Database(format!("Failed to resolve external login: {}", e)))
}

/// Refresh a stored binding with the profile a provider just returned. Never creates a
/// binding: an identity that is not linked yields [`AppError::NotLinked`].
pub async fn update_external_user<C: ConnectionTrait>(
    db: &C,
    owner: &user::Model,
    identity: &ExternalIdentity,
) -> AppResult<()> {
    let source = login_sources::find_active_oauth2_by_name(db, &identity.provider)
        .await
        .map_err(|e| AppError::Database(format!("Failed to get login source: {}", e)))?
        .ok_or_else(|| AppError::NotFound(format!("Login source '{}'", identity.provider)))?;

    let link = link_from_identity(owner.id, source.id, identity);
    let updated = external_login_users::update_by_key(db, &link)
        .await
        .map_err(|e| AppError::Database(format!("Failed to update external login: {}", e)))?;

    if updated == 0 {
        return Err(AppError::NotLinked {
            user_id: owner.id,
            login_source_id: source.id,
        });
    }

    debug!(user_id = owner.id, login_source_id = source.id, "Updated external login");
    Ok(())
}

/// Page through bindings of one provider (or all providers when `opts.provider` is empty).
pub async fn find_by_provider<C: ConnectionTrait>(
    db: &C,
    opts: &FindExternalUserOptions,
) -> AppResult<Vec<external_login_user::Model>> {
    external_login_users::find_by_provider(db, opts)
        .await
        .map_err(|e| AppError::Database(format!("Failed to find external logins: {}", e)))
}

/// Rows handed over per category by [`reattribute_imported_content`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReattributionReport {
    pub issues: u64,
    pub comments: u64,
    pub releases: u64,
    pub reactions: u64,
    pub reviews: u64,
}

impl ReattributionReport {
    pub fn total(&self) -> u64 {
        self.issues + self.comments + self.releases + self.reactions + self.reviews
    }
}

/// Point content migrated from `service_type` and authored by `external_user_id` at
/// `local_user_id`.
///
/// The five categories are updated one after another without a shared transaction. The first
/// failure (or a cancellation between categories) stops the rest, leaving earlier categories
/// reattributed; running it again is harmless since reattributed rows no longer match.
pub async fn reattribute_imported_content<C: ConnectionTrait>(
    db: &C,
    service_type: GitServiceType,
    external_user_id: &str,
    local_user_id: i64,
    cancel: &CancellationToken,
) -> AppResult<ReattributionReport> {
    let original_author_id: i64 = external_user_id.trim().parse().map_err(|_| {
        AppError::InvalidInput(format!(
            "External user id must be numeric, got '{}'",
            external_user_id
        ))
    })?;

    let mut report = ReattributionReport::default();

    let check = |category: &str| -> AppResult<()> {
        if cancel.is_cancelled() {
            return Err(AppError::Cancelled(format!(
                "Reattribution cancelled before {}",
                category
            )));
        }
        Ok(())
    };
    let failed = |category: &str, e: DbErr| {
        AppError::Database(format!("Failed to reattribute {}: {}", category, e))
    };

    check("issues")?;
    report.issues =
        migrated_content::reattribute_issues(db, service_type, original_author_id, local_user_id)
            .await
            .map_err(|e| failed("issues", e))?;

    check("comments")?;
    report.comments =
        migrated_content::reattribute_comments(db, service_type, original_author_id, local_user_id)
            .await
            .map_err(|e| failed("comments", e))?;

    check("releases")?;
    report.releases =
        migrated_content::reattribute_releases(db, service_type, original_author_id, local_user_id)
            .await
            .map_err(|e| failed("releases", e))?;

    check("reactions")?;
    report.reactions = migrated_content::reattribute_reactions(
        db,
        service_type,
        original_author_id,
        local_user_id,
    )
    .await
    .map_err(|e| failed("reactions", e))?;

    check("reviews")?;
    report.reviews =
        migrated_content::reattribute_reviews(db, service_type, original_author_id, local_user_id)
            .await
            .map_err(|e| failed("reviews", e))?;

    info!(
        local_user_id,
        original_author_id,
        total = report.total(),
        "Reattributed migrated content"
    );
    Ok(report)
}
