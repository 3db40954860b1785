//! Account deletion.
//!
//! Removing a user corrects the counters their relations fed, purges every dependent record,
//! optionally deletes the comments and reactions of a recently created account, then removes
//! the user row. Everything happens in one transaction: either the account is gone with all
//! of its traces, or nothing changed.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sea_orm::*;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::DeletionSettings;
use crate::db::{comments, users, DbPool};
use crate::entity::user;
use crate::error::{AppError, AppResult};
use crate::services::counters::CounterAdjustment;
use crate::services::purge;

/// Comments deleted per round trip when purging authored content.
pub const COMMENT_BATCH_SIZE: u64 = 50;

/// What a deletion touched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DeletionReport {
    pub user_id: i64,
    /// `(counter, rows decremented)` per adjustment.
    pub counters: Vec<(&'static str, u64)>,
    /// `(table, rows deleted)` per dependent table.
    pub purged: Vec<(&'static str, u64)>,
    /// Whether the account was young enough to have its content purged.
    pub content_purged: bool,
    pub comments_deleted: u64,
    pub reactions_deleted: u64,
}

impl DeletionReport {
    /// Total rows deleted across dependent tables and purged content.
    pub fn rows_deleted(&self) -> u64 {
        self.purged.iter().map(|(_, n)| n).sum::<u64>()
            + self.comments_deleted
            + self.reactions_deleted
    }
}

/// Whether an account created at `created_at` is young enough for its comments and reactions to
/// be deleted with it. A zero `max_age` disables content purge. Creation times in the future
/// count as age zero.
pub fn within_content_purge_window(
    created_at: DateTime<Utc>,
    now: DateTime<Utc>,
    max_age: Duration,
) -> bool {
    if max_age.is_zero() {
        return false;
    }
    let age = (now - created_at).to_std().unwrap_or(Duration::ZERO);
    age < max_age
}

fn ensure_not_cancelled(cancel: &CancellationToken, user_id: i64, stage: &str) -> AppResult<()> {
    if cancel.is_cancelled() {
        return Err(AppError::Cancelled(format!(
            "Deletion of user {} cancelled before {}",
            user_id, stage
        )));
    }
    Ok(())
}

/// Delete `target` and everything that references it.
///
/// Rolls back on any error, including cancellation through `cancel`, which is observed between
/// stages and between comment batches.
pub async fn delete_user(
    pool: &DbPool,
    target: &user::Model,
    settings: &DeletionSettings,
    cancel: &CancellationToken,
) -> AppResult<DeletionReport> {
    ensure_not_cancelled(cancel, target.id, "start")?;

    let txn = pool
        .connection()
        .begin()
        .await
        .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

    let mut report = DeletionReport {
        user_id: target.id,
        ..Default::default()
    };

    // Counters are resolved against the relation rows, so they go first.
    for adjustment in CounterAdjustment::ALL {
        let updated = adjustment.apply(&txn, target.id).await.map_err(|e| {
            AppError::Database(format!(
                "Failed to adjust {}: {}",
                adjustment.counter().as_str(),
                e
            ))
        })?;
        debug!(
            user_id = target.id,
            counter = adjustment.counter().as_str(),
            updated,
            "Adjusted counter"
        );
        report.counters.push((adjustment.counter().as_str(), updated));
    }

    ensure_not_cancelled(cancel, target.id, "dependent purge")?;
    report.purged = purge::purge_dependents(&txn, target).await?;

    if within_content_purge_window(
        target.created_at,
        Utc::now(),
        settings.delete_with_comments_max_age,
    ) {
        report.content_purged = true;
        report.comments_deleted = purge_comments(&txn, target.id, cancel).await?;

        ensure_not_cancelled(cancel, target.id, "reaction purge")?;
        report.reactions_deleted = comments::delete_reactions_by_user(&txn, target.id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete reactions: {}", e)))?;
    }

    ensure_not_cancelled(cancel, target.id, "user row removal")?;
    let removed = users::delete_by_id(&txn, target.id)
        .await
        .map_err(|e| AppError::Database(format!("Failed to delete user: {}", e)))?;
    if removed == 0 {
        return Err(AppError::NotFound(format!("User {}", target.id)));
    }

    txn.commit()
        .await
        .map_err(|e| AppError::Database(format!("Failed to commit user deletion: {}", e)))?;

    info!(
        user_id = report.user_id,
        rows_deleted = report.rows_deleted(),
        content_purged = report.content_purged,
        comments_deleted = report.comments_deleted,
        "Deleted user"
    );

    Ok(report)
}

/// Delete the user's plain comments in batches. Each batch reads from the start because the
/// previous batch's rows are already gone.
async fn purge_comments<C: ConnectionTrait>(
    db: &C,
    user_id: i64,
    cancel: &CancellationToken,
) -> AppResult<u64> {
    let mut deleted = 0u64;
    loop {
        ensure_not_cancelled(cancel, user_id, "next comment batch")?;

        let batch = comments::next_plain_comments(db, user_id, COMMENT_BATCH_SIZE)
            .await
            .map_err(|e| AppError::Database(format!("Failed to list comments: {}", e)))?;
        if batch.is_empty() {
            break;
        }

        for comment in &batch {
            comments::delete_comment(db, comment).await.map_err(|e| {
                AppError::Database(format!("Failed to delete comment {}: {}", comment.id, e))
            })?;
        }
        deleted += batch.len() as u64;

        if (batch.len() as u64) < COMMENT_BATCH_SIZE {
            break;
        }
    }
    Ok(deleted)
}
