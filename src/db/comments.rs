//! Comment and reaction deletion used when an account's authored content is purged.

use sea_orm::*;

use crate::entity::{comment, reaction};
use crate::models::CommentType;
use crate::services::counters::{self, Counter};

/// Next batch of plain comments authored by `poster_id`, oldest first.
pub async fn next_plain_comments<C: ConnectionTrait>(
    db: &C,
    poster_id: i64,
    batch_size: u64,
) -> Result<Vec<comment::Model>, DbErr> {
    comment::Entity::find()
        .filter(comment::Column::CommentType.eq(CommentType::Comment.as_i32()))
        .filter(comment::Column::PosterId.eq(poster_id))
        .order_by_asc(comment::Column::Id)
        .limit(batch_size)
        .all(db)
        .await
}

/// Delete a comment together with its side effects: the reactions attached to it and, for
/// plain comments, the owning issue's comment counter.
pub async fn delete_comment<C: ConnectionTrait>(
    db: &C,
    comment: &comment::Model,
) -> Result<(), DbErr> {
    let deleted = comment::Entity::delete_by_id(comment.id).exec(db).await?;
    if deleted.rows_affected == 0 {
        return Ok(());
    }

    if comment.comment_type == CommentType::Comment.as_i32() {
        counters::decrement(db, Counter::IssueNumComments, &[comment.issue_id]).await?;
    }

    reaction::Entity::delete_many()
        .filter(reaction::Column::IssueId.eq(comment.issue_id))
        .filter(reaction::Column::CommentId.eq(comment.id))
        .exec(db)
        .await?;

    Ok(())
}

/// Delete every reaction the user left, on issues and comments alike.
pub async fn delete_reactions_by_user<C: ConnectionTrait>(
    db: &C,
    user_id: i64,
) -> Result<u64, DbErr> {
    let result = reaction::Entity::delete_many()
        .filter(reaction::Column::UserId.eq(user_id))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}
