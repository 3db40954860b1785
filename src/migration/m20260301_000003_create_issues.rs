//! Migration: Create issue, comment, reaction, review, release and stopwatch tables.
//!
//! Every authored row keeps `original_author`/`original_author_id` so content imported from
//! another service can later be attributed to a local account.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

fn id_col<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .big_integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .to_owned()
}

fn ref_col<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .big_integer()
        .not_null()
        .default(0)
        .to_owned()
}

fn original_author_cols<A: IntoIden, B: IntoIden>(name: A, id: B) -> [ColumnDef; 2] {
    [
        ColumnDef::new(name).string().not_null().default("").to_owned(),
        ColumnDef::new(id)
            .big_integer()
            .not_null()
            .default(0)
            .to_owned(),
    ]
}

fn created_col<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .timestamp_with_time_zone()
        .not_null()
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let [mut author, mut author_id] =
            original_author_cols(Issue::OriginalAuthor, Issue::OriginalAuthorId);
        manager
            .create_table(
                Table::create()
                    .table(Issue::Table)
                    .if_not_exists()
                    .col(&mut id_col(Issue::Id))
                    .col(&mut ref_col(Issue::RepoId))
                    .col(&mut ref_col(Issue::Index))
                    .col(&mut ref_col(Issue::PosterId))
                    .col(&mut author)
                    .col(&mut author_id)
                    .col(ColumnDef::new(Issue::Title).string().not_null())
                    .col(ColumnDef::new(Issue::NumComments).integer().not_null().default(0))
                    .col(ColumnDef::new(Issue::IsClosed).boolean().not_null().default(false))
                    .col(&mut created_col(Issue::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_issue_original_author_id")
                    .table(Issue::Table)
                    .col(Issue::OriginalAuthorId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(IssueUser::Table)
                    .if_not_exists()
                    .col(&mut id_col(IssueUser::Id))
                    .col(&mut ref_col(IssueUser::Uid))
                    .col(&mut ref_col(IssueUser::IssueId))
                    .col(ColumnDef::new(IssueUser::IsRead).boolean().not_null().default(true))
                    .col(
                        ColumnDef::new(IssueUser::IsMentioned)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(IssueAssignees::Table)
                    .if_not_exists()
                    .col(&mut id_col(IssueAssignees::Id))
                    .col(&mut ref_col(IssueAssignees::AssigneeId))
                    .col(&mut ref_col(IssueAssignees::IssueId))
                    .to_owned(),
            )
            .await?;

        let [mut author, mut author_id] =
            original_author_cols(Comment::OriginalAuthor, Comment::OriginalAuthorId);
        manager
            .create_table(
                Table::create()
                    .table(Comment::Table)
                    .if_not_exists()
                    .col(&mut id_col(Comment::Id))
                    .col(ColumnDef::new(Comment::Type).integer().not_null().default(0))
                    .col(&mut ref_col(Comment::PosterId))
                    .col(&mut author)
                    .col(&mut author_id)
                    .col(&mut ref_col(Comment::IssueId))
                    .col(ColumnDef::new(Comment::Content).text().not_null().default(""))
                    .col(&mut created_col(Comment::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_comment_poster_id")
                    .table(Comment::Table)
                    .col(Comment::PosterId)
                    .to_owned(),
            )
            .await?;

        let [mut author, mut author_id] =
            original_author_cols(Reaction::OriginalAuthor, Reaction::OriginalAuthorId);
        manager
            .create_table(
                Table::create()
                    .table(Reaction::Table)
                    .if_not_exists()
                    .col(&mut id_col(Reaction::Id))
                    .col(ColumnDef::new(Reaction::Type).string().not_null())
                    .col(&mut ref_col(Reaction::IssueId))
                    .col(&mut ref_col(Reaction::CommentId))
                    .col(&mut ref_col(Reaction::UserId))
                    .col(&mut author_id)
                    .col(&mut author)
                    .col(&mut created_col(Reaction::CreatedAt))
                    .to_owned(),
            )
            .await?;

        let [mut author, mut author_id] =
            original_author_cols(Review::OriginalAuthor, Review::OriginalAuthorId);
        manager
            .create_table(
                Table::create()
                    .table(Review::Table)
                    .if_not_exists()
                    .col(&mut id_col(Review::Id))
                    .col(ColumnDef::new(Review::Type).integer().not_null().default(0))
                    .col(&mut ref_col(Review::ReviewerId))
                    .col(&mut ref_col(Review::IssueId))
                    .col(&mut author)
                    .col(&mut author_id)
                    .col(&mut created_col(Review::CreatedAt))
                    .to_owned(),
            )
            .await?;

        let [mut author, mut author_id] =
            original_author_cols(Release::OriginalAuthor, Release::OriginalAuthorId);
        manager
            .create_table(
                Table::create()
                    .table(Release::Table)
                    .if_not_exists()
                    .col(&mut id_col(Release::Id))
                    .col(&mut ref_col(Release::RepoId))
                    .col(&mut ref_col(Release::PublisherId))
                    .col(ColumnDef::new(Release::TagName).string().not_null())
                    .col(&mut author)
                    .col(&mut author_id)
                    .col(&mut created_col(Release::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Stopwatch::Table)
                    .if_not_exists()
                    .col(&mut id_col(Stopwatch::Id))
                    .col(&mut ref_col(Stopwatch::IssueId))
                    .col(&mut ref_col(Stopwatch::UserId))
                    .col(&mut created_col(Stopwatch::CreatedAt))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Stopwatch::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Release::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Review::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Reaction::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Comment::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(IssueAssignees::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(IssueUser::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Issue::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Issue {
    Table,
    Id,
    RepoId,
    Index,
    PosterId,
    OriginalAuthor,
    OriginalAuthorId,
    Title,
    NumComments,
    IsClosed,
    CreatedAt,
}

#[derive(DeriveIden)]
enum IssueUser {
    Table,
    Id,
    Uid,
    IssueId,
    IsRead,
    IsMentioned,
}

#[derive(DeriveIden)]
enum IssueAssignees {
    Table,
    Id,
    AssigneeId,
    IssueId,
}

#[derive(DeriveIden)]
enum Comment {
    Table,
    Id,
    Type,
    PosterId,
    OriginalAuthor,
    OriginalAuthorId,
    IssueId,
    Content,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Reaction {
    Table,
    Id,
    Type,
    IssueId,
    CommentId,
    UserId,
    OriginalAuthorId,
    OriginalAuthor,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Review {
    Table,
    Id,
    Type,
    ReviewerId,
    IssueId,
    OriginalAuthor,
    OriginalAuthorId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Release {
    Table,
    Id,
    RepoId,
    PublisherId,
    TagName,
    OriginalAuthor,
    OriginalAuthorId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Stopwatch {
    Table,
    Id,
    IssueId,
    UserId,
    CreatedAt,
}
