//! Migration: Create repository, relation and organization team tables.

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
    ColumnDef::new(col).big_integer().not_null().to_owned()
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
        manager
            .create_table(
                Table::create()
                    .table(Repository::Table)
                    .if_not_exists()
                    .col(&mut id_col(Repository::Id))
                    .col(&mut ref_col(Repository::OwnerId))
                    .col(ColumnDef::new(Repository::LowerName).string().not_null())
                    .col(ColumnDef::new(Repository::Name).string().not_null())
                    .col(
                        ColumnDef::new(Repository::IsPrivate)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Repository::IsArchived)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Repository::NumWatches)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Repository::NumStars)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Repository::OriginalServiceType)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(&mut created_col(Repository::CreatedAt))
                    .col(&mut created_col(Repository::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_repository_owner_id")
                    .table(Repository::Table)
                    .col(Repository::OwnerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RepoUnit::Table)
                    .if_not_exists()
                    .col(&mut id_col(RepoUnit::Id))
                    .col(&mut ref_col(RepoUnit::RepoId))
                    .col(ColumnDef::new(RepoUnit::Type).integer().not_null())
                    .col(&mut created_col(RepoUnit::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_repo_unit_repo_type")
                    .table(RepoUnit::Table)
                    .col(RepoUnit::RepoId)
                    .col(RepoUnit::Type)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Watch::Table)
                    .if_not_exists()
                    .col(&mut id_col(Watch::Id))
                    .col(&mut ref_col(Watch::UserId))
                    .col(&mut ref_col(Watch::RepoId))
                    .col(ColumnDef::new(Watch::Mode).integer().not_null().default(1))
                    .col(&mut created_col(Watch::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uqe_watch_watch")
                    .table(Watch::Table)
                    .col(Watch::UserId)
                    .col(Watch::RepoId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Star::Table)
                    .if_not_exists()
                    .col(&mut id_col(Star::Id))
                    .col(&mut ref_col(Star::Uid))
                    .col(&mut ref_col(Star::RepoId))
                    .col(&mut created_col(Star::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uqe_star_s")
                    .table(Star::Table)
                    .col(Star::Uid)
                    .col(Star::RepoId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Collaboration::Table)
                    .if_not_exists()
                    .col(&mut id_col(Collaboration::Id))
                    .col(&mut ref_col(Collaboration::RepoId))
                    .col(&mut ref_col(Collaboration::UserId))
                    .col(
                        ColumnDef::new(Collaboration::Mode)
                            .integer()
                            .not_null()
                            .default(2),
                    )
                    .col(&mut created_col(Collaboration::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Access::Table)
                    .if_not_exists()
                    .col(&mut id_col(Access::Id))
                    .col(&mut ref_col(Access::UserId))
                    .col(&mut ref_col(Access::RepoId))
                    .col(ColumnDef::new(Access::Mode).integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Team::Table)
                    .if_not_exists()
                    .col(&mut id_col(Team::Id))
                    .col(&mut ref_col(Team::OrgId))
                    .col(ColumnDef::new(Team::LowerName).string().not_null())
                    .col(ColumnDef::new(Team::Name).string().not_null())
                    .col(ColumnDef::new(Team::Authorize).integer().not_null().default(1))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TeamUser::Table)
                    .if_not_exists()
                    .col(&mut id_col(TeamUser::Id))
                    .col(&mut ref_col(TeamUser::OrgId))
                    .col(&mut ref_col(TeamUser::TeamId))
                    .col(&mut ref_col(TeamUser::Uid))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uqe_team_user_s")
                    .table(TeamUser::Table)
                    .col(TeamUser::TeamId)
                    .col(TeamUser::Uid)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Shared-organization lookups go through uid and org_id.
        manager
            .create_index(
                Index::create()
                    .name("idx_team_user_uid_org")
                    .table(TeamUser::Table)
                    .col(TeamUser::Uid)
                    .col(TeamUser::OrgId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TeamRepo::Table)
                    .if_not_exists()
                    .col(&mut id_col(TeamRepo::Id))
                    .col(&mut ref_col(TeamRepo::OrgId))
                    .col(&mut ref_col(TeamRepo::TeamId))
                    .col(&mut ref_col(TeamRepo::RepoId))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uqe_team_repo_s")
                    .table(TeamRepo::Table)
                    .col(TeamRepo::TeamId)
                    .col(TeamRepo::RepoId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Action::Table)
                    .if_not_exists()
                    .col(&mut id_col(Action::Id))
                    .col(&mut ref_col(Action::UserId))
                    .col(ColumnDef::new(Action::OpType).integer().not_null())
                    .col(&mut ref_col(Action::ActUserId))
                    .col(&mut ref_col(Action::RepoId))
                    .col(&mut created_col(Action::CreatedAt))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Action::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TeamRepo::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TeamUser::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Team::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Access::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Collaboration::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Star::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Watch::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RepoUnit::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Repository::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Repository {
    Table,
    Id,
    OwnerId,
    LowerName,
    Name,
    IsPrivate,
    IsArchived,
    NumWatches,
    NumStars,
    OriginalServiceType,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum RepoUnit {
    Table,
    Id,
    RepoId,
    Type,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Watch {
    Table,
    Id,
    UserId,
    RepoId,
    Mode,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Star {
    Table,
    Id,
    Uid,
    RepoId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Collaboration {
    Table,
    Id,
    RepoId,
    UserId,
    Mode,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Access {
    Table,
    Id,
    UserId,
    RepoId,
    Mode,
}

#[derive(DeriveIden)]
enum Team {
    Table,
    Id,
    OrgId,
    LowerName,
    Name,
    Authorize,
}

#[derive(DeriveIden)]
enum TeamUser {
    Table,
    Id,
    OrgId,
    TeamId,
    Uid,
}

#[derive(DeriveIden)]
enum TeamRepo {
    Table,
    Id,
    OrgId,
    TeamId,
    RepoId,
}

#[derive(DeriveIden)]
enum Action {
    Table,
    Id,
    UserId,
    OpType,
    ActUserId,
    RepoId,
    CreatedAt,
}
