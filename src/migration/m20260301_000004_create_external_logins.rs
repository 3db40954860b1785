//! Migration: Create login_source and external_login_user tables.
//!
//! The composite primary key on external_login_user is the backstop that keeps two
//! concurrent link attempts for the same identity from both succeeding.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(LoginSource::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LoginSource::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LoginSource::Type).integer().not_null())
                    .col(ColumnDef::new(LoginSource::Name).string().not_null())
                    .col(
                        ColumnDef::new(LoginSource::IsActive)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uqe_login_source_name")
                    .table(LoginSource::Table)
                    .col(LoginSource::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ExternalLoginUser::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ExternalLoginUser::ExternalId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ExternalLoginUser::LoginSourceId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ExternalLoginUser::UserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ExternalLoginUser::RawData).json())
                    .col(ColumnDef::new(ExternalLoginUser::Provider).string_len(25).not_null())
                    .col(ColumnDef::new(ExternalLoginUser::Email).string().not_null().default(""))
                    .col(ColumnDef::new(ExternalLoginUser::Name).string().not_null().default(""))
                    .col(
                        ColumnDef::new(ExternalLoginUser::FirstName)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(ExternalLoginUser::LastName)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(ExternalLoginUser::NickName)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(ExternalLoginUser::Description)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(ExternalLoginUser::AvatarUrl)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(ExternalLoginUser::Location)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(ExternalLoginUser::AccessToken)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(ExternalLoginUser::AccessTokenSecret)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(ExternalLoginUser::RefreshToken)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(ExternalLoginUser::ExpiresAt).timestamp_with_time_zone())
                    .primary_key(
                        Index::create()
                            .col(ExternalLoginUser::ExternalId)
                            .col(ExternalLoginUser::LoginSourceId),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_external_login_user_user_id")
                    .table(ExternalLoginUser::Table)
                    .col(ExternalLoginUser::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_external_login_user_provider")
                    .table(ExternalLoginUser::Table)
                    .col(ExternalLoginUser::Provider)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ExternalLoginUser::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LoginSource::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum LoginSource {
    Table,
    Id,
    Type,
    Name,
    IsActive,
}

#[derive(DeriveIden)]
enum ExternalLoginUser {
    Table,
    ExternalId,
    LoginSourceId,
    UserId,
    RawData,
    Provider,
    Email,
    Name,
    FirstName,
    LastName,
    NickName,
    Description,
    AvatarUrl,
    Location,
    AccessToken,
    AccessTokenSecret,
    RefreshToken,
    ExpiresAt,
}
