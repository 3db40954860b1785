//! Migration: Create user and user-owned tables.
//!
//! Keys, emails, settings, follows and tokens all reference `user.id` without a
//! database-level foreign key; account deletion purges them explicitly.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(User::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(User::LowerName).string().not_null())
                    .col(ColumnDef::new(User::Name).string().not_null())
                    .col(ColumnDef::new(User::Email).string().not_null().default(""))
                    .col(ColumnDef::new(User::Type).integer().not_null().default(0))
                    .col(ColumnDef::new(User::Visibility).integer().not_null().default(0))
                    .col(ColumnDef::new(User::IsAdmin).boolean().not_null().default(false))
                    .col(
                        ColumnDef::new(User::IsRestricted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(User::NumFollowers).integer().not_null().default(0))
                    .col(ColumnDef::new(User::NumFollowing).integer().not_null().default(0))
                    .col(ColumnDef::new(User::NumStars).integer().not_null().default(0))
                    .col(ColumnDef::new(User::NumRepos).integer().not_null().default(0))
                    .col(
                        ColumnDef::new(User::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(User::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_user_lower_name")
                    .table(User::Table)
                    .col(User::LowerName)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Follow::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Follow::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Follow::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Follow::FollowId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Follow::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // One follow per pair; keeps follower counters exact.
        manager
            .create_index(
                Index::create()
                    .name("uqe_follow_follow")
                    .table(Follow::Table)
                    .col(Follow::UserId)
                    .col(Follow::FollowId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_follow_follow_id")
                    .table(Follow::Table)
                    .col(Follow::FollowId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(EmailAddress::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EmailAddress::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(EmailAddress::Uid).big_integer().not_null())
                    .col(ColumnDef::new(EmailAddress::Email).string().not_null())
                    .col(ColumnDef::new(EmailAddress::LowerEmail).string().not_null())
                    .col(
                        ColumnDef::new(EmailAddress::IsActivated)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(EmailAddress::IsPrimary)
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
                    .name("uqe_email_address_lower_email")
                    .table(EmailAddress::Table)
                    .col(EmailAddress::LowerEmail)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UserOpenId::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserOpenId::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UserOpenId::Uid).big_integer().not_null())
                    .col(ColumnDef::new(UserOpenId::Uri).string().not_null())
                    .col(ColumnDef::new(UserOpenId::Show).boolean().not_null().default(false))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UserSetting::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserSetting::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UserSetting::UserId).big_integer().not_null())
                    .col(ColumnDef::new(UserSetting::SettingKey).string().not_null())
                    .col(ColumnDef::new(UserSetting::SettingValue).text().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AccessToken::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AccessToken::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AccessToken::Uid).big_integer().not_null())
                    .col(ColumnDef::new(AccessToken::Name).string().not_null())
                    .col(ColumnDef::new(AccessToken::TokenHash).string().not_null())
                    .col(
                        ColumnDef::new(AccessToken::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_access_token_uid")
                    .table(AccessToken::Table)
                    .col(AccessToken::Uid)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PublicKey::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PublicKey::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PublicKey::OwnerId).big_integer().not_null())
                    .col(ColumnDef::new(PublicKey::Name).string().not_null())
                    .col(ColumnDef::new(PublicKey::Fingerprint).string().not_null())
                    .col(ColumnDef::new(PublicKey::Content).text().not_null())
                    .col(
                        ColumnDef::new(PublicKey::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(GpgKey::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GpgKey::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(GpgKey::OwnerId).big_integer().not_null())
                    .col(ColumnDef::new(GpgKey::KeyId).string_len(16).not_null())
                    .col(
                        ColumnDef::new(GpgKey::PrimaryKeyId)
                            .string_len(16)
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(GpgKey::Content).text().not_null())
                    .col(
                        ColumnDef::new(GpgKey::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(GpgKeyImport::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GpgKeyImport::KeyId)
                            .string_len(16)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(GpgKeyImport::Content).text().not_null())
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GpgKeyImport::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GpgKey::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PublicKey::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AccessToken::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UserSetting::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UserOpenId::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(EmailAddress::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Follow::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(User::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum User {
    Table,
    Id,
    LowerName,
    Name,
    Email,
    Type,
    Visibility,
    IsAdmin,
    IsRestricted,
    NumFollowers,
    NumFollowing,
    NumStars,
    NumRepos,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Follow {
    Table,
    Id,
    UserId,
    FollowId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum EmailAddress {
    Table,
    Id,
    Uid,
    Email,
    LowerEmail,
    IsActivated,
    IsPrimary,
}

#[derive(DeriveIden)]
enum UserOpenId {
    Table,
    Id,
    Uid,
    Uri,
    Show,
}

#[derive(DeriveIden)]
enum UserSetting {
    Table,
    Id,
    UserId,
    SettingKey,
    SettingValue,
}

#[derive(DeriveIden)]
enum AccessToken {
    Table,
    Id,
    Uid,
    Name,
    TokenHash,
    CreatedAt,
}

#[derive(DeriveIden)]
enum PublicKey {
    Table,
    Id,
    OwnerId,
    Name,
    Fingerprint,
    Content,
    CreatedAt,
}

#[derive(DeriveIden)]
enum GpgKey {
    Table,
    Id,
    OwnerId,
    KeyId,
    PrimaryKeyId,
    Content,
    CreatedAt,
}

#[derive(DeriveIden)]
enum GpgKeyImport {
    Table,
    KeyId,
    Content,
}
