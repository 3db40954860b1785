//! Account deletion: dependent purge, counter corrections, content window, rollback.

use std::time::Duration;

use chrono::Utc;
use forge_accounts::config::DeletionSettings;
use forge_accounts::entity::{
    access, access_token, action, collaboration, comment, email_address, external_login_user,
    follow, gpg_key, gpg_key_import, issue, issue_assignees, issue_user, public_key, reaction,
    repository, star, stopwatch, team, team_user, user, user_open_id, user_setting, watch,
};
use forge_accounts::error::AppError;
use forge_accounts::models::WatchMode;
use forge_accounts::services::{account_links, delete_user};
use sea_orm::*;
use tokio_util::sync::CancellationToken;

use super::helpers::*;

const THIRTY_DAYS: Duration = Duration::from_secs(30 * 24 * 60 * 60);

fn no_content_purge() -> DeletionSettings {
    DeletionSettings::default()
}

fn thirty_day_window() -> DeletionSettings {
    DeletionSettings {
        delete_with_comments_max_age: THIRTY_DAYS,
    }
}

/// One row per dependent table that references `owner`.
async fn seed_dependents(
    db: &DatabaseConnection,
    owner: &user::Model,
    repo: &repository::Model,
    issue: &issue::Model,
    team: &team::Model,
    source_id: i64,
) {
    let now = Utc::now();
    let tag = owner.lower_name.clone();

    access_token::ActiveModel {
        uid: Set(owner.id),
        name: Set(format!("{}-token", tag)),
        token_hash: Set(format!("hash-{}", tag)),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap();

    collaboration::ActiveModel {
        repo_id: Set(repo.id),
        user_id: Set(owner.id),
        mode: Set(2),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap();

    access::ActiveModel {
        user_id: Set(owner.id),
        repo_id: Set(repo.id),
        mode: Set(2),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap();

    action::ActiveModel {
        user_id: Set(owner.id),
        op_type: Set(1),
        act_user_id: Set(owner.id),
        repo_id: Set(repo.id),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap();

    issue_user::ActiveModel {
        uid: Set(owner.id),
        issue_id: Set(issue.id),
        is_read: Set(false),
        is_mentioned: Set(true),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap();

    email_address::ActiveModel {
        uid: Set(owner.id),
        email: Set(format!("{}@mail.example.com", tag)),
        lower_email: Set(format!("{}@mail.example.com", tag)),
        is_activated: Set(true),
        is_primary: Set(true),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap();

    user_open_id::ActiveModel {
        uid: Set(owner.id),
        uri: Set(format!("https://openid.example.com/{}", tag)),
        show: Set(false),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap();

    create_reaction(db, issue, 0, owner, "+1").await;
    add_team_member(db, team, owner).await;

    stopwatch::ActiveModel {
        issue_id: Set(issue.id),
        user_id: Set(owner.id),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap();

    user_setting::ActiveModel {
        user_id: Set(owner.id),
        setting_key: Set("theme".to_string()),
        setting_value: Set("dark".to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap();

    public_key::ActiveModel {
        owner_id: Set(owner.id),
        name: Set(format!("{}-laptop", tag)),
        fingerprint: Set(format!("SHA256:{}", tag)),
        content: Set("ssh-ed25519 AAAA".to_string()),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap();

    let key_id = format!("KEY{}", owner.id);
    gpg_key::ActiveModel {
        owner_id: Set(owner.id),
        key_id: Set(key_id.clone()),
        primary_key_id: Set(String::new()),
        content: Set("-----BEGIN PGP PUBLIC KEY BLOCK-----".to_string()),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap();
    gpg_key_import::Entity::insert(gpg_key_import::ActiveModel {
        key_id: Set(key_id),
        content: Set("armored".to_string()),
    })
    .exec_without_returning(db)
    .await
    .unwrap();

    issue_assignees::ActiveModel {
        assignee_id: Set(owner.id),
        issue_id: Set(issue.id),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap();

    let link = external_login_user::Model {
        external_id: format!("ext-{}", owner.id),
        login_source_id: source_id,
        user_id: owner.id,
        raw_data: None,
        provider: "github".to_string(),
        email: String::new(),
        name: String::new(),
        first_name: String::new(),
        last_name: String::new(),
        nick_name: String::new(),
        description: String::new(),
        avatar_url: String::new(),
        location: String::new(),
        access_token: String::new(),
        access_token_secret: String::new(),
        refresh_token: String::new(),
        expires_at: None,
    };
    account_links::link_external_to_user(db, owner, link)
        .await
        .unwrap();
}

/// Rows still referencing `uid`, per table.
async fn remaining_rows(db: &DatabaseConnection, uid: i64) -> Vec<(&'static str, u64)> {
    let gpg_key_ids: Vec<String> = gpg_key::Entity::find()
        .select_only()
        .column(gpg_key::Column::KeyId)
        .filter(gpg_key::Column::OwnerId.eq(uid))
        .into_tuple()
        .all(db)
        .await
        .unwrap();
    let key_id = format!("KEY{}", uid);

    vec![
        ("access_token", access_token::Entity::find().filter(access_token::Column::Uid.eq(uid)).count(db).await.unwrap()),
        ("collaboration", collaboration::Entity::find().filter(collaboration::Column::UserId.eq(uid)).count(db).await.unwrap()),
        ("access", access::Entity::find().filter(access::Column::UserId.eq(uid)).count(db).await.unwrap()),
        ("watch", watch::Entity::find().filter(watch::Column::UserId.eq(uid)).count(db).await.unwrap()),
        ("star", star::Entity::find().filter(star::Column::Uid.eq(uid)).count(db).await.unwrap()),
        (
            "follow",
            follow::Entity::find()
                .filter(
                    Condition::any()
                        .add(follow::Column::UserId.eq(uid))
                        .add(follow::Column::FollowId.eq(uid)),
                )
                .count(db)
                .await
                .unwrap(),
        ),
        ("action", action::Entity::find().filter(action::Column::UserId.eq(uid)).count(db).await.unwrap()),
        ("issue_user", issue_user::Entity::find().filter(issue_user::Column::Uid.eq(uid)).count(db).await.unwrap()),
        ("email_address", email_address::Entity::find().filter(email_address::Column::Uid.eq(uid)).count(db).await.unwrap()),
        ("user_open_id", user_open_id::Entity::find().filter(user_open_id::Column::Uid.eq(uid)).count(db).await.unwrap()),
        ("reaction", reaction::Entity::find().filter(reaction::Column::UserId.eq(uid)).count(db).await.unwrap()),
        ("team_user", team_user::Entity::find().filter(team_user::Column::Uid.eq(uid)).count(db).await.unwrap()),
        ("stopwatch", stopwatch::Entity::find().filter(stopwatch::Column::UserId.eq(uid)).count(db).await.unwrap()),
        ("user_setting", user_setting::Entity::find().filter(user_setting::Column::UserId.eq(uid)).count(db).await.unwrap()),
        ("public_key", public_key::Entity::find().filter(public_key::Column::OwnerId.eq(uid)).count(db).await.unwrap()),
        ("gpg_key", gpg_key_ids.len() as u64),
        ("gpg_key_import", gpg_key_import::Entity::find().filter(gpg_key_import::Column::KeyId.eq(key_id)).count(db).await.unwrap()),
        ("issue_assignees", issue_assignees::Entity::find().filter(issue_assignees::Column::AssigneeId.eq(uid)).count(db).await.unwrap()),
        ("external_login_user", external_login_user::Entity::find().filter(external_login_user::Column::UserId.eq(uid)).count(db).await.unwrap()),
    ]
}

#[tokio::test]
async fn test_delete_user_removes_every_dependent_row() {
    let pool = create_test_pool().await;
    let db = pool.connection();

    let victim = create_user(db, "victim").await;
    let bystander = create_user(db, "bystander").await;
    let org = create_org(db, "acme").await;
    let team = create_team(db, &org, "owners").await;
    let repo = create_repo(db, &org, "widgets", false).await;
    let issue = create_issue(db, &repo, &bystander, "Broken widget").await;
    let source = create_login_source(db, "github", true).await;

    for who in [&victim, &bystander] {
        seed_dependents(db, who, &repo, &issue, &team, source.id).await;
        star(db, who, &repo).await;
        watch(db, who, &repo, WatchMode::Normal).await;
    }
    follow(db, &victim, &bystander).await;
    follow(db, &bystander, &victim).await;

    let report = delete_user(&pool, &victim, &no_content_purge(), &CancellationToken::new())
        .await
        .expect("Deletion should succeed");

    assert_eq!(report.user_id, victim.id);
    assert!(!report.content_purged);
    assert!(reload_user(db, victim.id).await.is_none());

    for (table, rows) in remaining_rows(db, victim.id).await {
        assert_eq!(rows, 0, "{} still references the deleted user", table);
    }

    // The bystander keeps everything except the follows that involved the victim.
    for (table, rows) in remaining_rows(db, bystander.id).await {
        if table == "follow" {
            assert_eq!(rows, 0);
        } else {
            assert!(rows > 0, "{} lost rows of an unrelated user", table);
        }
    }

    let purged_tables: Vec<_> = report.purged.iter().map(|(t, _)| *t).collect();
    assert!(purged_tables.contains(&"gpg_key_import"));
    assert!(purged_tables.contains(&"external_login_user"));
}

#[tokio::test]
async fn test_delete_user_decrements_repo_counters() {
    let pool = create_test_pool().await;
    let db = pool.connection();

    let victim = create_user(db, "victim").await;
    let other = create_user(db, "other").await;
    let starred = create_repo(db, &other, "starred", false).await;
    let watched = create_repo(db, &other, "watched", false).await;
    let ignored = create_repo(db, &other, "ignored", false).await;

    star(db, &victim, &starred).await;
    star(db, &other, &starred).await;
    watch(db, &victim, &watched, WatchMode::Normal).await;
    watch(db, &other, &watched, WatchMode::Auto).await;
    watch(db, &victim, &ignored, WatchMode::Dont).await;
    watch(db, &other, &ignored, WatchMode::Normal).await;

    let before = reload_repo(db, watched.id).await.updated_at;

    delete_user(&pool, &victim, &no_content_purge(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(reload_repo(db, starred.id).await.num_stars, 1);
    assert_eq!(reload_repo(db, watched.id).await.num_watches, 1);
    // "Don't watch" never counted, so it must not be subtracted.
    assert_eq!(reload_repo(db, ignored.id).await.num_watches, 1);
    assert_eq!(reload_repo(db, watched.id).await.updated_at, before);
}

#[tokio::test]
async fn test_delete_user_keeps_follow_counters_symmetric() {
    let pool = create_test_pool().await;
    let db = pool.connection();

    let victim = create_user(db, "victim").await;
    let fan = create_user(db, "fan").await;
    let idol = create_user(db, "idol").await;

    follow(db, &fan, &victim).await;
    follow(db, &victim, &idol).await;
    follow(db, &fan, &idol).await;

    delete_user(&pool, &victim, &no_content_purge(), &CancellationToken::new())
        .await
        .unwrap();

    let fan = reload_user(db, fan.id).await.unwrap();
    let idol = reload_user(db, idol.id).await.unwrap();
    assert_eq!(fan.num_following, 1);
    assert_eq!(idol.num_followers, 1);

    let follows = follow::Entity::find().count(db).await.unwrap();
    assert_eq!(follows, 1);
}

#[tokio::test]
async fn test_delete_user_with_more_followers_than_bind_parameters() {
    let pool = create_test_pool().await;
    let db = pool.connection();

    let victim = create_user(db, "celebrity").await;
    let fan = create_user(db, "fan").await;
    follow(db, &fan, &victim).await;

    // SQLite binds at most 32766 parameters per statement.
    let now = Utc::now();
    let rows: Vec<follow::ActiveModel> = (0..40_000i64)
        .map(|i| follow::ActiveModel {
            user_id: Set(1_000_000 + i),
            follow_id: Set(victim.id),
            created_at: Set(now),
            ..Default::default()
        })
        .collect();
    for chunk in rows.chunks(5_000) {
        follow::Entity::insert_many(chunk.to_vec())
            .exec_without_returning(db)
            .await
            .unwrap();
    }

    let report = delete_user(&pool, &victim, &no_content_purge(), &CancellationToken::new())
        .await
        .unwrap();
    assert!(report.counters.contains(&("user.num_following", 1)));

    assert_eq!(reload_user(db, fan.id).await.unwrap().num_following, 0);
    assert_eq!(follow::Entity::find().count(db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_counters_never_go_negative() {
    let pool = create_test_pool().await;
    let db = pool.connection();

    let victim = create_user(db, "victim").await;
    let owner = create_user(db, "owner").await;
    let repo = create_repo(db, &owner, "drifted", false).await;
    star(db, &victim, &repo).await;

    // Simulate a counter that already drifted to zero.
    let mut active: repository::ActiveModel = reload_repo(db, repo.id).await.into();
    active.num_stars = Set(0);
    active.update(db).await.unwrap();

    delete_user(&pool, &victim, &no_content_purge(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(reload_repo(db, repo.id).await.num_stars, 0);
}

#[tokio::test]
async fn test_young_account_loses_comments_and_reactions() {
    let pool = create_test_pool().await;
    let db = pool.connection();

    let spammer = create_user_created_at(db, "spammer", days_ago(10)).await;
    let maintainer = create_user(db, "maintainer").await;
    let repo = create_repo(db, &maintainer, "project", false).await;
    let issue = create_issue(db, &repo, &maintainer, "Roadmap").await;

    let kept = create_comment(db, &issue, &maintainer, "Thanks for the report").await;
    // More than one batch worth of comments.
    let mut spam = Vec::new();
    for i in 0..120 {
        spam.push(create_comment(db, &issue, &spammer, &format!("spam {}", i)).await);
    }
    create_reaction(db, &issue, spam[0].id, &maintainer, "-1").await;
    create_reaction(db, &issue, kept.id, &spammer, "heart").await;
    create_reaction(db, &issue, kept.id, &maintainer, "+1").await;

    let report = delete_user(&pool, &spammer, &thirty_day_window(), &CancellationToken::new())
        .await
        .unwrap();

    assert!(report.content_purged);
    assert_eq!(report.comments_deleted, 120);

    let remaining: Vec<i64> = comment::Entity::find()
        .all(db)
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.id)
        .collect();
    assert_eq!(remaining, vec![kept.id]);
    assert_eq!(reload_issue(db, issue.id).await.num_comments, 1);

    // Reactions on the deleted comments go with them; the spammer's own reactions too.
    let reactions = reaction::Entity::find().all(db).await.unwrap();
    assert_eq!(reactions.len(), 1);
    assert_eq!(reactions[0].user_id, maintainer.id);
    assert_eq!(reactions[0].comment_id, kept.id);
}

#[tokio::test]
async fn test_old_account_keeps_comments() {
    let pool = create_test_pool().await;
    let db = pool.connection();

    let veteran = create_user_created_at(db, "veteran", days_ago(40)).await;
    let maintainer = create_user(db, "maintainer").await;
    let repo = create_repo(db, &maintainer, "project", false).await;
    let issue = create_issue(db, &repo, &maintainer, "Roadmap").await;
    create_comment(db, &issue, &veteran, "Long-standing advice").await;

    let report = delete_user(&pool, &veteran, &thirty_day_window(), &CancellationToken::new())
        .await
        .unwrap();

    assert!(!report.content_purged);
    assert_eq!(report.comments_deleted, 0);
    assert_eq!(comment::Entity::find().count(db).await.unwrap(), 1);
    assert_eq!(reload_issue(db, issue.id).await.num_comments, 1);
}

#[tokio::test]
async fn test_disabled_window_keeps_comments_of_new_accounts() {
    let pool = create_test_pool().await;
    let db = pool.connection();

    let newcomer = create_user_created_at(db, "newcomer", days_ago(1)).await;
    let repo = create_repo(db, &newcomer, "first", false).await;
    let issue = create_issue(db, &repo, &newcomer, "Hello").await;
    create_comment(db, &issue, &newcomer, "First!").await;

    delete_user(&pool, &newcomer, &no_content_purge(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(comment::Entity::find().count(db).await.unwrap(), 1);
}

#[tokio::test]
async fn test_cancelled_deletion_changes_nothing() {
    let pool = create_test_pool().await;
    let db = pool.connection();

    let victim = create_user(db, "victim").await;
    let owner = create_user(db, "owner").await;
    let repo = create_repo(db, &owner, "kept", false).await;
    star(db, &victim, &repo).await;

    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = delete_user(&pool, &victim, &no_content_purge(), &cancel)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Cancelled(_)));

    assert!(reload_user(db, victim.id).await.is_some());
    assert_eq!(reload_repo(db, repo.id).await.num_stars, 1);
    assert_eq!(star::Entity::find().count(db).await.unwrap(), 1);
}

#[tokio::test]
async fn test_deleting_missing_user_rolls_back() {
    let pool = create_test_pool().await;
    let db = pool.connection();

    let victim = create_user(db, "victim").await;
    delete_user(&pool, &victim, &no_content_purge(), &CancellationToken::new())
        .await
        .unwrap();

    // Stale model: the row is gone, so the second attempt must fail and leave no trace.
    let owner = create_user(db, "owner").await;
    let repo = create_repo(db, &owner, "repo", false).await;
    star::ActiveModel {
        uid: Set(victim.id),
        repo_id: Set(repo.id),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap();

    let err = delete_user(&pool, &victim, &no_content_purge(), &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(star::Entity::find().count(db).await.unwrap(), 1);
}
