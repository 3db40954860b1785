//! Repository id filters (owned, organization, and their union) and organization membership.

use forge_accounts::db::{repositories, users};
use forge_accounts::models::{ListOptions, UnitType, WatchMode};
use forge_accounts::services::accessible_repo_ids;
use sea_orm::*;

use super::helpers::*;

#[tokio::test]
async fn test_union_of_owned_and_team_granted_repos() {
    let pool = create_test_pool().await;
    let db = pool.connection();

    let dev = create_user(db, "dev").await;
    let org = create_org(db, "acme").await;
    let team = create_team(db, &org, "backend").await;
    add_team_member(db, &team, &dev).await;

    let own = create_repo(db, &dev, "dotfiles", false).await;
    let granted = create_repo(db, &org, "api", true).await;
    let hidden = create_repo(db, &org, "payroll", true).await;
    let grant = grant_team_repo(db, &team, &granted).await;

    let ids = accessible_repo_ids(db, &dev, &[], false).await.unwrap();
    assert_eq!(ids, vec![own.id, granted.id]);
    assert!(!ids.contains(&hidden.id));

    grant.delete(db).await.unwrap();

    let ids = accessible_repo_ids(db, &dev, &[], false).await.unwrap();
    assert_eq!(ids, vec![own.id]);
}

#[tokio::test]
async fn test_public_org_repos_need_no_grant() {
    let pool = create_test_pool().await;
    let db = pool.connection();

    let dev = create_user(db, "dev").await;
    let org = create_org(db, "acme").await;
    let team = create_team(db, &org, "support").await;
    add_team_member(db, &team, &dev).await;
    let public = create_repo(db, &org, "website", false).await;

    let other_org = create_org(db, "globex").await;
    create_repo(db, &other_org, "unrelated", false).await;

    let ids = repositories::org_repo_ids(db, &dev, &[], false).await.unwrap();
    assert_eq!(ids, vec![public.id]);
}

#[tokio::test]
async fn test_restricted_member_only_reaches_public_org_repos() {
    let pool = create_test_pool().await;
    let db = pool.connection();

    let contractor = create_user(db, "contractor").await;
    let contractor = set_flags(db, &contractor, false, true).await;
    let org = create_org(db, "acme").await;
    let team = create_team(db, &org, "vendors").await;
    add_team_member(db, &team, &contractor).await;

    let public = create_repo(db, &org, "sdk", false).await;
    let private = create_repo(db, &org, "internal", true).await;
    grant_team_repo(db, &team, &private).await;

    let ids = accessible_repo_ids(db, &contractor, &[], false).await.unwrap();
    assert_eq!(ids, vec![public.id]);
}

#[tokio::test]
async fn test_owned_and_org_repo_is_reported_once() {
    let pool = create_test_pool().await;
    let db = pool.connection();

    // An organization's own repositories come back from both queries for its members.
    let org = create_org(db, "acme").await;
    let team = create_team(db, &org, "owners").await;
    add_team_member(db, &team, &org).await;
    let repo = create_repo(db, &org, "shared", false).await;

    let ids = accessible_repo_ids(db, &org, &[], false).await.unwrap();
    assert_eq!(ids, vec![repo.id]);
}

#[tokio::test]
async fn test_unit_and_archive_filters() {
    let pool = create_test_pool().await;
    let db = pool.connection();

    let dev = create_user(db, "dev").await;
    let with_issues = create_repo(db, &dev, "tracker", false).await;
    let code_only = create_repo(db, &dev, "library", false).await;
    let archived = create_repo(db, &dev, "legacy", false).await;

    enable_unit(db, &with_issues, UnitType::Issues).await;
    enable_unit(db, &code_only, UnitType::Code).await;
    enable_unit(db, &archived, UnitType::Issues).await;
    archive_repo(db, &archived).await;

    let ids = repositories::owned_repo_ids(db, &dev, &[UnitType::Issues], false)
        .await
        .unwrap();
    assert_eq!(ids, vec![with_issues.id, archived.id]);

    let ids = repositories::owned_repo_ids(db, &dev, &[UnitType::Issues], true)
        .await
        .unwrap();
    assert_eq!(ids, vec![with_issues.id]);

    let ids = repositories::owned_repo_ids(db, &dev, &[], true).await.unwrap();
    assert_eq!(ids, vec![with_issues.id, code_only.id]);
}

#[tokio::test]
async fn test_starred_and_watched_listings() {
    let pool = create_test_pool().await;
    let db = pool.connection();

    let fan = create_user(db, "fan").await;
    let owner = create_user(db, "owner").await;
    let a = create_repo(db, &owner, "a", false).await;
    let b = create_repo(db, &owner, "b", true).await;
    let c = create_repo(db, &owner, "c", false).await;

    for repo in [&a, &b, &c] {
        star(db, &fan, repo).await;
    }
    watch(db, &fan, &a, WatchMode::Normal).await;
    watch(db, &fan, &b, WatchMode::Auto).await;
    watch(db, &fan, &c, WatchMode::Dont).await;

    let all = repositories::starred_repos(db, fan.id, true, ListOptions::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 3);

    let public = repositories::starred_repos(db, fan.id, false, ListOptions::default())
        .await
        .unwrap();
    assert_eq!(public.iter().map(|r| r.id).collect::<Vec<_>>(), vec![a.id, c.id]);

    let page = repositories::starred_repos(db, fan.id, true, ListOptions::page(2, 2))
        .await
        .unwrap();
    assert_eq!(page.iter().map(|r| r.id).collect::<Vec<_>>(), vec![c.id]);

    let (watched, total) = repositories::watched_repos(db, fan.id, true, ListOptions::page(1, 1))
        .await
        .unwrap();
    assert_eq!(total, 2);
    assert_eq!(watched.iter().map(|r| r.id).collect::<Vec<_>>(), vec![a.id]);
}

#[tokio::test]
async fn test_organization_count_counts_each_org_once() {
    let pool = create_test_pool().await;
    let db = pool.connection();

    let dev = create_user(db, "dev").await;
    let loner = create_user(db, "loner").await;
    let acme = create_org(db, "acme").await;
    let initech = create_org(db, "initech").await;

    let backend = create_team(db, &acme, "backend").await;
    let oncall = create_team(db, &acme, "oncall").await;
    let printers = create_team(db, &initech, "printers").await;
    add_team_member(db, &backend, &dev).await;
    add_team_member(db, &oncall, &dev).await;
    add_team_member(db, &printers, &dev).await;

    assert_eq!(users::organization_count(db, dev.id).await.unwrap(), 2);
    assert_eq!(users::organization_count(db, loner.id).await.unwrap(), 0);
}
