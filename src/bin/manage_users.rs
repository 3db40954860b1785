//! CLI tool to manage user accounts.
//!
//! Usage:
//!   cargo run --bin manage-users -- delete --id <user-id>
//!   cargo run --bin manage-users -- links --id <user-id>
//!   cargo run --bin manage-users -- unlink --id <user-id> --source <login-source-id>
//!   cargo run --bin manage-users -- repos --id <user-id> [--active]
//!   cargo run --bin manage-users -- orgs --id <user-id>
//!   cargo run --bin manage-users -- visible --id <user-id> --viewer <viewer-id>
//!   cargo run --bin manage-users -- reattribute --service github --external-id <id> --id <user-id>

use std::env;

use tokio_util::sync::CancellationToken;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use forge_accounts::config::Config;
use forge_accounts::db::{users, DbPool};
use forge_accounts::entity::user;
use forge_accounts::models::GitServiceType;
use forge_accounts::services::{account_links, delete_user, is_user_visible_to_viewer, repo_access};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    let command = &args[1];
    if matches!(command.as_str(), "help" | "--help" | "-h") {
        print_usage();
        return;
    }

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }
    };

    let pool = match DbPool::new(&config).await {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error connecting to database: {}", e);
            std::process::exit(1);
        }
    };

    match command.as_str() {
        "delete" => {
            let target = load_user(&pool, parse_i64_arg(&args, "--id")).await;
            delete_account(&pool, &config, &target).await;
        }
        "links" => {
            let owner = load_user(&pool, parse_i64_arg(&args, "--id")).await;
            list_links(&pool, &owner).await;
        }
        "unlink" => {
            let owner = load_user(&pool, parse_i64_arg(&args, "--id")).await;
            let source = parse_i64_arg(&args, "--source");
            unlink(&pool, &owner, source).await;
        }
        "repos" => {
            let member = load_user(&pool, parse_i64_arg(&args, "--id")).await;
            let active_only = has_flag(&args, "--active");
            list_repos(&pool, &member, active_only).await;
        }
        "orgs" => {
            let member = load_user(&pool, parse_i64_arg(&args, "--id")).await;
            match users::organization_count(pool.connection(), member.id).await {
                Ok(count) => println!("User {} belongs to {} organizations.", member.id, count),
                Err(e) => {
                    eprintln!("Error counting organizations: {}", e);
                    std::process::exit(1);
                }
            }
        }
        "visible" => {
            let subject = load_user(&pool, parse_i64_arg(&args, "--id")).await;
            let viewer = load_user(&pool, parse_i64_arg(&args, "--viewer")).await;
            let visible = is_user_visible_to_viewer(pool.connection(), &subject, Some(&viewer)).await;
            println!(
                "User {} is {} to user {}.",
                subject.id,
                if visible { "visible" } else { "not visible" },
                viewer.id
            );
        }
        "reattribute" => {
            let service = parse_arg(&args, "--service");
            let Some(service_type) = GitServiceType::parse(&service) else {
                eprintln!("Error: unknown service '{}'", service);
                std::process::exit(1);
            };
            let external_id = parse_arg(&args, "--external-id");
            let local = load_user(&pool, parse_i64_arg(&args, "--id")).await;
            reattribute(&pool, service_type, &external_id, &local).await;
        }
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            std::process::exit(1);
        }
    }
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args[2..].iter().any(|a| a == flag)
}

fn parse_arg(args: &[String], flag: &str) -> String {
    let mut i = 2;
    while i < args.len() {
        if args[i] == flag && i + 1 < args.len() {
            return args[i + 1].clone();
        }
        i += 1;
    }
    eprintln!("Error: {} is required", flag);
    std::process::exit(1);
}

fn parse_i64_arg(args: &[String], flag: &str) -> i64 {
    let value = parse_arg(args, flag);
    match value.parse() {
        Ok(v) => v,
        Err(_) => {
            eprintln!("Error: {} must be an integer, got '{}'", flag, value);
            std::process::exit(1);
        }
    }
}

async fn load_user(pool: &DbPool, id: i64) -> user::Model {
    match users::find_by_id(pool.connection(), id).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            eprintln!("User {} not found.", id);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error loading user: {}", e);
            std::process::exit(1);
        }
    }
}

async fn delete_account(pool: &DbPool, config: &Config, target: &user::Model) {
    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    match delete_user(pool, target, &config.deletion, &cancel).await {
        Ok(report) => {
            println!();
            println!("{:<24} {:>8}", "TABLE", "ROWS");
            println!("{}", "-".repeat(33));
            for (table, rows) in report.purged.iter().filter(|(_, rows)| *rows > 0) {
                println!("{:<24} {:>8}", table, rows);
            }
            if report.content_purged {
                println!("{:<24} {:>8}", "comment", report.comments_deleted);
                println!("{:<24} {:>8}", "reaction (content)", report.reactions_deleted);
            }
            println!();
            println!("User {} deleted ({} rows).", target.id, report.rows_deleted());
        }
        Err(e) => {
            eprintln!("Error deleting user: {}", e);
            std::process::exit(1);
        }
    }
}

async fn list_links(pool: &DbPool, owner: &user::Model) {
    let links = match account_links::list_links(pool.connection(), owner).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Error listing links: {}", e);
            std::process::exit(1);
        }
    };

    if links.is_empty() {
        println!("No external logins found.");
        return;
    }

    println!();
    println!("{:<8} {:<16} {:<24} {:<30}", "SOURCE", "PROVIDER", "EXTERNAL ID", "EMAIL");
    println!("{}", "-".repeat(80));
    for link in links {
        println!(
            "{:<8} {:<16} {:<24} {:<30}",
            link.login_source_id, link.provider, link.external_id, link.email
        );
    }
    println!();
}

async fn unlink(pool: &DbPool, owner: &user::Model, login_source_id: i64) {
    match account_links::remove_link(pool.connection(), owner, login_source_id).await {
        Ok(_) => println!(
            "External login on source {} removed from user {}.",
            login_source_id, owner.id
        ),
        Err(e) if e.is_not_found() => {
            eprintln!("User {} has no login on source {}.", owner.id, login_source_id);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error removing link: {}", e);
            std::process::exit(1);
        }
    }
}

async fn list_repos(pool: &DbPool, member: &user::Model, active_only: bool) {
    match repo_access::accessible_repo_ids(pool.connection(), member, &[], active_only).await {
        Ok(ids) if ids.is_empty() => println!("No accessible repositories."),
        Ok(ids) => {
            for id in ids {
                println!("{}", id);
            }
        }
        Err(e) => {
            eprintln!("Error listing repositories: {}", e);
            std::process::exit(1);
        }
    }
}

async fn reattribute(
    pool: &DbPool,
    service_type: GitServiceType,
    external_id: &str,
    local: &user::Model,
) {
    let cancel = CancellationToken::new();
    match account_links::reattribute_imported_content(
        pool.connection(),
        service_type,
        external_id,
        local.id,
        &cancel,
    )
    .await
    {
        Ok(report) => {
            println!(
                "Reattributed to user {}: {} issues, {} comments, {} releases, {} reactions, {} reviews.",
                local.id,
                report.issues,
                report.comments,
                report.releases,
                report.reactions,
                report.reviews
            );
        }
        Err(e) => {
            eprintln!("Error reattributing content: {}", e);
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!();
    eprintln!("Usage: manage-users <command> [options]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  delete --id <id>                         Delete a user and everything referencing it");
    eprintln!("  links --id <id>                          List a user's external logins");
    eprintln!("  unlink --id <id> --source <source-id>    Remove a user's external login");
    eprintln!("  repos --id <id> [--active]               List repository ids a user can access");
    eprintln!("  orgs --id <id>                           Count a user's organization memberships");
    eprintln!("  visible --id <id> --viewer <viewer-id>   Check profile visibility");
    eprintln!("  reattribute --service <svc> --external-id <ext> --id <id>");
    eprintln!("                                           Hand migrated content to a local user");
    eprintln!("  help                                     Show this help");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  manage-users delete --id 42");
    eprintln!("  manage-users reattribute --service github --external-id 1234 --id 42");
    eprintln!();
}
