//! SeaORM entity definitions.

pub mod access;
pub mod access_token;
pub mod action;
pub mod collaboration;
pub mod comment;
pub mod email_address;
pub mod external_login_user;
pub mod follow;
pub mod gpg_key;
pub mod gpg_key_import;
pub mod issue;
pub mod issue_assignees;
pub mod issue_user;
pub mod login_source;
pub mod public_key;
pub mod reaction;
pub mod release;
pub mod repo_unit;
pub mod repository;
pub mod review;
pub mod star;
pub mod stopwatch;
pub mod team;
pub mod team_repo;
pub mod team_user;
pub mod user;
pub mod user_open_id;
pub mod user_setting;
pub mod watch;
