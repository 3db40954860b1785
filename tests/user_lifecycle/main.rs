//! User lifecycle test suite.
//!
//! Exercises account deletion, profile visibility, repository access filters and external
//! identity links against an in-memory SQLite database with all migrations applied.
//!
//! Run with: cargo test --test user_lifecycle


mod test_deletion;
mod test_repo_access;
