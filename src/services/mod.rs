//! Business logic services.

pub mod account_deletion;
pub mod account_links;
pub mod counters;
pub mod purge;
pub mod repo_access;
pub mod visibility;

pub use account_deletion::{delete_user, DeletionReport};
pub use account_links::ReattributionReport;
pub use repo_access::accessible_repo_ids;
pub use visibility::is_user_visible_to_viewer;
